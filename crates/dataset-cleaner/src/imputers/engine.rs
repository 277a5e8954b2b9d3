//! Per-column imputation policy.

use crate::error::Result;
use crate::imputers::StatisticalImputer;
use crate::types::{ColumnKind, Dataset, ImputationLogEntry};
use tracing::debug;

/// Output of an imputation pass.
#[derive(Debug, Clone)]
pub struct ImputationOutcome {
    /// Dataset with no missing values left.
    pub dataset: Dataset,
    /// One entry per column that needed work, in processing order.
    pub log: Vec<ImputationLogEntry>,
}

/// Resolves missing values column by column in schema order.
///
/// Numeric columns are mean-filled; categorical columns drop the rows where
/// they are missing. A drop shrinks the frame seen by every later column, so
/// a numeric column placed after a categorical one averages only the
/// surviving rows, while one placed before it keeps the mean it already
/// wrote.
pub struct ImputationEngine;

impl ImputationEngine {
    pub fn impute(dataset: &Dataset) -> Result<ImputationOutcome> {
        let mut frame = dataset.frame().clone();
        let mut log = Vec::new();

        for spec in dataset.schema().iter() {
            let step = match spec.kind {
                ColumnKind::Numeric => StatisticalImputer::apply_numeric_mean(&frame, &spec.name)?,
                ColumnKind::Categorical => {
                    StatisticalImputer::drop_missing_rows(&frame, &spec.name)?
                }
            };

            if let Some((next, entry)) = step {
                debug!("{}", entry);
                frame = next;
                log.push(entry);
            }
        }

        Ok(ImputationOutcome {
            dataset: dataset.derive(frame),
            log,
        })
    }
}
