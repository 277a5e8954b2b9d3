//! Cleaning executor.
//!
//! Drives a [`PipelineState`] forward one step at a time and emits the status
//! messages for each step.

use crate::cleaner::{DuplicateDetector, DuplicateReport, MissingValueAnalyzer};
use crate::error::{CleaningError, Result};
use crate::imputers::ImputationEngine;
use crate::pipeline::progress::{CleaningStage, ProgressReporter, ProgressUpdate};
use crate::pipeline::state::{InputShape, PipelineState};
use crate::types::{CleaningOutcome, CleaningSummary};
use tracing::{debug, info, warn};

/// Executes the cleaning steps for one dataset.
pub struct CleaningExecutor<'a> {
    dataset_name: &'a str,
    reporter: &'a dyn ProgressReporter,
}

impl<'a> CleaningExecutor<'a> {
    pub fn new(dataset_name: &'a str, reporter: &'a dyn ProgressReporter) -> Self {
        Self {
            dataset_name,
            reporter,
        }
    }

    /// Run every remaining step until the state is terminal.
    ///
    /// # Errors
    ///
    /// Any step error. A `Rejected` state returns its ingestion error after
    /// reporting the rejection.
    pub fn run_to_completion(&self, mut state: PipelineState) -> Result<CleaningOutcome> {
        loop {
            state = match state {
                PipelineState::Done(outcome) => return Ok(*outcome),
                PipelineState::Rejected { error } => {
                    warn!("Input rejected: {}", error);
                    self.reporter.report(ProgressUpdate::rejected(error.to_string()));
                    return Err(error);
                }
                other => self.advance(other)?,
            };
        }
    }

    /// Perform exactly one transition.
    pub fn advance(&self, state: PipelineState) -> Result<PipelineState> {
        let from = state.stage();
        let next = match state {
            PipelineState::Ingested { dataset } => {
                let input = InputShape::from(&dataset);
                self.emit(CleaningStage::DuplicateCheck, "Checking for duplicates...");
                let is_duplicate = DuplicateDetector::duplicate_mask(&dataset)?;
                let total_duplicate_count = is_duplicate.iter().filter(|d| **d).count();
                self.emit(
                    CleaningStage::DuplicateCheck,
                    format!("Dataset has total duplicate records: {}", total_duplicate_count),
                );
                let duplicate_records =
                    DuplicateDetector::extract_duplicates(&dataset, &is_duplicate)?;
                if duplicate_records.is_some() {
                    self.emit(
                        CleaningStage::DuplicateCheck,
                        "Duplicate records found and separated",
                    );
                }

                self.emit(CleaningStage::DuplicateRemoval, "Removing duplicates...");
                let deduplicated = DuplicateDetector::remove_duplicates(&dataset, &is_duplicate)?;
                let duplicates = DuplicateReport {
                    total_duplicate_count,
                    duplicate_records,
                    deduplicated,
                };

                PipelineState::Deduplicated { input, duplicates }
            }

            PipelineState::Deduplicated { input, duplicates } => {
                self.emit(
                    CleaningStage::MissingValueCheck,
                    "Checking for missing values...",
                );
                let missing = MissingValueAnalyzer::analyze(&duplicates.deduplicated);
                self.emit(
                    CleaningStage::MissingValueCheck,
                    format!("Total missing values in the dataset: {}", missing.total_missing),
                );
                for column in missing.nonzero() {
                    self.emit(
                        CleaningStage::MissingValueCheck,
                        format!("{}: {} missing values", column.column, column.count),
                    );
                }

                PipelineState::Analyzed {
                    input,
                    duplicates,
                    missing,
                }
            }

            PipelineState::Analyzed {
                input,
                duplicates,
                missing,
            } => {
                self.emit(CleaningStage::Imputation, "Handling missing values...");
                let imputation = ImputationEngine::impute(&duplicates.deduplicated)?;
                for entry in &imputation.log {
                    self.emit(CleaningStage::Imputation, entry.to_string());
                }

                PipelineState::Imputed {
                    input,
                    duplicates,
                    missing,
                    imputation,
                }
            }

            PipelineState::Imputed {
                input,
                duplicates,
                missing,
                imputation,
            } => {
                let cleaned = imputation.dataset;
                let summary = CleaningSummary {
                    dataset_name: self.dataset_name.to_string(),
                    rows_before: input.rows,
                    columns_before: input.columns,
                    total_duplicate_count: duplicates.total_duplicate_count,
                    missing,
                    imputation_log: imputation.log,
                    rows_after: cleaned.height(),
                    columns_after: cleaned.width(),
                    duration_ms: 0,
                };
                self.emit(
                    CleaningStage::Complete,
                    format!(
                        "Cleaning completed! Final dimensions: {} rows, {} columns",
                        summary.rows_after, summary.columns_after
                    ),
                );

                PipelineState::Done(Box::new(CleaningOutcome {
                    cleaned,
                    duplicates: duplicates.duplicate_records,
                    summary,
                }))
            }

            terminal @ (PipelineState::Done(_) | PipelineState::Rejected { .. }) => {
                return Err(CleaningError::Internal(format!(
                    "no transition out of the {} state",
                    terminal.stage()
                )));
            }
        };

        debug!("Pipeline state {} -> {}", from, next.stage());
        Ok(next)
    }

    fn emit(&self, stage: CleaningStage, message: impl Into<String>) {
        let update = ProgressUpdate::new(stage, message);
        info!("{}", update.message);
        self.reporter.report(update);
    }
}
