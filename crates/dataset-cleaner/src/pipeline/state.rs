//! States of a single cleaning run.

use crate::cleaner::DuplicateReport;
use crate::error::CleaningError;
use crate::imputers::ImputationOutcome;
use crate::types::{CleaningOutcome, Dataset, MissingValueReport};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shape of the input as it was handed to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputShape {
    pub rows: usize,
    pub columns: usize,
}

impl From<&Dataset> for InputShape {
    fn from(dataset: &Dataset) -> Self {
        Self {
            rows: dataset.height(),
            columns: dataset.width(),
        }
    }
}

/// Where a run currently stands, together with everything produced so far.
///
/// Runs move strictly forward:
/// `Ingested -> Deduplicated -> Analyzed -> Imputed -> Done`.
/// `Rejected` is entered instead of `Ingested` when the input could not be
/// read, so no cleaning state is ever reached for it.
#[derive(Debug)]
pub enum PipelineState {
    Ingested {
        dataset: Dataset,
    },
    Deduplicated {
        input: InputShape,
        duplicates: DuplicateReport,
    },
    Analyzed {
        input: InputShape,
        duplicates: DuplicateReport,
        missing: MissingValueReport,
    },
    Imputed {
        input: InputShape,
        duplicates: DuplicateReport,
        missing: MissingValueReport,
        imputation: ImputationOutcome,
    },
    Done(Box<CleaningOutcome>),
    Rejected {
        error: CleaningError,
    },
}

impl PipelineState {
    /// Entry state for a dataset that ingestion produced.
    pub fn ingested(dataset: Dataset) -> Self {
        Self::Ingested { dataset }
    }

    /// Terminal state for input that ingestion could not read.
    pub fn rejected(error: CleaningError) -> Self {
        Self::Rejected { error }
    }

    pub fn stage(&self) -> PipelineStage {
        match self {
            Self::Ingested { .. } => PipelineStage::Ingested,
            Self::Deduplicated { .. } => PipelineStage::Deduplicated,
            Self::Analyzed { .. } => PipelineStage::Analyzed,
            Self::Imputed { .. } => PipelineStage::Imputed,
            Self::Done(_) => PipelineStage::Done,
            Self::Rejected { .. } => PipelineStage::Rejected,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.stage().is_terminal()
    }
}

/// Payload-free name of a [`PipelineState`], for logging and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Ingested,
    Deduplicated,
    Analyzed,
    Imputed,
    Done,
    Rejected,
}

impl PipelineStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Rejected)
    }

    /// The stage a successful step leads to, if any.
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Ingested => Some(Self::Deduplicated),
            Self::Deduplicated => Some(Self::Analyzed),
            Self::Analyzed => Some(Self::Imputed),
            Self::Imputed => Some(Self::Done),
            Self::Done | Self::Rejected => None,
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ingested => "ingested",
            Self::Deduplicated => "deduplicated",
            Self::Analyzed => "analyzed",
            Self::Imputed => "imputed",
            Self::Done => "done",
            Self::Rejected => "rejected",
        };
        f.write_str(name)
    }
}
