//! Pipeline module.
//!
//! This module provides the cleaning pipeline, its state machine, and
//! progress reporting.

mod builder;
mod executor;
pub mod progress;
mod state;

pub use builder::{Pipeline, PipelineBuilder};
pub use executor::CleaningExecutor;
pub use progress::{
    CleaningStage, ClosureProgressReporter, NoopProgressReporter, ProgressReporter,
    ProgressUpdate,
};
pub use state::{InputShape, PipelineStage, PipelineState};
