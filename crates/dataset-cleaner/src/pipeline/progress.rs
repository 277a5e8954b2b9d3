//! Progress reporting for the cleaning pipeline.
//!
//! The pipeline never talks to a UI directly. It emits [`ProgressUpdate`]s to
//! a [`ProgressReporter`] at fixed checkpoints, and the host decides how to
//! render them (progress bar, log line, IPC event).
//!
//! # Example
//!
//! ```rust,ignore
//! use dataset_cleaner::Pipeline;
//!
//! let outcome = Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:>3}%] {}", update.percent, update.message);
//!     })
//!     .build()?
//!     .process(dataset)?;
//! ```

use serde::{Deserialize, Serialize};

/// Checkpoints of a cleaning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningStage {
    /// Reading and parsing the input file
    Loading,
    /// Looking for exact duplicate rows
    DuplicateCheck,
    /// Separating duplicates from first occurrences
    DuplicateRemoval,
    /// Counting missing values per column
    MissingValueCheck,
    /// Mean-filling numeric columns and dropping rows for categorical ones
    Imputation,
    /// Run finished successfully
    Complete,
    /// Input was rejected before cleaning started
    Rejected,
    /// Run failed after cleaning started
    Failed,
}

impl CleaningStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Loading => "Loading",
            Self::DuplicateCheck => "Checking Duplicates",
            Self::DuplicateRemoval => "Removing Duplicates",
            Self::MissingValueCheck => "Checking Missing Values",
            Self::Imputation => "Handling Missing Values",
            Self::Complete => "Complete",
            Self::Rejected => "Rejected",
            Self::Failed => "Failed",
        }
    }

    /// Overall progress (0 - 100) reached when this stage starts.
    pub fn percent(&self) -> u8 {
        match self {
            Self::Loading => 0,
            Self::DuplicateCheck => 20,
            Self::DuplicateRemoval => 40,
            Self::MissingValueCheck => 60,
            Self::Imputation => 80,
            Self::Complete => 100,
            Self::Rejected => 0,
            Self::Failed => 0,
        }
    }

    /// Whether no further updates follow this stage.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Rejected | Self::Failed)
    }
}

/// A single status message from the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Current checkpoint
    pub stage: CleaningStage,

    /// Human-readable message describing the current activity or a result
    pub message: String,

    /// Overall progress (0 - 100)
    pub percent: u8,
}

impl ProgressUpdate {
    /// Creates an update at the stage's checkpoint percentage.
    pub fn new(stage: CleaningStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
            percent: stage.percent(),
        }
    }

    /// Creates a completion update.
    pub fn complete(message: impl Into<String>) -> Self {
        Self::new(CleaningStage::Complete, message)
    }

    /// Creates an update for input that could not be ingested.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(CleaningStage::Rejected, message)
    }

    /// Creates a failed update.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(CleaningStage::Failed, message)
    }
}

/// Receives progress updates during a cleaning run.
///
/// Implementations must be `Send + Sync` so a host can run the pipeline on a
/// worker thread while the reporter forwards updates to its UI.
///
/// # Example
///
/// ```rust,ignore
/// use dataset_cleaner::{ProgressReporter, ProgressUpdate};
///
/// struct StderrReporter;
///
/// impl ProgressReporter for StderrReporter {
///     fn report(&self, update: ProgressUpdate) {
///         eprintln!("{}: {}", update.stage.display_name(), update.message);
///     }
/// }
/// ```
pub trait ProgressReporter: Send + Sync {
    /// Called at every checkpoint and for every status message.
    fn report(&self, update: ProgressUpdate);
}

/// Reporter that discards every update. Used when none is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgressReporter;

impl ProgressReporter for NoopProgressReporter {
    fn report(&self, _update: ProgressUpdate) {}
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    /// Creates a new closure-based progress reporter.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);
static_assertions::assert_impl_all!(NoopProgressReporter: ProgressReporter);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_checkpoint_percentages_increase() {
        let stages = [
            CleaningStage::Loading,
            CleaningStage::DuplicateCheck,
            CleaningStage::DuplicateRemoval,
            CleaningStage::MissingValueCheck,
            CleaningStage::Imputation,
            CleaningStage::Complete,
        ];
        let percents: Vec<u8> = stages.iter().map(|s| s.percent()).collect();
        assert_eq!(percents, vec![0, 20, 40, 60, 80, 100]);
    }

    #[test]
    fn test_progress_update_new() {
        let update = ProgressUpdate::new(CleaningStage::MissingValueCheck, "Checking...");
        assert_eq!(update.stage, CleaningStage::MissingValueCheck);
        assert_eq!(update.percent, 60);
        assert_eq!(update.message, "Checking...");
    }

    #[test]
    fn test_terminal_stages() {
        assert!(CleaningStage::Complete.is_terminal());
        assert!(CleaningStage::Rejected.is_terminal());
        assert!(!CleaningStage::Imputation.is_terminal());
        assert_eq!(ProgressUpdate::complete("done").percent, 100);
    }

    #[test]
    fn test_noop_reporter_accepts_updates() {
        NoopProgressReporter.report(ProgressUpdate::complete("ignored"));
    }

    #[test]
    fn test_closure_progress_reporter() {
        let call_count = Arc::new(AtomicUsize::new(0));
        let call_count_clone = call_count.clone();

        let reporter = ClosureProgressReporter::new(move |_update| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        });

        reporter.report(ProgressUpdate::new(CleaningStage::DuplicateCheck, "Test"));
        reporter.report(ProgressUpdate::complete("Done"));

        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_stage_json_values() {
        let stage_expectations = [
            (CleaningStage::Loading, "\"loading\""),
            (CleaningStage::DuplicateCheck, "\"duplicate_check\""),
            (CleaningStage::DuplicateRemoval, "\"duplicate_removal\""),
            (CleaningStage::MissingValueCheck, "\"missing_value_check\""),
            (CleaningStage::Imputation, "\"imputation\""),
            (CleaningStage::Complete, "\"complete\""),
            (CleaningStage::Rejected, "\"rejected\""),
            (CleaningStage::Failed, "\"failed\""),
        ];

        for (stage, expected_json) in stage_expectations {
            let json = serde_json::to_string(&stage).expect("Should serialize");
            assert_eq!(json, expected_json);
        }
    }

    #[test]
    fn test_progress_reporter_across_threads() {
        let call_count = Arc::new(AtomicUsize::new(0));
        let call_count_clone = call_count.clone();

        let reporter = Arc::new(ClosureProgressReporter::new(move |_update| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        }));

        let reporter_clone = reporter.clone();
        let handle = std::thread::spawn(move || {
            reporter_clone.report(ProgressUpdate::new(
                CleaningStage::Imputation,
                "Test from background thread",
            ));
        });

        handle.join().expect("Thread should not panic");
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }
}
