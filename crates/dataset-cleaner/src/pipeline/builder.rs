//! Main cleaning pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for
//! orchestrating a cleaning run.

use crate::config::{CleaningConfig, ConfigValidationError};
use crate::error::Result;
use crate::ingest::{DatasetLoader, FileFormat};
use crate::pipeline::CleaningExecutor;
use crate::pipeline::progress::{
    CleaningStage, ClosureProgressReporter, NoopProgressReporter, ProgressReporter,
    ProgressUpdate,
};
use crate::pipeline::state::PipelineState;
use crate::reporting::{ExportedFiles, ReportGenerator};
use crate::types::{CleaningOutcome, Dataset};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// The cleaning pipeline.
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use dataset_cleaner::{CleaningConfig, Pipeline};
///
/// let pipeline = Pipeline::builder()
///     .config(CleaningConfig::builder().dataset_name("Sales").build()?)
///     .on_progress(|update| {
///         println!("[{:>3}%] {}", update.percent, update.message);
///     })
///     .build()?;
///
/// let outcome = pipeline.process_file("sales.csv".as_ref())?;
/// pipeline.export(&outcome)?;
/// ```
pub struct Pipeline {
    config: CleaningConfig,
    progress_reporter: Arc<dyn ProgressReporter>,
    loader: DatasetLoader,
    reporter: ReportGenerator,
}

// A host may run a whole invocation on a worker thread.
static_assertions::assert_impl_all!(Pipeline: Send, Sync);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    pub fn report_generator(&self) -> &ReportGenerator {
        &self.reporter
    }

    /// Clean an already ingested dataset.
    ///
    /// The caller's dataset is not modified.
    ///
    /// # Errors
    ///
    /// [`UndefinedMean`](crate::CleaningError::UndefinedMean) when a numeric column has no value
    /// left to average; polars errors are wrapped with context.
    pub fn process(&self, dataset: Dataset) -> Result<CleaningOutcome> {
        self.run(PipelineState::ingested(dataset))
    }

    /// Read a CSV or Excel file and clean it.
    pub fn process_file(&self, path: &Path) -> Result<CleaningOutcome> {
        let name = path.to_string_lossy();
        self.run(self.ingest(&name, || self.loader.load_path(path)))
    }

    /// Parse uploaded bytes and clean them. `name` selects the format.
    pub fn process_bytes(&self, name: &str, bytes: &[u8]) -> Result<CleaningOutcome> {
        self.run(self.ingest(name, || self.loader.load_bytes(name, bytes)))
    }

    /// Write the result tables to the configured output directory.
    ///
    /// Returns `None` without touching the disk when `save_to_disk` is off.
    pub fn export(&self, outcome: &CleaningOutcome) -> Result<Option<ExportedFiles>> {
        if !self.config.save_to_disk {
            info!("Saving to disk is disabled, keeping results in memory");
            return Ok(None);
        }
        self.reporter.generate_files(outcome).map(Some)
    }

    /// Turn a load attempt into the entry state: `Ingested` or `Rejected`.
    fn ingest<F>(&self, name: &str, load: F) -> PipelineState
    where
        F: FnOnce() -> Result<Dataset>,
    {
        let loaded = FileFormat::from_name(name).and_then(|format| {
            self.report_progress(ProgressUpdate::new(
                CleaningStage::Loading,
                format!("Processing {} file", format),
            ));
            load()
        });

        match loaded {
            Ok(dataset) => {
                self.report_progress(ProgressUpdate::new(
                    CleaningStage::Loading,
                    format!(
                        "Number of rows: {}, Number of columns: {}",
                        dataset.height(),
                        dataset.width()
                    ),
                ));
                PipelineState::ingested(dataset)
            }
            Err(e) => {
                debug!("Could not ingest {}: {}", name, e);
                PipelineState::rejected(e)
            }
        }
    }

    fn run(&self, state: PipelineState) -> Result<CleaningOutcome> {
        let start_time = Instant::now();
        if let PipelineState::Ingested { dataset } = &state {
            info!(
                "Starting cleaning of '{}' ({} rows x {} columns)",
                self.config.dataset_name,
                dataset.height(),
                dataset.width()
            );
        }
        let rejected = matches!(state, PipelineState::Rejected { .. });

        let executor =
            CleaningExecutor::new(&self.config.dataset_name, self.progress_reporter.as_ref());
        match executor.run_to_completion(state) {
            Ok(mut outcome) => {
                outcome.summary.duration_ms = start_time.elapsed().as_millis() as u64;
                info!(
                    "Cleaning finished in {}ms: {} duplicates removed, {} values filled, {} rows dropped",
                    outcome.summary.duration_ms,
                    outcome.summary.total_duplicate_count,
                    outcome.summary.values_filled(),
                    outcome.summary.rows_dropped_for_missing()
                );
                Ok(outcome)
            }
            // Already reported by the executor.
            Err(e) if rejected => Err(e),
            Err(e) => {
                error!("Cleaning error: {}", e);
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                Err(e)
            }
        }
    }

    fn report_progress(&self, update: ProgressUpdate) {
        self.progress_reporter.report(update);
    }
}

/// Builder for creating a [`Pipeline`] instance.
///
/// Use [`Pipeline::builder()`] to get started.
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<CleaningConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: CleaningConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving updates during processing.
    ///
    /// Use this when you need a custom progress reporter implementation,
    /// such as forwarding events to a UI.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// This is a convenience method for simple progress handling.
    /// For more complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(Pipeline {
            loader: DatasetLoader::from_config(&config),
            reporter: ReportGenerator::from_config(&config),
            progress_reporter: self
                .progress_reporter
                .unwrap_or_else(|| Arc::new(NoopProgressReporter)),
            config,
        })
    }
}
