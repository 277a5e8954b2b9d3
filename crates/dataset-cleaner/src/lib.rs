//! Dataset Cleaning Library
//!
//! A small, deterministic data cleaning library built with Rust and Polars.
//!
//! # Overview
//!
//! Given one tabular dataset, the pipeline:
//!
//! - **Separates duplicates**: rows that exactly repeat an earlier row are
//!   removed and handed back as their own table
//! - **Counts missing values**: per column, after duplicate removal
//! - **Resolves missing values**: numeric columns are filled with their mean,
//!   rows missing a categorical value are dropped, column by column in schema
//!   order
//! - **Reports progress**: status messages at fixed checkpoints through a
//!   [`ProgressReporter`]
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use dataset_cleaner::{CleaningConfig, Pipeline};
//!
//! let config = CleaningConfig::builder()
//!     .dataset_name("Titanic")
//!     .output_dir("output")
//!     .build()?;
//!
//! let pipeline = Pipeline::builder()
//!     .config(config)
//!     .on_progress(|update| println!("[{:>3}%] {}", update.percent, update.message))
//!     .build()?;
//!
//! let outcome = pipeline.process_file("titanic.csv".as_ref())?;
//! println!("Removed {} duplicates", outcome.summary.total_duplicate_count);
//!
//! // Titanic_Clean_data.csv, plus Titanic_duplicates.csv if any were found
//! pipeline.export(&outcome)?;
//! ```
//!
//! # Working in memory
//!
//! Hosts that already hold a polars frame skip ingestion entirely:
//!
//! ```rust,ignore
//! use dataset_cleaner::{Dataset, Pipeline};
//!
//! let outcome = Pipeline::builder().build()?.process(Dataset::new(df))?;
//! let csv = dataset_cleaner::reporting::to_csv_bytes(&outcome.cleaned)?;
//! ```
//!
//! Column semantics come from the frame's dtypes unless an explicit
//! [`ColumnSchema`] is supplied through [`Dataset::with_schema`].

pub mod cleaner;
pub mod config;
pub mod error;
pub mod imputers;
pub mod ingest;
pub mod pipeline;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{DuplicateDetector, DuplicateReport, MissingValueAnalyzer};
pub use config::{CleaningConfig, CleaningConfigBuilder, ConfigValidationError};
pub use error::{CleaningError, Result as CleaningResult, ResultExt};
pub use imputers::{ImputationEngine, ImputationOutcome, StatisticalImputer};
pub use ingest::{DatasetLoader, FileFormat};
pub use pipeline::{
    CleaningExecutor, CleaningStage, ClosureProgressReporter, NoopProgressReporter, Pipeline,
    PipelineBuilder, PipelineStage, PipelineState, ProgressReporter, ProgressUpdate,
};
pub use reporting::{CleaningReport, ExportedFiles, ReportGenerator};
pub use types::{
    CleaningOutcome, CleaningSummary, ColumnKind, ColumnMissing, ColumnSchema, ColumnSpec,
    Dataset, ImputationLogEntry, MissingValueReport,
};
