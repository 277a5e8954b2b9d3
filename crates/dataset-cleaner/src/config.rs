//! Configuration types for the cleaning pipeline.
//!
//! This module provides configuration options using the builder pattern.
//! The cleaning policy itself is fixed (mean-fill numeric, row-drop
//! categorical); configuration only covers naming, ingestion and export.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Label used for export file names when the caller supplies none.
pub const DEFAULT_DATASET_NAME: &str = "MyCleanData";

/// Configuration for the cleaning pipeline.
///
/// Use [`CleaningConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use dataset_cleaner::config::CleaningConfig;
///
/// let config = CleaningConfig::builder()
///     .dataset_name("sales_2024")
///     .output_dir("exports")
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningConfig {
    /// Label used to name the exported files
    /// (`{dataset_name}_Clean_data.csv`, `{dataset_name}_duplicates.csv`).
    /// Default: "MyCleanData"
    pub dataset_name: String,

    /// Output directory for exported CSV files and reports.
    /// Default: "output"
    pub output_dir: PathBuf,

    /// Number of CSV rows scanned when inferring column dtypes.
    /// `None` scans the whole file.
    /// Default: Some(100)
    pub infer_schema_length: Option<usize>,

    /// Whether to write the cleaned data and duplicates to disk.
    /// When false, results are kept in memory only.
    /// Default: true
    pub save_to_disk: bool,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            dataset_name: DEFAULT_DATASET_NAME.to_string(),
            output_dir: PathBuf::from("output"),
            infer_schema_length: Some(100),
            save_to_disk: true,
        }
    }
}

impl CleaningConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleaningConfigBuilder {
        CleaningConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.dataset_name.trim().is_empty() {
            return Err(ConfigValidationError::EmptyDatasetName);
        }

        if self
            .dataset_name
            .chars()
            .any(|c| c == '/' || c == '\\' || std::path::is_separator(c))
        {
            return Err(ConfigValidationError::InvalidDatasetName(
                self.dataset_name.clone(),
            ));
        }

        if self.infer_schema_length == Some(0) {
            return Err(ConfigValidationError::InvalidInferSchemaLength);
        }

        Ok(())
    }

    /// File name of the cleaned dataset export.
    pub fn cleaned_file_name(&self) -> String {
        format!("{}_Clean_data.csv", self.dataset_name)
    }

    /// File name of the duplicate records export.
    pub fn duplicates_file_name(&self) -> String {
        format!("{}_duplicates.csv", self.dataset_name)
    }

    /// File name of the JSON run report.
    pub fn report_file_name(&self) -> String {
        format!("{}_report.json", self.dataset_name)
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Dataset name must not be empty")]
    EmptyDatasetName,

    #[error("Invalid dataset name '{0}' (must not contain path separators)")]
    InvalidDatasetName(String),

    #[error("Invalid infer_schema_length: 0 (use None to scan the whole file)")]
    InvalidInferSchemaLength,
}

/// Builder for [`CleaningConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleaningConfigBuilder {
    dataset_name: Option<String>,
    output_dir: Option<PathBuf>,
    infer_schema_length: Option<Option<usize>>,
    save_to_disk: Option<bool>,
}

impl CleaningConfigBuilder {
    /// Set the label used for export file names.
    pub fn dataset_name(mut self, name: impl Into<String>) -> Self {
        self.dataset_name = Some(name.into());
        self
    }

    /// Set the output directory for exports and reports.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set how many CSV rows are scanned for dtype inference.
    pub fn infer_schema_length(mut self, rows: Option<usize>) -> Self {
        self.infer_schema_length = Some(rows);
        self
    }

    /// Enable or disable writing exports to disk.
    pub fn save_to_disk(mut self, save: bool) -> Self {
        self.save_to_disk = Some(save);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleaningConfig` or an error if validation fails.
    pub fn build(self) -> Result<CleaningConfig, ConfigValidationError> {
        let defaults = CleaningConfig::default();
        let config = CleaningConfig {
            dataset_name: self.dataset_name.unwrap_or(defaults.dataset_name),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            infer_schema_length: self
                .infer_schema_length
                .unwrap_or(defaults.infer_schema_length),
            save_to_disk: self.save_to_disk.unwrap_or(defaults.save_to_disk),
        };

        config.validate()?;
        Ok(config)
    }
}
