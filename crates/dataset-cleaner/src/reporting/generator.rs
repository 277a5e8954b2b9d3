use crate::config::CleaningConfig;
use crate::error::{CleaningError, Result};
use crate::reporting::export::write_csv;
use crate::types::{CleaningOutcome, ColumnMissing};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// ============================================================================
// Report Types
// ============================================================================

/// Paths of the files written for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedFiles {
    /// `{dataset_name}_Clean_data.csv`
    pub cleaned: PathBuf,
    /// `{dataset_name}_duplicates.csv`, only when duplicates were found
    pub duplicates: Option<PathBuf>,
}

/// Machine-readable record of a cleaning run.
///
/// Used for both JSON output (`--json`) and file writing (`--emit-report`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path or name of the input file
    pub input_file: String,
    pub dataset_name: String,
    /// `(rows, columns)` of the input
    pub shape_before: (usize, usize),
    /// `(rows, columns)` of the cleaned dataset
    pub shape_after: (usize, usize),
    pub total_duplicate_count: usize,
    /// Columns that had missing values after duplicate removal
    pub missing_by_column: Vec<ColumnMissing>,
    /// Human-readable imputation log, in column order
    pub imputation_log: Vec<String>,
    /// Files written, if any
    pub exported_files: Option<ExportedFiles>,
    pub duration_ms: u64,
}

// ============================================================================
// Generator
// ============================================================================

/// Writes cleaned data, duplicate records and reports into an output
/// directory.
pub struct ReportGenerator {
    config: CleaningConfig,
}

impl ReportGenerator {
    pub fn new(output_dir: PathBuf, dataset_name: impl Into<String>) -> Self {
        Self {
            config: CleaningConfig {
                dataset_name: dataset_name.into(),
                output_dir,
                ..CleaningConfig::default()
            },
        }
    }

    pub fn from_config(config: &CleaningConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    pub fn cleaned_path(&self) -> PathBuf {
        self.output_dir().join(self.config.cleaned_file_name())
    }

    pub fn duplicates_path(&self) -> PathBuf {
        self.output_dir().join(self.config.duplicates_file_name())
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir().join(self.config.report_file_name())
    }

    /// Write the cleaned dataset and, when present, the duplicate records.
    pub fn generate_files(&self, outcome: &CleaningOutcome) -> Result<ExportedFiles> {
        fs::create_dir_all(self.output_dir()).map_err(|e| CleaningError::ExportFailed {
            path: self.output_dir().display().to_string(),
            reason: e.to_string(),
        })?;

        let cleaned = self.cleaned_path();
        write_csv(&outcome.cleaned, &cleaned)?;
        info!("Cleaned dataset saved: {}", cleaned.display());

        let duplicates = match &outcome.duplicates {
            Some(records) => {
                let path = self.duplicates_path();
                write_csv(records, &path)?;
                info!("Duplicate records saved: {}", path.display());
                Some(path)
            }
            None => {
                debug!("No duplicate records to save");
                None
            }
        };

        Ok(ExportedFiles {
            cleaned,
            duplicates,
        })
    }

    /// Assemble the report for a finished run.
    pub fn build_report(
        input_file: &str,
        outcome: &CleaningOutcome,
        exported_files: Option<ExportedFiles>,
    ) -> CleaningReport {
        let summary = &outcome.summary;

        CleaningReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.to_string(),
            dataset_name: summary.dataset_name.clone(),
            shape_before: (summary.rows_before, summary.columns_before),
            shape_after: (summary.rows_after, summary.columns_after),
            total_duplicate_count: summary.total_duplicate_count,
            missing_by_column: summary.missing.nonzero().cloned().collect(),
            imputation_log: summary
                .imputation_log
                .iter()
                .map(|entry| entry.to_string())
                .collect(),
            exported_files,
            duration_ms: summary.duration_ms,
        }
    }

    /// Write a report as pretty JSON to `{dataset_name}_report.json`.
    pub fn write_report_to_file(&self, report: &CleaningReport) -> Result<PathBuf> {
        fs::create_dir_all(self.output_dir())?;

        let report_path = self.report_path();
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}
