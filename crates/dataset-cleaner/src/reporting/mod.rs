//! Export and report generation.
//!
//! This module writes the two result tables as CSV and builds the
//! [`CleaningReport`] used for:
//! - JSON output to stdout (`--json` CLI flag)
//! - JSON file output (`--emit-report` CLI flag)
//! - Programmatic access in library mode
//!
//! # Example
//!
//! ```rust,ignore
//! use dataset_cleaner::reporting::ReportGenerator;
//!
//! let generator = ReportGenerator::new("output".into(), "Sales");
//! let files = generator.generate_files(&outcome)?;
//! let report = ReportGenerator::build_report("sales.csv", &outcome, Some(files));
//! generator.write_report_to_file(&report)?;
//! ```

mod export;
mod generator;

pub use export::{to_csv_bytes, write_csv, write_csv_to};
pub use generator::{CleaningReport, ExportedFiles, ReportGenerator};
