//! Input ingestion.
//!
//! Turns an uploaded file into a [`Dataset`]. The file name's extension picks
//! the parser; the parser's dtypes decide which columns are numeric.
//!
//! # Example
//!
//! ```rust,ignore
//! use dataset_cleaner::ingest::DatasetLoader;
//!
//! let dataset = DatasetLoader::default().load_path("sales.csv".as_ref())?;
//! println!("{} rows", dataset.height());
//! ```

mod csv;
mod xlsx;

pub use csv::NA_MARKERS;

use crate::config::CleaningConfig;
use crate::error::{CleaningError, Result, ResultExt};
use crate::types::Dataset;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

/// Input formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    Xlsx,
}

impl FileFormat {
    /// Pick the format from a file name's extension (case-insensitive).
    ///
    /// # Errors
    ///
    /// [`CleaningError::UnsupportedFormat`] for any other extension.
    pub fn from_name(name: &str) -> Result<Self> {
        let extension = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("xlsx") => Ok(Self::Xlsx),
            Some(other) => Err(CleaningError::UnsupportedFormat(format!(".{}", other))),
            None => Err(CleaningError::UnsupportedFormat(name.to_string())),
        }
    }

    /// Label used in status messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Xlsx => "Excel",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Reads CSV and Excel input into datasets.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    infer_schema_length: Option<usize>,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::from_config(&CleaningConfig::default())
    }
}

impl DatasetLoader {
    /// `infer_schema_length` is the number of CSV rows sampled for dtype
    /// inference; `None` scans the whole file.
    pub fn new(infer_schema_length: Option<usize>) -> Self {
        Self {
            infer_schema_length,
        }
    }

    pub fn from_config(config: &CleaningConfig) -> Self {
        Self::new(config.infer_schema_length)
    }

    /// Read a file from disk.
    pub fn load_path(&self, path: &Path) -> Result<Dataset> {
        let name = path.to_string_lossy();
        // Check the extension before touching the file.
        FileFormat::from_name(&name)?;

        let bytes = std::fs::read(path).map_err(|e| {
            warn!("Could not read {}: {}", name, e);
            CleaningError::Io(e)
        })?;
        self.load_bytes(&name, &bytes)
    }

    /// Parse uploaded bytes; `name` is only used to pick the format.
    pub fn load_bytes(&self, name: &str, bytes: &[u8]) -> Result<Dataset> {
        let format = FileFormat::from_name(name)?;
        info!("Processing {} file", format);

        let frame = match format {
            FileFormat::Csv => csv::read_csv(bytes, self.infer_schema_length),
            FileFormat::Xlsx => xlsx::read_xlsx(bytes),
        }
        .context(format!("Loading {}", name))?;

        let dataset = Dataset::new(frame);
        debug!(
            "Loaded {} rows x {} columns from {}",
            dataset.height(),
            dataset.width(),
            name
        );
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnKind;

    #[test]
    fn test_format_from_name() {
        assert_eq!(FileFormat::from_name("data.csv").unwrap(), FileFormat::Csv);
        assert_eq!(FileFormat::from_name("DATA.CSV").unwrap(), FileFormat::Csv);
        assert_eq!(FileFormat::from_name("book.xlsx").unwrap(), FileFormat::Xlsx);
        assert_eq!(FileFormat::from_name("/tmp/x/Book.XLSX").unwrap(), FileFormat::Xlsx);
    }

    #[test]
    fn test_unsupported_formats() {
        for name in ["report.pdf", "legacy.xls", "notes", "archive.csv.gz"] {
            let err = FileFormat::from_name(name).unwrap_err();
            assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT", "{}", name);
            assert!(err.is_recoverable());
        }
    }

    #[test]
    fn test_load_bytes_tags_columns() {
        let dataset = DatasetLoader::default()
            .load_bytes("people.csv", b"age,city\n30,Oslo\n,Lima\n")
            .unwrap();

        assert_eq!(dataset.shape(), (2, 2));
        assert_eq!(dataset.schema().kind_of("age"), Some(ColumnKind::Numeric));
        assert_eq!(dataset.schema().kind_of("city"), Some(ColumnKind::Categorical));
        assert_eq!(dataset.missing_count(), 1);
    }

    #[test]
    fn test_load_bytes_rejects_unknown_extension_before_parsing() {
        let err = DatasetLoader::default()
            .load_bytes("people.json", b"[]")
            .unwrap_err();
        assert!(err.is_rejection());
    }

    #[test]
    fn test_parse_failure_keeps_its_code() {
        let err = DatasetLoader::default()
            .load_bytes("book.xlsx", b"not a workbook")
            .unwrap_err();
        assert_eq!(err.error_code(), "PARSE_FAILURE");
        assert!(err.is_rejection());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = DatasetLoader::default()
            .load_path(Path::new("/nonexistent/dir/data.csv"))
            .unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
    }
}
