//! Custom error types for the cleaning pipeline.
//!
//! This module provides the error hierarchy using `thiserror` so that every
//! failure carries enough context to be shown to the user at the boundary the
//! run was invoked from.
//!
//! Errors are serializable, allowing a UI host to render them without
//! matching on the Rust type.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the cleaning pipeline.
#[derive(Error, Debug)]
pub enum CleaningError {
    /// The input file type is not one the ingestion step can read.
    #[error("Unsupported file type '{0}', please provide a CSV or Excel (.xlsx) file")]
    UnsupportedFormat(String),

    /// The format parser rejected the file content.
    #[error("Failed to parse {format} input: {reason}")]
    ParseFailure { format: String, reason: String },

    /// A numeric column has no present values to average.
    #[error("Cannot fill missing values in numeric column '{0}': column has no non-missing values")]
    UndefinedMean(String),

    /// The declared column schema does not match the data.
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Writing an export file failed.
    #[error("Failed to export '{path}': {reason}")]
    ExportFailed { path: String, reason: String },

    /// Internal error (e.g., a pipeline state reached out of order).
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CleaningError>,
    },
}

impl CleaningError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CleaningError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Self::ParseFailure { .. } => "PARSE_FAILURE",
            Self::UndefinedMean(_) => "UNDEFINED_MEAN",
            Self::SchemaMismatch(_) => "SCHEMA_MISMATCH",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::ExportFailed { .. } => "EXPORT_FAILED",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error was raised before any cleaning state was entered.
    pub fn is_rejection(&self) -> bool {
        match self {
            Self::UnsupportedFormat(_) | Self::ParseFailure { .. } => true,
            Self::WithContext { source, .. } => source.is_rejection(),
            _ => false,
        }
    }

    /// Check if this error is recoverable by supplying different input.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::UnsupportedFormat(_) | Self::ParseFailure { .. } | Self::InvalidConfig(_) => true,
            Self::WithContext { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }
}

impl From<crate::config::ConfigValidationError> for CleaningError {
    fn from(err: crate::config::ConfigValidationError) -> Self {
        CleaningError::InvalidConfig(err.to_string())
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for CleaningError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CleaningError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, CleaningError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CleaningError::Polars(e).with_context(context))
    }
}
