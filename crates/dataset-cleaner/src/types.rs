//! Shared data types for the cleaning pipeline.

use crate::error::{CleaningError, Result};
use crate::utils::is_numeric_dtype;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Schema
// ============================================================================

/// Semantic type of a column, decided once by the ingestion step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Supports arithmetic; missing values are mean-filled.
    Numeric,
    /// Anything else; missing values cause the row to be dropped.
    Categorical,
}

impl ColumnKind {
    /// Tag a polars dtype. Integer and float dtypes are numeric, everything
    /// else (strings, booleans, dates) is categorical.
    pub fn from_dtype(dtype: &DataType) -> Self {
        if is_numeric_dtype(dtype) {
            Self::Numeric
        } else {
            Self::Categorical
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric => write!(f, "numeric"),
            Self::Categorical => write!(f, "categorical"),
        }
    }
}

/// A named column and its semantic type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Ordered column schema shared by every row of a [`Dataset`].
///
/// Order matters: the imputation engine processes columns left-to-right in
/// exactly this order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    columns: Vec<ColumnSpec>,
}

impl ColumnSchema {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self { columns }
    }

    /// Derive the schema from the dtypes a parser produced.
    pub fn from_frame(frame: &DataFrame) -> Self {
        let columns = frame
            .get_columns()
            .iter()
            .map(|col| ColumnSpec::new(col.name().as_str(), ColumnKind::from_dtype(col.dtype())))
            .collect();
        Self { columns }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.columns.iter().find(|c| c.name == name).map(|c| c.kind)
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

// ============================================================================
// Dataset
// ============================================================================

/// A tabular dataset: a polars frame plus the semantic schema of its columns.
///
/// Every pipeline stage produces a new `Dataset`; none mutates one it was
/// given. Cloning is cheap since polars columns are reference counted.
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
    schema: ColumnSchema,
}

impl Dataset {
    /// Wrap a frame, tagging columns from their dtypes.
    pub fn new(frame: DataFrame) -> Self {
        let schema = ColumnSchema::from_frame(&frame);
        Self { frame, schema }
    }

    /// Wrap a frame with an explicit schema.
    ///
    /// The schema must name the frame's columns in the frame's order, and may
    /// only tag numeric dtypes as [`ColumnKind::Numeric`]. A numeric dtype may
    /// be declared categorical.
    pub fn with_schema(frame: DataFrame, schema: ColumnSchema) -> Result<Self> {
        let frame_names: Vec<&str> = frame
            .get_column_names()
            .into_iter()
            .map(|n| n.as_str())
            .collect();

        if frame_names != schema.names() {
            return Err(CleaningError::SchemaMismatch(format!(
                "schema columns {:?} do not match dataset columns {:?}",
                schema.names(),
                frame_names
            )));
        }

        for spec in schema.iter() {
            let column = frame
                .column(&spec.name)
                .map_err(|_| CleaningError::ColumnNotFound(spec.name.clone()))?;
            if spec.kind == ColumnKind::Numeric && !is_numeric_dtype(column.dtype()) {
                return Err(CleaningError::SchemaMismatch(format!(
                    "column '{}' is declared numeric but holds {} values",
                    spec.name,
                    column.dtype()
                )));
            }
        }

        Ok(Self { frame, schema })
    }

    /// Build a dataset that shares this dataset's schema.
    pub(crate) fn derive(&self, frame: DataFrame) -> Self {
        Self {
            frame,
            schema: self.schema.clone(),
        }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn width(&self) -> usize {
        self.frame.width()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        self.frame.shape()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Total number of missing cells, counting NaN in float columns.
    pub fn missing_count(&self) -> usize {
        self.frame
            .get_columns()
            .iter()
            .map(crate::utils::missing_count)
            .sum()
    }

    /// First `n` rows, for previews.
    pub fn head(&self, n: usize) -> DataFrame {
        self.frame.head(Some(n))
    }

    /// Cell-by-cell equality where missing equals missing.
    pub fn same_data(&self, other: &Dataset) -> bool {
        self.schema == other.schema && self.frame.equals_missing(&other.frame)
    }
}

// ============================================================================
// Reports
// ============================================================================

/// Missing count for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMissing {
    pub column: String,
    pub count: usize,
}

/// Per-column missing value counts taken after duplicate removal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingValueReport {
    /// Missing cells across the whole dataset.
    pub total_missing: usize,
    /// Every column in schema order, including zero counts.
    pub missing_by_column: Vec<ColumnMissing>,
}

impl MissingValueReport {
    /// Columns with at least one missing value, for display.
    pub fn nonzero(&self) -> impl Iterator<Item = &ColumnMissing> {
        self.missing_by_column.iter().filter(|c| c.count > 0)
    }

    pub fn count_for(&self, column: &str) -> Option<usize> {
        self.missing_by_column
            .iter()
            .find(|c| c.column == column)
            .map(|c| c.count)
    }
}

/// One line of the imputation log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ImputationLogEntry {
    /// Missing values of a numeric column were replaced with its mean.
    MeanFilled {
        column: String,
        filled: usize,
        mean: f64,
    },
    /// Rows were removed because a categorical column was missing.
    RowsDropped { column: String, rows: usize },
}

impl ImputationLogEntry {
    pub fn column(&self) -> &str {
        match self {
            Self::MeanFilled { column, .. } | Self::RowsDropped { column, .. } => column,
        }
    }
}

impl fmt::Display for ImputationLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MeanFilled {
                column,
                filled,
                mean,
            } => write!(
                f,
                "Filled {} missing values in column {} with mean = {}",
                filled, column, mean
            ),
            Self::RowsDropped { column, rows } => write!(
                f,
                "Dropped {} rows due to missing values in column {}",
                rows, column
            ),
        }
    }
}

/// Statistics of a finished run, ready for display or serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningSummary {
    /// Label used for export file names.
    pub dataset_name: String,
    /// Shape of the input before cleaning.
    pub rows_before: usize,
    pub columns_before: usize,
    /// Rows that repeated an earlier row.
    pub total_duplicate_count: usize,
    /// Missing values found after duplicate removal.
    pub missing: MissingValueReport,
    /// What the imputation engine did, in column order.
    pub imputation_log: Vec<ImputationLogEntry>,
    /// Shape of the cleaned dataset.
    pub rows_after: usize,
    pub columns_after: usize,
    /// Wall-clock time of the run.
    pub duration_ms: u64,
}

impl CleaningSummary {
    /// Rows lost to categorical drops (duplicates excluded).
    pub fn rows_dropped_for_missing(&self) -> usize {
        self.imputation_log
            .iter()
            .map(|entry| match entry {
                ImputationLogEntry::RowsDropped { rows, .. } => *rows,
                ImputationLogEntry::MeanFilled { .. } => 0,
            })
            .sum()
    }

    /// Missing cells replaced by a column mean.
    pub fn values_filled(&self) -> usize {
        self.imputation_log
            .iter()
            .map(|entry| match entry {
                ImputationLogEntry::MeanFilled { filled, .. } => *filled,
                ImputationLogEntry::RowsDropped { .. } => 0,
            })
            .sum()
    }
}

/// What a completed run hands to the presentation/export side.
#[derive(Debug, Clone)]
pub struct CleaningOutcome {
    /// Deduplicated and imputed dataset.
    pub cleaned: Dataset,
    /// Removed duplicate rows; `None` when there were none.
    pub duplicates: Option<Dataset>,
    pub summary: CleaningSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> DataFrame {
        df!(
            "age" => [Some(30i64), None, Some(40)],
            "city" => [Some("Oslo"), Some("Lima"), None],
            "vip" => [true, false, true]
        )
        .unwrap()
    }

    #[test]
    fn test_schema_from_frame() {
        let schema = ColumnSchema::from_frame(&sample_frame());
        assert_eq!(schema.names(), vec!["age", "city", "vip"]);
        assert_eq!(schema.kind_of("age"), Some(ColumnKind::Numeric));
        assert_eq!(schema.kind_of("city"), Some(ColumnKind::Categorical));
        assert_eq!(schema.kind_of("vip"), Some(ColumnKind::Categorical));
        assert_eq!(schema.kind_of("missing"), None);
    }

    #[test]
    fn test_with_schema_rejects_reordered_columns() {
        let schema = ColumnSchema::new(vec![
            ColumnSpec::new("city", ColumnKind::Categorical),
            ColumnSpec::new("age", ColumnKind::Numeric),
            ColumnSpec::new("vip", ColumnKind::Categorical),
        ]);
        let err = Dataset::with_schema(sample_frame(), schema).unwrap_err();
        assert_eq!(err.error_code(), "SCHEMA_MISMATCH");
    }

    #[test]
    fn test_with_schema_rejects_text_declared_numeric() {
        let schema = ColumnSchema::new(vec![
            ColumnSpec::new("age", ColumnKind::Numeric),
            ColumnSpec::new("city", ColumnKind::Numeric),
            ColumnSpec::new("vip", ColumnKind::Categorical),
        ]);
        let err = Dataset::with_schema(sample_frame(), schema).unwrap_err();
        assert!(err.to_string().contains("city"));
    }

    #[test]
    fn test_with_schema_allows_numeric_as_categorical() {
        let schema = ColumnSchema::new(vec![
            ColumnSpec::new("age", ColumnKind::Categorical),
            ColumnSpec::new("city", ColumnKind::Categorical),
            ColumnSpec::new("vip", ColumnKind::Categorical),
        ]);
        let dataset = Dataset::with_schema(sample_frame(), schema).unwrap();
        assert_eq!(dataset.schema().kind_of("age"), Some(ColumnKind::Categorical));
    }

    #[test]
    fn test_dataset_missing_count_and_shape() {
        let dataset = Dataset::new(sample_frame());
        assert_eq!(dataset.shape(), (3, 3));
        assert_eq!(dataset.missing_count(), 2);
        assert!(!dataset.is_empty());
    }

    #[test]
    fn test_log_entry_display() {
        let filled = ImputationLogEntry::MeanFilled {
            column: "age".to_string(),
            filled: 1,
            mean: 2.0,
        };
        assert_eq!(
            filled.to_string(),
            "Filled 1 missing values in column age with mean = 2"
        );

        let dropped = ImputationLogEntry::RowsDropped {
            column: "city".to_string(),
            rows: 3,
        };
        assert_eq!(
            dropped.to_string(),
            "Dropped 3 rows due to missing values in column city"
        );
    }

    #[test]
    fn test_log_entry_json_tag() {
        let entry = ImputationLogEntry::RowsDropped {
            column: "city".to_string(),
            rows: 2,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"action\":\"rows_dropped\""));
        assert!(json.contains("\"rows\":2"));
    }

    #[test]
    fn test_missing_report_nonzero() {
        let report = MissingValueReport {
            total_missing: 2,
            missing_by_column: vec![
                ColumnMissing { column: "a".to_string(), count: 0 },
                ColumnMissing { column: "b".to_string(), count: 2 },
            ],
        };
        let nonzero: Vec<_> = report.nonzero().map(|c| c.column.as_str()).collect();
        assert_eq!(nonzero, vec!["b"]);
        assert_eq!(report.count_for("a"), Some(0));
    }
}
