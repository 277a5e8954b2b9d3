//! Missing value accounting.

use crate::types::{ColumnMissing, Dataset, MissingValueReport};
use crate::utils::missing_count;

/// Counts missing cells per column. Never modifies the dataset.
pub struct MissingValueAnalyzer;

impl MissingValueAnalyzer {
    /// Count missing values (null, or NaN in float columns) for every column
    /// in schema order.
    pub fn analyze(dataset: &Dataset) -> MissingValueReport {
        let missing_by_column: Vec<ColumnMissing> = dataset
            .frame()
            .get_columns()
            .iter()
            .map(|col| ColumnMissing {
                column: col.name().to_string(),
                count: missing_count(col),
            })
            .collect();

        let total_missing = missing_by_column.iter().map(|c| c.count).sum();

        MissingValueReport {
            total_missing,
            missing_by_column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_counts_every_column() {
        let dataset = Dataset::new(
            df!(
                "a" => [Some(1i64), None, None],
                "b" => [Some("x"), Some("y"), Some("z")],
                "c" => [None::<f64>, Some(1.0), Some(2.0)]
            )
            .unwrap(),
        );

        let report = MissingValueAnalyzer::analyze(&dataset);

        assert_eq!(report.total_missing, 3);
        assert_eq!(
            report.missing_by_column,
            vec![
                ColumnMissing { column: "a".to_string(), count: 2 },
                ColumnMissing { column: "b".to_string(), count: 0 },
                ColumnMissing { column: "c".to_string(), count: 1 },
            ]
        );
        assert_eq!(report.nonzero().count(), 2);
    }

    #[test]
    fn test_nan_is_counted_as_missing() {
        let dataset = Dataset::new(df!("x" => [Some(1.0), Some(f64::NAN), None]).unwrap());
        let report = MissingValueAnalyzer::analyze(&dataset);
        assert_eq!(report.total_missing, 2);
    }

    #[test]
    fn test_clean_dataset_reports_zero() {
        let dataset = Dataset::new(df!("a" => [1i64, 2]).unwrap());
        let report = MissingValueAnalyzer::analyze(&dataset);
        assert_eq!(report.total_missing, 0);
        assert_eq!(report.nonzero().count(), 0);
        assert_eq!(report.missing_by_column.len(), 1);
    }
}
