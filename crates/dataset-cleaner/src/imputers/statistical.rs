//! Statistical imputation methods.
//!
//! Provides mean filling for numeric columns and row removal for
//! categorical columns. Both take a frame and return a new one.

use crate::error::{CleaningError, Result, ResultExt};
use crate::types::ImputationLogEntry;
use crate::utils::{fill_numeric_nulls, missing_count, numeric_mean, present_mask};
use polars::prelude::*;

/// Statistical imputation methods for resolving missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Replace every missing value (null or NaN) in a numeric column with the
    /// column mean.
    ///
    /// The mean is taken over the values present in `df` at call time.
    /// Returns `None` when the column has nothing missing.
    ///
    /// # Errors
    ///
    /// [`CleaningError::UndefinedMean`] if every value in the column is missing.
    pub fn apply_numeric_mean(
        df: &DataFrame,
        col_name: &str,
    ) -> Result<Option<(DataFrame, ImputationLogEntry)>> {
        let column = df
            .column(col_name)
            .map_err(|_| CleaningError::ColumnNotFound(col_name.to_string()))?;

        let missing = missing_count(column);
        if missing == 0 {
            return Ok(None);
        }

        let series = column.as_materialized_series();
        let mean = numeric_mean(series)
            .context(format!("Computing mean of '{}'", col_name))?
            .ok_or_else(|| CleaningError::UndefinedMean(col_name.to_string()))?;

        let filled = fill_numeric_nulls(series, mean)
            .context(format!("Filling '{}' with mean", col_name))?;

        let mut result = df.clone();
        result
            .replace(col_name, filled)
            .context(format!("Replacing column '{}'", col_name))?;

        Ok(Some((
            result,
            ImputationLogEntry::MeanFilled {
                column: col_name.to_string(),
                filled: missing,
                mean,
            },
        )))
    }

    /// Remove every row whose value in `col_name` is missing.
    ///
    /// Returns `None` when the column has nothing missing.
    pub fn drop_missing_rows(
        df: &DataFrame,
        col_name: &str,
    ) -> Result<Option<(DataFrame, ImputationLogEntry)>> {
        let column = df
            .column(col_name)
            .map_err(|_| CleaningError::ColumnNotFound(col_name.to_string()))?;

        if missing_count(column) == 0 {
            return Ok(None);
        }

        let before_rows = df.height();
        let mask = present_mask(column.as_materialized_series());
        let result = df
            .filter(&mask)
            .context(format!("Dropping rows missing '{}'", col_name))?;
        let after_rows = result.height();

        Ok(Some((
            result,
            ImputationLogEntry::RowsDropped {
                column: col_name.to_string(),
                rows: before_rows - after_rows,
            },
        )))
    }
}
