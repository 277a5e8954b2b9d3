//! Shared utilities for the cleaning pipeline.
//!
//! Small helpers over polars types used by more than one module.

use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

// =============================================================================
// Series Utilities
// =============================================================================

/// Number of NaN cells in a float Series. Zero for every other dtype.
pub fn nan_count(series: &Series) -> usize {
    if let Ok(values) = series.f64() {
        values.into_iter().filter(|v| v.is_some_and(f64::is_nan)).count()
    } else if let Ok(values) = series.f32() {
        values.into_iter().filter(|v| v.is_some_and(f32::is_nan)).count()
    } else {
        0
    }
}

/// Missing cells in a column: nulls, plus NaN in float columns.
pub fn missing_count(column: &Column) -> usize {
    column.null_count() + nan_count(column.as_materialized_series())
}

/// `true` for every row whose value is present (neither null nor NaN).
pub fn present_mask(series: &Series) -> BooleanChunked {
    if nan_count(series) == 0 {
        return series.is_not_null();
    }
    let keep: Vec<bool> = match series.f64() {
        Ok(values) => values.into_iter().map(|v| v.is_some_and(|x| !x.is_nan())).collect(),
        Err(_) => series
            .f32()
            .map(|values| values.into_iter().map(|v| v.is_some_and(|x| !x.is_nan())).collect())
            .unwrap_or_default(),
    };
    row_mask(&keep)
}

/// Arithmetic mean of the present values of a numeric Series.
///
/// Nulls and NaN are skipped. Returns `None` when there is nothing to average.
pub fn numeric_mean(series: &Series) -> PolarsResult<Option<f64>> {
    let values = series.cast(&DataType::Float64)?;
    let (sum, count) = values
        .f64()?
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        return Ok(None);
    }
    let mean = sum / count as f64;
    Ok((!mean.is_nan()).then_some(mean))
}

/// Fill missing values (null or NaN) in a numeric Series with a specific value.
///
/// The result is always `Float64`, the same widening a mean fill implies for
/// integer columns.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let values = series.cast(&DataType::Float64)?;
    let filled: Vec<f64> = values
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()).unwrap_or(fill_value))
        .collect();

    Ok(Series::new(series.name().clone(), filled))
}

/// Build a row mask from plain booleans.
pub fn row_mask(keep: &[bool]) -> BooleanChunked {
    BooleanChunked::from_slice(PlSmallStr::from_static("mask"), keep)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(is_numeric_dtype(&DataType::UInt8));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
        assert!(!is_numeric_dtype(&DataType::Date));
    }

    #[test]
    fn test_numeric_mean_skips_nulls() {
        let series = Series::new("x".into(), &[Some(1i64), None, Some(3)]);
        assert_eq!(numeric_mean(&series).unwrap(), Some(2.0));
    }

    #[test]
    fn test_numeric_mean_all_null() {
        let series = Series::new("x".into(), &[None::<f64>, None]);
        assert_eq!(numeric_mean(&series).unwrap(), None);
    }

    #[test]
    fn test_fill_numeric_nulls() {
        let series = Series::new("test".into(), &[Some(1.0), None, Some(3.0)]);
        let filled = fill_numeric_nulls(&series, 0.0).unwrap();

        assert_eq!(filled.null_count(), 0);
        assert_eq!(filled.get(0).unwrap().try_extract::<f64>().unwrap(), 1.0);
        assert_eq!(filled.get(1).unwrap().try_extract::<f64>().unwrap(), 0.0);
        assert_eq!(filled.get(2).unwrap().try_extract::<f64>().unwrap(), 3.0);
    }

    #[test]
    fn test_fill_numeric_nulls_widens_integers() {
        let series = Series::new("n".into(), &[Some(2i64), None]);
        let filled = fill_numeric_nulls(&series, 2.5).unwrap();
        assert_eq!(filled.dtype(), &DataType::Float64);
        assert_eq!(filled.name().as_str(), "n");
    }

    #[test]
    fn test_nan_counts_as_missing() {
        let column = Series::new("x".into(), &[Some(1.0), Some(f64::NAN), None]).into_column();
        assert_eq!(missing_count(&column), 2);

        let ints = Series::new("n".into(), &[Some(1i64), None]).into_column();
        assert_eq!(missing_count(&ints), 1);
    }

    #[test]
    fn test_numeric_mean_skips_nan() {
        let series = Series::new("x".into(), &[Some(1.0), Some(f64::NAN), None, Some(3.0)]);
        assert_eq!(numeric_mean(&series).unwrap(), Some(2.0));

        let only_nan = Series::new("x".into(), &[Some(f64::NAN), None]);
        assert_eq!(numeric_mean(&only_nan).unwrap(), None);
    }

    #[test]
    fn test_fill_replaces_nan() {
        let series = Series::new("x".into(), &[Some(1.0), Some(f64::NAN), None]);
        let filled = fill_numeric_nulls(&series, 1.0).unwrap();
        let values: Vec<Option<f64>> = filled.f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(1.0), Some(1.0), Some(1.0)]);
    }

    #[test]
    fn test_present_mask_drops_null_and_nan() {
        let series = Series::new("x".into(), &[Some(1.0f32), Some(f32::NAN), None]);
        let kept: Vec<Option<bool>> = present_mask(&series).into_iter().collect();
        assert_eq!(kept, vec![Some(true), Some(false), Some(false)]);

        let text = Series::new("s".into(), &[Some("a"), None]);
        let kept: Vec<Option<bool>> = present_mask(&text).into_iter().collect();
        assert_eq!(kept, vec![Some(true), Some(false)]);
    }

    #[test]
    fn test_row_mask() {
        let mask = row_mask(&[true, false, true]);
        assert_eq!(mask.len(), 3);
        let kept = mask.into_iter().filter(|v| *v == Some(true)).count();
        assert_eq!(kept, 2);
    }
}
