//! Exact duplicate row detection.
//!
//! Rows are compared whole, field by field. Missing values compare equal to
//! each other, so two all-null rows are duplicates.

use crate::error::{Result, ResultExt};
use crate::types::Dataset;
use crate::utils::row_mask;
use polars::prelude::*;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Hashable form of a single cell.
///
/// Floats are keyed by bit pattern after folding `-0.0` into `0.0`. NaN is a
/// missing value and keys like null. Text is interned per column, so keys
/// stay fixed-size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CellKey {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(u64),
    Text(u32),
}

impl CellKey {
    fn float(v: Option<f64>) -> Self {
        match v {
            None => Self::Null,
            Some(v) if v.is_nan() => Self::Null,
            Some(v) if v == 0.0 => Self::Float(0.0f64.to_bits()),
            Some(v) => Self::Float(v.to_bits()),
        }
    }
}

/// Keys for every cell of one column, top to bottom.
fn column_keys(column: &Column) -> PolarsResult<Vec<CellKey>> {
    let series = column.as_materialized_series();
    let dtype = series.dtype();

    let keys: Vec<CellKey> = if dtype == &DataType::Boolean {
        series
            .bool()?
            .into_iter()
            .map(|v| v.map_or(CellKey::Null, CellKey::Bool))
            .collect()
    } else if dtype.is_signed_integer() {
        series
            .cast(&DataType::Int64)?
            .i64()?
            .into_iter()
            .map(|v| v.map_or(CellKey::Null, CellKey::Int))
            .collect()
    } else if dtype.is_unsigned_integer() {
        series
            .cast(&DataType::UInt64)?
            .u64()?
            .into_iter()
            .map(|v| v.map_or(CellKey::Null, CellKey::UInt))
            .collect()
    } else if dtype.is_float() {
        series
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(CellKey::float)
            .collect()
    } else {
        let text = series.cast(&DataType::String)?;
        let mut ids: HashMap<&str, u32> = HashMap::new();
        text.str()?
            .into_iter()
            .map(|v| match v {
                None => CellKey::Null,
                Some(s) => {
                    let next = ids.len() as u32;
                    CellKey::Text(*ids.entry(s).or_insert(next))
                }
            })
            .collect()
    };
    Ok(keys)
}

/// Result of duplicate detection on one dataset.
#[derive(Debug, Clone)]
pub struct DuplicateReport {
    /// Number of rows that repeat an earlier row.
    pub total_duplicate_count: usize,
    /// The repeating rows in original order; `None` when there are none.
    pub duplicate_records: Option<Dataset>,
    /// First occurrences only, in original order.
    pub deduplicated: Dataset,
}

/// Finds and separates exact duplicate rows.
pub struct DuplicateDetector;

impl DuplicateDetector {
    /// Flag every row that repeats an earlier row.
    ///
    /// The first occurrence of each distinct row is never flagged.
    pub fn duplicate_mask(dataset: &Dataset) -> Result<Vec<bool>> {
        let frame = dataset.frame();
        let height = frame.height();
        let width = frame.width();
        if width == 0 {
            return Ok(vec![false; height]);
        }

        // Row-major: cell (row, col) lives at row * width + col.
        let mut cells = vec![CellKey::Null; height * width];
        for (col, column) in frame.get_columns().iter().enumerate() {
            let keys = column_keys(column)
                .context(format!("Reading column '{}'", column.name()))?;
            for (row, key) in keys.into_iter().enumerate() {
                cells[row * width + col] = key;
            }
        }

        let mut seen: HashSet<&[CellKey]> = HashSet::with_capacity(height);
        Ok(cells.chunks(width).map(|row| !seen.insert(row)).collect())
    }

    /// Copy out the rows flagged in `is_duplicate`, or `None` if there are none.
    pub fn extract_duplicates(dataset: &Dataset, is_duplicate: &[bool]) -> Result<Option<Dataset>> {
        if !is_duplicate.contains(&true) {
            return Ok(None);
        }
        let duplicates = dataset
            .frame()
            .filter(&row_mask(is_duplicate))
            .context("Extracting duplicate rows")?;
        Ok(Some(dataset.derive(duplicates)))
    }

    /// Keep only the rows not flagged in `is_duplicate`.
    pub fn remove_duplicates(dataset: &Dataset, is_duplicate: &[bool]) -> Result<Dataset> {
        if !is_duplicate.contains(&true) {
            return Ok(dataset.clone());
        }
        let keep: Vec<bool> = is_duplicate.iter().map(|d| !d).collect();
        let deduplicated = dataset
            .frame()
            .filter(&row_mask(&keep))
            .context("Removing duplicate rows")?;
        Ok(dataset.derive(deduplicated))
    }

    /// Split a dataset into its first occurrences and its repeats.
    pub fn detect(dataset: &Dataset) -> Result<DuplicateReport> {
        let is_duplicate = Self::duplicate_mask(dataset)?;
        let total_duplicate_count = is_duplicate.iter().filter(|d| **d).count();
        debug!(
            "Found {} duplicate rows out of {}",
            total_duplicate_count,
            dataset.height()
        );

        Ok(DuplicateReport {
            total_duplicate_count,
            duplicate_records: Self::extract_duplicates(dataset, &is_duplicate)?,
            deduplicated: Self::remove_duplicates(dataset, &is_duplicate)?,
        })
    }
}
