//! Excel (.xlsx) ingestion.
//!
//! Reads the first worksheet. The first row holds the column names; every
//! following row is a record. Column dtypes are decided from the cell types
//! actually present, ignoring empty cells.

use super::csv::NA_MARKERS;
use crate::error::{CleaningError, Result};
use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use polars::prelude::*;
use std::collections::HashMap;
use std::io::Cursor;

fn parse_failure(reason: impl ToString) -> CleaningError {
    CleaningError::ParseFailure {
        format: "Excel".to_string(),
        reason: reason.to_string(),
    }
}

/// Parse workbook bytes into a frame.
pub fn read_xlsx(bytes: &[u8]) -> Result<DataFrame> {
    let mut workbook: Xlsx<_> =
        open_workbook_from_rs(Cursor::new(bytes.to_vec())).map_err(parse_failure)?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| parse_failure("workbook has no worksheet"))?
        .map_err(parse_failure)?;

    let rows: Vec<&[Data]> = range.rows().collect();
    frame_from_rows(&rows)
}

/// Build a frame from a header row followed by data rows.
pub(crate) fn frame_from_rows(rows: &[&[Data]]) -> Result<DataFrame> {
    let Some((header, records)) = rows.split_first() else {
        return Ok(DataFrame::empty());
    };

    let names = header_names(header);
    let columns = names
        .into_iter()
        .enumerate()
        .map(|(idx, name)| {
            let cells: Vec<&Data> = records
                .iter()
                .map(|row| row.get(idx).unwrap_or(&Data::Empty))
                .collect();
            build_column(name, &cells)
        })
        .collect::<Vec<Column>>();

    DataFrame::new(columns).map_err(parse_failure)
}

/// Column names from the header row. Blank cells become `Unnamed: {index}`
/// and repeated names get a `.{n}` suffix.
fn header_names(header: &[Data]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();

    header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let base = match cell {
                Data::Empty => format!("Unnamed: {}", idx),
                Data::String(s) if s.trim().is_empty() => format!("Unnamed: {}", idx),
                other => other.to_string(),
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{}.{}", base, count)
            };
            *count += 1;
            name
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellType {
    Integer,
    Float,
    Boolean,
    Text,
}

fn is_missing(cell: &Data) -> bool {
    match cell {
        Data::Empty | Data::Error(_) => true,
        Data::String(s) => NA_MARKERS.contains(&s.as_str()),
        _ => false,
    }
}

fn cell_type(cell: &Data) -> Option<CellType> {
    if is_missing(cell) {
        return None;
    }
    match cell {
        Data::Int(_) => Some(CellType::Integer),
        Data::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            Some(CellType::Integer)
        }
        Data::Float(_) => Some(CellType::Float),
        Data::Bool(_) => Some(CellType::Boolean),
        _ => Some(CellType::Text),
    }
}

fn column_type(cells: &[&Data]) -> CellType {
    cells
        .iter()
        .filter_map(|cell| cell_type(cell))
        .reduce(|acc, next| match (acc, next) {
            (a, b) if a == b => a,
            (CellType::Integer, CellType::Float) | (CellType::Float, CellType::Integer) => {
                CellType::Float
            }
            _ => CellType::Text,
        })
        .unwrap_or(CellType::Text)
}

fn as_f64(cell: &Data) -> Option<f64> {
    match cell {
        Data::Int(i) => Some(*i as f64),
        Data::Float(f) => Some(*f),
        _ => None,
    }
}

fn build_column(name: String, cells: &[&Data]) -> Column {
    let name = PlSmallStr::from(name);

    match column_type(cells) {
        CellType::Integer => {
            let values: Vec<Option<i64>> = cells
                .iter()
                .map(|cell| match cell {
                    Data::Int(i) => Some(*i),
                    Data::Float(f) => Some(*f as i64),
                    _ => None,
                })
                .collect();
            Series::new(name, values).into_column()
        }
        CellType::Float => {
            let values: Vec<Option<f64>> = cells.iter().map(|cell| as_f64(cell)).collect();
            Series::new(name, values).into_column()
        }
        CellType::Boolean => {
            let values: Vec<Option<bool>> = cells
                .iter()
                .map(|cell| match cell {
                    Data::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect();
            Series::new(name, values).into_column()
        }
        CellType::Text => {
            let values: Vec<Option<String>> = cells
                .iter()
                .map(|cell| match cell {
                    missing if is_missing(missing) => None,
                    Data::String(s) => Some(s.clone()),
                    other => Some(other.to_string()),
                })
                .collect();
            Series::new(name, values).into_column()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;
    use pretty_assertions::assert_eq;

    fn frame(rows: Vec<Vec<Data>>) -> DataFrame {
        let borrowed: Vec<&[Data]> = rows.iter().map(|r| r.as_slice()).collect();
        frame_from_rows(&borrowed).unwrap()
    }

    #[test]
    fn test_column_types_follow_cells() {
        let df = frame(vec![
            vec![
                Data::String("id".into()),
                Data::String("price".into()),
                Data::String("ok".into()),
                Data::String("city".into()),
            ],
            vec![Data::Float(1.0), Data::Float(2.5), Data::Bool(true), Data::String("Oslo".into())],
            vec![Data::Int(2), Data::Empty, Data::Bool(false), Data::Empty],
        ]);

        assert_eq!(df.shape(), (2, 4));
        assert_eq!(df.column("id").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("price").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("ok").unwrap().dtype(), &DataType::Boolean);
        assert_eq!(df.column("city").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("price").unwrap().null_count(), 1);
        assert_eq!(df.column("city").unwrap().null_count(), 1);
    }

    #[test]
    fn test_mixed_cells_become_text() {
        let df = frame(vec![
            vec![Data::String("code".into())],
            vec![Data::Int(7)],
            vec![Data::String("A7".into())],
        ]);
        let values: Vec<Option<&str>> = df
            .column("code")
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(values, vec![Some("7"), Some("A7")]);
    }

    #[test]
    fn test_markers_and_error_cells_are_missing() {
        let df = frame(vec![
            vec![Data::String("age".into()), Data::String("city".into())],
            vec![Data::Float(30.0), Data::String("Oslo".into())],
            vec![Data::String("NA".into()), Data::String("N/A".into())],
            vec![Data::Error(CellErrorType::NA), Data::Error(CellErrorType::Value)],
            vec![Data::Float(50.0), Data::String("Rome".into())],
        ]);

        let age = df.column("age").unwrap();
        assert_eq!(age.dtype(), &DataType::Int64);
        assert_eq!(age.null_count(), 2);

        let city = df.column("city").unwrap();
        assert_eq!(city.dtype(), &DataType::String);
        assert_eq!(city.null_count(), 2);
    }

    #[test]
    fn test_blank_and_repeated_headers() {
        let df = frame(vec![
            vec![Data::String("a".into()), Data::Empty, Data::String("a".into())],
            vec![Data::Int(1), Data::Int(2), Data::Int(3)],
        ]);
        let names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["a", "Unnamed: 1", "a.1"]);
    }

    #[test]
    fn test_empty_sheet() {
        let df = frame(vec![]);
        assert_eq!(df.shape(), (0, 0));
    }

    #[test]
    fn test_garbage_bytes_are_parse_failure() {
        let err = read_xlsx(b"definitely not a zip archive").unwrap_err();
        assert_eq!(err.error_code(), "PARSE_FAILURE");
    }
}
