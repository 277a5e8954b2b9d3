//! CSV ingestion.

use crate::error::{CleaningError, Result};
use polars::prelude::*;
use std::io::Cursor;
use tracing::debug;

/// Cell contents read as missing, matching what spreadsheet tools and pandas
/// export for empty cells.
pub const NA_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NULL", "null", "NaN", "nan", "None", "#N/A", "<NA>",
];

fn read_with(bytes: &[u8], infer_schema_length: Option<usize>, ragged: bool) -> PolarsResult<DataFrame> {
    let markers: Vec<PlSmallStr> = NA_MARKERS.iter().map(|m| PlSmallStr::from(*m)).collect();

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(infer_schema_length)
        .map_parse_options(|opts| {
            opts.with_encoding(CsvEncoding::LossyUtf8)
                .with_quote_char(Some(b'"'))
                .with_null_values(Some(NullValues::AllColumns(markers.clone())))
                .with_truncate_ragged_lines(ragged)
        })
        .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
        .finish()
}

/// Parse CSV bytes into a frame.
///
/// A strict read is tried first. If it fails, the read is retried with the
/// dtypes inferred from every row, so a column that only turns fractional or
/// textual late in the file still parses. A last retry also truncates or pads
/// ragged lines to the header width.
pub fn read_csv(bytes: &[u8], infer_schema_length: Option<usize>) -> Result<DataFrame> {
    let strict = match read_with(bytes, infer_schema_length, false) {
        Ok(df) => return Ok(df),
        Err(e) => e,
    };
    debug!("Strict CSV read failed: {}", strict);

    if infer_schema_length.is_some() {
        match read_with(bytes, None, false) {
            Ok(df) => return Ok(df),
            Err(e) => debug!("Full-scan CSV read failed: {}", e),
        }
    }

    read_with(bytes, None, true).map_err(|e| CleaningError::ParseFailure {
        format: "CSV".to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_header_and_types() {
        let df = read_csv(b"id,name,score\n1,ann,2.5\n2,bob,3.0\n", Some(100)).unwrap();
        assert_eq!(df.shape(), (2, 3));
        assert_eq!(df.column("id").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("name").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("score").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn test_na_markers_are_missing() {
        let df = read_csv(b"x,y\n1,a\nNA,\n3,N/A\n,null\n", Some(100)).unwrap();
        assert_eq!(df.column("x").unwrap().null_count(), 2);
        assert_eq!(df.column("y").unwrap().null_count(), 3);
        assert_eq!(df.column("x").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn test_header_only_gives_zero_rows() {
        let df = read_csv(b"a,b\n", Some(100)).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 2);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let df = read_csv(b"name\ncaf\xe9\nbar\n", Some(100)).unwrap();
        assert_eq!(df.height(), 2);
    }

    fn late_change(tail: &str) -> Vec<u8> {
        let mut csv = String::from("id,value\n");
        for i in 0..150 {
            csv.push_str(&format!("{},{}\n", i, i));
        }
        csv.push_str(&format!("150,{}\n", tail));
        csv.into_bytes()
    }

    #[test]
    fn test_late_float_widens_integer_column() {
        let df = read_csv(&late_change("2.5"), Some(100)).unwrap();
        assert_eq!(df.height(), 151);
        assert_eq!(df.column("value").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn test_late_text_makes_column_textual() {
        let df = read_csv(&late_change("A7"), Some(100)).unwrap();
        assert_eq!(df.height(), 151);
        assert_eq!(df.column("value").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("id").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn test_ragged_lines_fall_back() {
        let df = read_csv(b"a,b\n1,2\n3,4,5\n", Some(100)).unwrap();
        assert_eq!(df.width(), 2);
        assert_eq!(df.height(), 2);
    }
}
