//! CSV export of datasets.
//!
//! Output is UTF-8, comma-separated, with a header line and no index column.
//! Fields are quoted only when they contain the separator, a quote or a line
//! break.

use crate::error::{CleaningError, Result};
use crate::types::Dataset;
use polars::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

fn export_failed(path: &Path, reason: impl ToString) -> CleaningError {
    CleaningError::ExportFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Serialize a dataset into any writer.
pub fn write_csv_to<W: Write>(dataset: &Dataset, writer: &mut W) -> PolarsResult<()> {
    let mut frame = dataset.frame().clone();
    CsvWriter::new(writer)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .with_quote_style(QuoteStyle::Necessary)
        .finish(&mut frame)
}

/// Serialize a dataset into an in-memory CSV document, e.g. for a download
/// button.
pub fn to_csv_bytes(dataset: &Dataset) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_csv_to(dataset, &mut buffer)?;
    Ok(buffer)
}

/// Write a dataset to `path`, creating parent directories as needed.
pub fn write_csv(dataset: &Dataset, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| export_failed(path, e))?;
    }

    let mut file = File::create(path).map_err(|e| export_failed(path, e))?;
    write_csv_to(dataset, &mut file).map_err(|e| export_failed(path, e))?;
    file.flush().map_err(|e| export_failed(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_quotes_only_where_needed() {
        let dataset = Dataset::new(
            df!(
                "name" => ["plain", "a,b", "say \"hi\""],
                "n" => [1i64, 2, 3]
            )
            .unwrap(),
        );

        let text = String::from_utf8(to_csv_bytes(&dataset).unwrap()).unwrap();
        assert_eq!(
            text,
            "name,n\nplain,1\n\"a,b\",2\n\"say \"\"hi\"\"\",3\n"
        );
    }

    #[test]
    fn test_empty_dataset_writes_header() {
        let frame = DataFrame::new(vec![
            Series::new_empty("a".into(), &DataType::Int64).into_column(),
            Series::new_empty("b".into(), &DataType::String).into_column(),
        ])
        .unwrap();
        let text = String::from_utf8(to_csv_bytes(&Dataset::new(frame)).unwrap()).unwrap();
        assert_eq!(text, "a,b\n");
    }
}
