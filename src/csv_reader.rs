// CSV import: raw records in, typed DataTable out

use crate::data::{DataTable, Field};
use anyhow::{Context, Result};
use std::io::{self, Read};

/// Read a table from any CSV source.
///
/// Columns where every field parses as a finite number become numeric; any
/// other column is read as categories. Ragged records are passed through so
/// the table reports the shape error.
pub fn read_table<R: Read>(reader: R, has_headers: bool) -> Result<DataTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = if has_headers {
        Some(
            csv_reader
                .headers()
                .context("Failed to read CSV headers")?
                .iter()
                .map(String::from)
                .collect::<Vec<_>>(),
        )
    } else {
        None
    };

    let mut records: Vec<Vec<String>> = Vec::new();
    for (idx, record) in csv_reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read CSV record {}", idx))?;
        records.push(record.iter().map(String::from).collect());
    }

    let numeric = infer_numeric_columns(&records);
    let rows: Vec<Vec<Field>> = records
        .into_iter()
        .map(|record| {
            record
                .into_iter()
                .enumerate()
                .map(|(col, raw)| match parse_number(&raw) {
                    Some(v) if numeric.get(col).copied().unwrap_or(false) => Field::Numeric(v),
                    _ => Field::Category(raw),
                })
                .collect()
        })
        .collect();

    let table = DataTable::new(rows).context("Invalid CSV data")?;
    Ok(match headers {
        Some(headers) => table.with_headers(headers),
        None => table,
    })
}

/// Read a table from stdin.
pub fn read_table_from_stdin(has_headers: bool) -> Result<DataTable> {
    let stdin = io::stdin();
    read_table(stdin.lock(), has_headers)
}

fn infer_numeric_columns(records: &[Vec<String>]) -> Vec<bool> {
    let width = records.iter().map(Vec::len).max().unwrap_or(0);
    (0..width)
        .map(|col| {
            records
                .iter()
                .filter_map(|r| r.get(col))
                .all(|raw| parse_number(raw).is_some())
        })
        .collect()
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ColumnType;

    #[test]
    fn test_read_numeric_table() {
        let csv = "x,y\n1,10\n2,20.5\n";
        let table = read_table(csv.as_bytes(), true).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.header(0), Some("x"));
        assert_eq!(table.numeric_column(1).unwrap(), vec![10.0, 20.5]);
    }

    #[test]
    fn test_read_categorical_column() {
        let csv = "month, sales\nJan, 3\nFeb, 5\n";
        let table = read_table(csv.as_bytes(), true).unwrap();
        assert_eq!(table.column_type(0), Some(ColumnType::Categorical));
        assert_eq!(table.column_type(1), Some(ColumnType::Numeric));
        assert_eq!(table.labels(0).unwrap(), vec!["Jan", "Feb"]);
        assert_eq!(table.header(1), Some("sales"));
    }

    #[test]
    fn test_mixed_column_is_categorical() {
        // One non-numeric field turns the whole column into categories
        let csv = "1,10\n2,20\nthree,30\n";
        let table = read_table(csv.as_bytes(), false).unwrap();
        assert!(table.is_categorical(0));
        assert_eq!(table.labels(0).unwrap(), vec!["1", "2", "three"]);
        assert_eq!(table.header(0), None);
    }

    #[test]
    fn test_non_finite_is_categorical() {
        let csv = "x,y\nNaN,1\ninf,2\n";
        let table = read_table(csv.as_bytes(), true).unwrap();
        assert!(table.is_categorical(0));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let csv = "x,y\n1,2\n3\n";
        let err = read_table(csv.as_bytes(), true).unwrap_err();
        assert!(format!("{:#}", err).contains("row 1"));
    }

    #[test]
    fn test_headers_only() {
        let table = read_table("x,y\n".as_bytes(), true).unwrap();
        assert!(table.is_empty());
    }
}
