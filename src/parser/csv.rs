//! CSV file parser

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::model::{CellValue, Column, Table};

use super::Parser;

/// Parser for CSV files.
///
/// Every field is kept as raw text; typing is left to the cleaning pipeline.
pub struct CsvParser;

impl Parser for CsvParser {
    fn parse(&self, path: &Path, _config: &Config) -> Result<Table> {
        let file =
            File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
        let is_tsv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("tsv"));

        read_csv(BufReader::new(file), if is_tsv { b'\t' } else { b',' })
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "csv" | "tsv" | "txt")
    }
}

/// Read a delimited table from any reader
pub fn read_csv<R: Read>(reader: R, delimiter: u8) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(reader);

    // Read headers
    let headers = csv_reader
        .headers()
        .context("Failed to read CSV headers")?
        .clone();

    let columns: Vec<Column> = headers
        .iter()
        .enumerate()
        .map(|(i, name)| Column::new(name.to_string(), i))
        .collect();

    let mut table = Table::new(columns);

    // Read rows
    for (line_num, result) in csv_reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read CSV row {}", line_num + 2))?; // +2 for 1-indexing and header

        let cells: Vec<CellValue> = record.iter().map(CellValue::from).collect();
        table.add_row(cells, line_num + 2);
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_stay_raw() {
        let data = "name,amount,when\n  john SMITH ,\"12,5\",03/04/2024\nNA,,\n";
        let table = read_csv(data.as_bytes(), b',').unwrap();

        assert_eq!(table.column_names(), vec!["name", "amount", "when"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(
            table.row(0),
            Some(vec![
                &CellValue::from("  john SMITH "),
                &CellValue::from("12,5"),
                &CellValue::from("03/04/2024"),
            ])
        );
        assert_eq!(table.cell(1, 1), Some(&CellValue::from("")));
        assert_eq!(table.source_lines, vec![2, 3]);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = read_csv("a,b,c\n1\n".as_bytes(), b',').unwrap();
        assert_eq!(
            table.row(0),
            Some(vec![&CellValue::from("1"), &CellValue::Null, &CellValue::Null])
        );
    }

    #[test]
    fn test_tab_delimiter() {
        let table = read_csv("a\tb\nx\ty\n".as_bytes(), b'\t').unwrap();
        assert_eq!(table.column_names(), vec!["a", "b"]);
        assert_eq!(table.cell(0, 1), Some(&CellValue::from("y")));
    }
}
