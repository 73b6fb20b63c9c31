//! Excel file parser (xlsx, xls, ods)

use std::borrow::Cow;
use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::config::Config;
use crate::error::SheetError;
use crate::model::{CellValue, Column, Table};

use super::Parser;

/// Parser for Excel files
pub struct ExcelParser;

impl Parser for ExcelParser {
    fn parse(&self, path: &Path, config: &Config) -> Result<Table> {
        let mut workbook = open_workbook_auto(path)
            .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;

        // Use the requested sheet, else the first one
        let sheet_name = match config.sheet_name {
            Some(ref name) => name.clone(),
            None => workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or(SheetError::NoSheets)?,
        };

        let range: Range<Data> = workbook
            .worksheet_range(&sheet_name)
            .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

        parse_range(&range, &sheet_name)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "xlsx" | "xls" | "ods" | "xlsm")
    }
}

fn parse_range(range: &Range<Data>, sheet_name: &str) -> Result<Table> {
    let mut rows = range.rows();

    // First row is header
    let header_row = rows
        .next()
        .ok_or_else(|| SheetError::EmptySheet(sheet_name.to_string()))?;
    let columns: Vec<Column> = header_row
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let name = cell_to_string(cell);
            Column::new(if name.is_empty() { format!("Column{}", i + 1) } else { name }, i)
        })
        .collect();

    let mut table = Table::new(columns);

    // Ranges may not start at A1; keep source lines in sheet coordinates
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);

    for (line_num, row) in rows.enumerate() {
        let cells: Vec<CellValue> = row.iter().map(convert_cell).collect();
        table.add_row(cells, first_row + line_num + 2); // +2 for 1-indexing and header
    }

    Ok(table)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => format!("{}", dt),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#{:?}", e),
    }
}

/// Map a workbook cell to a raw cell. Strings are kept verbatim.
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => CellValue::Text(Cow::Owned(s.clone())),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(Cow::Owned(b.to_string())),
        Data::DateTime(dt) => dt.as_datetime().map(CellValue::Timestamp).unwrap_or_else(|| {
            let s = format!("{}", dt);
            parse_iso(&s).unwrap_or(CellValue::Text(Cow::Owned(s)))
        }),
        Data::DateTimeIso(s) => parse_iso(s).unwrap_or_else(|| CellValue::Text(Cow::Owned(s.clone()))),
        Data::DurationIso(s) => CellValue::Text(Cow::Owned(s.clone())),
        Data::Error(e) => CellValue::Text(Cow::Owned(format!("#{:?}", e))),
    }
}

fn parse_iso(s: &str) -> Option<CellValue> {
    let datetime = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })?;
    Some(CellValue::Timestamp(datetime))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range() {
        let mut range: Range<Data> = Range::new((0, 0), (2, 2));
        range.set_value((0, 0), Data::String("name".into()));
        range.set_value((0, 2), Data::String("joined".into()));
        range.set_value((1, 0), Data::String("  ann ".into()));
        range.set_value((1, 1), Data::Float(3.5));
        range.set_value((1, 2), Data::DateTimeIso("2024-04-03T10:30:00".into()));
        range.set_value((2, 1), Data::Bool(true));

        let table = parse_range(&range, "Sheet1").unwrap();

        assert_eq!(table.column_names(), vec!["name", "Column2", "joined"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(0, 0), Some(&CellValue::from("  ann ")));
        assert_eq!(table.cell(0, 1), Some(&CellValue::Number(3.5)));
        assert_eq!(
            table.cell(0, 2),
            Some(&CellValue::Timestamp(
                NaiveDate::from_ymd_opt(2024, 4, 3)
                    .and_then(|d| d.and_hms_opt(10, 30, 0))
                    .unwrap()
            ))
        );
        assert_eq!(table.cell(1, 0), Some(&CellValue::Null));
        assert_eq!(table.cell(1, 1), Some(&CellValue::from("true")));
        assert_eq!(table.source_lines, vec![2, 3]);
    }

    #[test]
    fn test_empty_range() {
        let range: Range<Data> = Range::empty();
        let err = parse_range(&range, "Data").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SheetError>(),
            Some(SheetError::EmptySheet(name)) if name == "Data"
        ));
    }
}
