//! Excel export

use std::io::Write;

use anyhow::{Context, Result};
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, Worksheet};

use crate::config::OUTPUT_SHEET_NAME;
use crate::model::{CellValue, Table};

use super::Exporter;

/// Xlsx exporter writing a single worksheet.
///
/// Numbers are written as numbers and timestamps as Excel datetimes; nulls and
/// non-finite numbers are left blank.
pub struct XlsxExporter {
    sheet_name: String,
}

impl XlsxExporter {
    pub fn new() -> Self {
        Self {
            sheet_name: OUTPUT_SHEET_NAME.to_string(),
        }
    }

    pub fn with_sheet_name(name: impl Into<String>) -> Self {
        Self {
            sheet_name: name.into(),
        }
    }
}

impl Default for XlsxExporter {
    fn default() -> Self {
        Self::new()
    }
}

struct Formats {
    header: Format,
    date: Format,
    datetime: Format,
}

impl Formats {
    fn new() -> Self {
        Self {
            header: Format::new().set_bold(),
            date: Format::new().set_num_format("yyyy-mm-dd"),
            datetime: Format::new().set_num_format("yyyy-mm-dd hh:mm:ss"),
        }
    }
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: RowNum,
    col: ColNum,
    cell: &CellValue,
    formats: &Formats,
) -> Result<()> {
    match cell {
        CellValue::Null => {}
        CellValue::Text(s) => {
            worksheet.write_string(row, col, s.as_ref())?;
        }
        CellValue::Number(f) if f.is_finite() => {
            worksheet.write_number(row, col, *f)?;
        }
        CellValue::Number(_) => {}
        CellValue::Timestamp(dt) => {
            let format = if dt.time() == chrono::NaiveTime::MIN {
                &formats.date
            } else {
                &formats.datetime
            };
            worksheet.write_datetime_with_format(row, col, dt, format)?;
        }
    }
    Ok(())
}

impl Exporter for XlsxExporter {
    fn export(&self, table: &Table, writer: &mut dyn Write) -> Result<()> {
        let formats = Formats::new();
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.sheet_name)?;

        for (i, column) in table.columns.iter().enumerate() {
            let col = ColNum::try_from(i).context("Too many columns for a worksheet")?;
            worksheet.write_string_with_format(0, col, &column.name, &formats.header)?;
        }

        for (i, row) in table.rows().enumerate() {
            let row_num = RowNum::try_from(i + 1).context("Too many rows for a worksheet")?;
            for (j, cell) in row.into_iter().enumerate() {
                let col = ColNum::try_from(j).context("Too many columns for a worksheet")?;
                write_cell(worksheet, row_num, col, cell, &formats)?;
            }
        }

        let buffer = workbook.save_to_buffer()?;
        writer.write_all(&buffer)?;
        Ok(())
    }
}
