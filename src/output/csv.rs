//! CSV export

use std::io::Write;

use anyhow::Result;

use crate::model::Table;

use super::Exporter;

/// CSV exporter. Nulls become empty fields.
pub struct CsvExporter {
    delimiter: u8,
}

impl CsvExporter {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for CsvExporter {
    fn export(&self, table: &Table, writer: &mut dyn Write) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(writer);

        csv_writer.write_record(table.column_names())?;
        for row in table.rows() {
            csv_writer.write_record(row.iter().map(|cell| cell.display().into_owned()))?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}
