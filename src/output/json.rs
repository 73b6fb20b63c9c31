//! JSON export

use std::io::Write;

use anyhow::Result;
use indexmap::IndexMap;
use serde_json::Value;

use crate::model::{CellValue, Table};

use super::Exporter;

/// JSON exporter: an array of objects keyed by column name, in column order
pub struct JsonExporter {
    pretty: bool,
}

impl JsonExporter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonExporter {
    fn default() -> Self {
        Self::new()
    }
}

fn cell_value_to_json(value: &CellValue) -> Value {
    match value {
        CellValue::Null => Value::Null,
        CellValue::Text(s) => Value::String(s.to_string()),
        // Non-finite numbers have no JSON form and come out as null
        CellValue::Number(f) => serde_json::json!(*f),
        CellValue::Timestamp(dt) => Value::String(dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
    }
}

impl Exporter for JsonExporter {
    fn export(&self, table: &Table, writer: &mut dyn Write) -> Result<()> {
        let records: Vec<IndexMap<&str, Value>> = table
            .rows()
            .map(|row| {
                table
                    .columns
                    .iter()
                    .zip(row)
                    .map(|(column, cell)| (column.name.as_str(), cell_value_to_json(cell)))
                    .collect()
            })
            .collect();

        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &records)?;
        } else {
            serde_json::to_writer(&mut *writer, &records)?;
        }
        writeln!(writer)?;

        Ok(())
    }
}
