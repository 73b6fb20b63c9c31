//! Parquet export

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use arrow::array::{ArrayRef, Float64Array, StringArray, TimestampMillisecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use parquet::arrow::ArrowWriter;

use crate::model::{CellValue, Column, Table};

use super::Exporter;

/// Parquet exporter.
///
/// Columns holding only numbers (and nulls) are written as `Float64`, only
/// timestamps as millisecond timestamps, everything else as UTF-8 text.
pub struct ParquetExporter;

impl ParquetExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ParquetExporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the Arrow type for a column and build its array
fn column_to_array(column: &Column) -> (DataType, ArrayRef) {
    let non_null = || column.cells.iter().filter(|c| !c.is_null());

    if non_null().all(|c| matches!(c, CellValue::Number(_))) {
        let values: Float64Array = column
            .cells
            .iter()
            .map(|c| match c {
                CellValue::Number(f) => Some(*f),
                _ => None,
            })
            .collect();
        return (DataType::Float64, Arc::new(values));
    }

    if non_null().all(|c| matches!(c, CellValue::Timestamp(_))) {
        let values: TimestampMillisecondArray = column
            .cells
            .iter()
            .map(|c| match c {
                CellValue::Timestamp(dt) => Some(dt.and_utc().timestamp_millis()),
                _ => None,
            })
            .collect();
        return (
            DataType::Timestamp(TimeUnit::Millisecond, None),
            Arc::new(values),
        );
    }

    let values: StringArray = column
        .cells
        .iter()
        .map(|c| (!c.is_null()).then(|| c.display().into_owned()))
        .collect();
    (DataType::Utf8, Arc::new(values))
}

impl Exporter for ParquetExporter {
    fn export(&self, table: &Table, writer: &mut dyn Write) -> Result<()> {
        let (fields, arrays): (Vec<Field>, Vec<ArrayRef>) = table
            .columns
            .iter()
            .map(|column| {
                let (data_type, array) = column_to_array(column);
                (Field::new(column.name.as_str(), data_type, true), array)
            })
            .unzip();

        let schema = Arc::new(Schema::new(fields));
        let options = RecordBatchOptions::new().with_row_count(Some(table.row_count()));
        let batch = RecordBatch::try_new_with_options(schema.clone(), arrays, &options)?;

        // ArrowWriter needs a `Send` sink, so encode into memory first
        let mut buffer = Vec::new();
        let mut arrow_writer = ArrowWriter::try_new(&mut buffer, schema, None)?;
        arrow_writer.write(&batch)?;
        arrow_writer.close()?;

        writer.write_all(&buffer)?;
        Ok(())
    }
}
