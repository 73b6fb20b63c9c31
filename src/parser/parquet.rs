//! Parquet file parser

use std::borrow::Cow;
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, Float64Array, StringArray, TimestampMillisecondArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType as ArrowType, TimeUnit};
use arrow::util::display::{ArrayFormatter, FormatOptions};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::config::Config;
use crate::model::{CellValue, Column, Table};

use super::Parser;

/// Parser for Parquet files
pub struct ParquetParser;

impl Parser for ParquetParser {
    fn parse(&self, path: &Path, _config: &Config) -> Result<Table> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open Parquet file: {}", path.display()))?;

        let builder = ParquetRecordBatchReaderBuilder::try_new(file)
            .context("Failed to create Parquet reader")?;

        let schema = builder.schema().clone();
        let reader = builder.build().context("Failed to build Parquet reader")?;

        // Create columns from schema
        let mut columns: Vec<Column> = schema
            .fields()
            .iter()
            .enumerate()
            .map(|(i, field)| Column::new(field.name().clone(), i))
            .collect();

        let mut row_count = 0usize;
        for batch_result in reader {
            let batch = batch_result.context("Failed to read Parquet batch")?;

            for (column, array) in columns.iter_mut().zip(batch.columns()) {
                column.cells.extend(extract_cells(array)?);
            }
            row_count += batch.num_rows();
        }

        Ok(Table {
            columns,
            source_lines: (1..=row_count).collect(),
        })
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "parquet" | "pq")
    }
}

/// Convert one Arrow column to raw cells.
///
/// Numeric types become numbers, strings and booleans become text, dates and
/// timestamps become timestamps. Anything else is rendered as text.
fn extract_cells(array: &ArrayRef) -> Result<Vec<CellValue>> {
    let cells = match array.data_type() {
        ArrowType::Int8
        | ArrowType::Int16
        | ArrowType::Int32
        | ArrowType::Int64
        | ArrowType::UInt8
        | ArrowType::UInt16
        | ArrowType::UInt32
        | ArrowType::UInt64
        | ArrowType::Float16
        | ArrowType::Float32
        | ArrowType::Float64 => {
            let cast_array = cast(array, &ArrowType::Float64)?;
            let values = downcast::<Float64Array>(&cast_array)?;
            // NaN is the missing-value marker of float columns
            (0..values.len())
                .map(|i| {
                    (!values.is_null(i))
                        .then(|| values.value(i))
                        .filter(|f| f.is_finite())
                        .into()
                })
                .collect()
        }
        ArrowType::Boolean | ArrowType::Utf8 | ArrowType::LargeUtf8 | ArrowType::Utf8View => {
            let cast_array = cast(array, &ArrowType::Utf8)?;
            let values = downcast::<StringArray>(&cast_array)?;
            (0..values.len())
                .map(|i| {
                    if values.is_null(i) {
                        CellValue::Null
                    } else {
                        CellValue::Text(Cow::Owned(values.value(i).to_string()))
                    }
                })
                .collect()
        }
        ArrowType::Date32 | ArrowType::Date64 | ArrowType::Timestamp(_, _) => {
            let cast_array = cast(array, &ArrowType::Timestamp(TimeUnit::Millisecond, None))?;
            let values = downcast::<TimestampMillisecondArray>(&cast_array)?;
            (0..values.len())
                .map(|i| {
                    if values.is_null(i) {
                        CellValue::Null
                    } else {
                        values.value_as_datetime(i).into()
                    }
                })
                .collect()
        }
        _ => {
            // Fallback: convert to string
            let formatter = ArrayFormatter::try_new(array.as_ref(), &FormatOptions::default())?;
            (0..array.len())
                .map(|i| {
                    if array.is_null(i) {
                        CellValue::Null
                    } else {
                        CellValue::Text(Cow::Owned(formatter.value(i).to_string()))
                    }
                })
                .collect()
        }
    };
    Ok(cells)
}

fn downcast<T: 'static>(array: &ArrayRef) -> Result<&T> {
    array
        .as_any()
        .downcast_ref::<T>()
        .with_context(|| format!("Unexpected Arrow array type: {}", array.data_type()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use arrow::array::{BooleanArray, Date32Array, Int32Array};

    #[test]
    fn test_extract_numbers() {
        let array: ArrayRef = Arc::new(Int32Array::from(vec![Some(1), None, Some(-3)]));
        assert_eq!(
            extract_cells(&array).unwrap(),
            vec![CellValue::Number(1.0), CellValue::Null, CellValue::Number(-3.0)]
        );
    }

    #[test]
    fn test_non_finite_floats_are_null() {
        let array: ArrayRef = Arc::new(Float64Array::from(vec![
            f64::NAN,
            f64::INFINITY,
            2.5,
        ]));
        assert_eq!(
            extract_cells(&array).unwrap(),
            vec![CellValue::Null, CellValue::Null, CellValue::Number(2.5)]
        );
    }

    #[test]
    fn test_extract_text_and_booleans() {
        let strings: ArrayRef = Arc::new(StringArray::from(vec![Some(" a "), None]));
        assert_eq!(
            extract_cells(&strings).unwrap(),
            vec![CellValue::from(" a "), CellValue::Null]
        );

        let bools: ArrayRef = Arc::new(BooleanArray::from(vec![true]));
        assert_eq!(extract_cells(&bools).unwrap(), vec![CellValue::from("true")]);
    }

    #[test]
    fn test_extract_dates() {
        // 19816 days after the epoch is 2024-04-03
        let dates: ArrayRef = Arc::new(Date32Array::from(vec![Some(19816), None]));
        let expected = chrono::NaiveDate::from_ymd_opt(2024, 4, 3)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        assert_eq!(
            extract_cells(&dates).unwrap(),
            vec![CellValue::Timestamp(expected), CellValue::Null]
        );
    }
}
