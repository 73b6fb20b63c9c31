//! JSON array parser

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexSet;
use serde_json::Value;

use crate::config::Config;
use crate::error::SheetError;
use crate::model::{CellValue, Column, Table};

use super::Parser;

/// Parser for JSON array files
pub struct JsonParser;

impl Parser for JsonParser {
    fn parse(&self, path: &Path, _config: &Config) -> Result<Table> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open JSON file: {}", path.display()))?;
        read_json(BufReader::new(file))
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "json")
    }
}

/// Read an array of objects (or a single object) as a table.
///
/// Any other shape, including an array holding non-objects, is rejected.
pub fn read_json<R: Read>(reader: R) -> Result<Table> {
    let value: Value = serde_json::from_reader(reader).context("Failed to parse JSON file")?;

    // Handle both arrays and single objects
    let array = match value {
        Value::Array(arr) => arr,
        Value::Object(_) => vec![value],
        _ => return Err(SheetError::InvalidJson.into()),
    };

    // Collect all unique keys across all objects to build column list
    let mut column_names: IndexSet<String> = IndexSet::new();
    for item in &array {
        match item {
            Value::Object(obj) => column_names.extend(obj.keys().cloned()),
            _ => return Err(SheetError::InvalidJson.into()),
        }
    }

    let columns: Vec<Column> = column_names
        .iter()
        .enumerate()
        .map(|(i, name)| Column::new(name.clone(), i))
        .collect();

    let mut table = Table::new(columns);

    // Convert each object to a row
    for (line_num, item) in array.iter().enumerate() {
        let cells = column_names
            .iter()
            .map(|key| json_value_to_cell(item.get(key)))
            .collect();

        table.add_row(cells, line_num + 1);
    }

    Ok(table)
}

fn json_value_to_cell(value: Option<&Value>) -> CellValue {
    match value {
        None | Some(Value::Null) => CellValue::Null,
        Some(Value::Bool(b)) => CellValue::Text(Cow::Owned(b.to_string())),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) => CellValue::Number(f),
            None => CellValue::Text(Cow::Owned(n.to_string())),
        },
        Some(Value::String(s)) => CellValue::Text(Cow::Owned(s.clone())),
        // Serialize nested values back to JSON text
        Some(nested) => CellValue::Text(Cow::Owned(nested.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_of_keys_in_first_seen_order() {
        let data = r#"[{"b": 1, "a": "x"}, {"c": null, "a": true}, {"a": [1, 2]}]"#;
        let table = read_json(data.as_bytes()).unwrap();

        assert_eq!(table.column_names(), vec!["b", "a", "c"]);
        assert_eq!(
            table.row(0),
            Some(vec![&CellValue::Number(1.0), &CellValue::from("x"), &CellValue::Null])
        );
        assert_eq!(table.cell(1, 1), Some(&CellValue::from("true")));
        assert_eq!(table.cell(2, 1), Some(&CellValue::from("[1,2]")));
    }

    #[test]
    fn test_single_object() {
        let table = read_json(r#"{"a": "  hi "}"#.as_bytes()).unwrap();
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.cell(0, 0), Some(&CellValue::from("  hi ")));
    }

    #[test]
    fn test_array_of_scalars_is_rejected() {
        for data in ["[1, 2, 3]", r#"[{"a": 1}, "b"]"#] {
            let err = read_json(data.as_bytes()).unwrap_err();
            assert!(
                matches!(err.downcast_ref::<SheetError>(), Some(SheetError::InvalidJson)),
                "{data}"
            );
        }
    }

    #[test]
    fn test_scalar_is_rejected() {
        let err = read_json("42".as_bytes()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SheetError>(),
            Some(SheetError::InvalidJson)
        ));
    }
}
