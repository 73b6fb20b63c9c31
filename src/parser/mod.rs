//! Parser layer for reading raw tables from various formats

mod csv;
mod excel;
mod json;
mod parquet;

use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::config::Config;
use crate::error::SheetError;
use crate::model::Table;

pub use self::csv::CsvParser;
pub use self::excel::ExcelParser;
pub use self::json::JsonParser;
pub use self::parquet::ParquetParser;

/// Trait for parsing tabular data files into a raw table
pub trait Parser: Send + Sync {
    /// Parse a file and return a Table
    fn parse(&self, path: &Path, config: &Config) -> Result<Table>;

    /// Check if this parser can handle the given file extension
    fn supports_extension(&self, ext: &str) -> bool;
}

/// Factory for creating parsers based on file extension
pub struct ParserFactory {
    parsers: Vec<Box<dyn Parser>>,
}

impl Default for ParserFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserFactory {
    /// Create a new parser factory with all supported parsers
    pub fn new() -> Self {
        Self {
            parsers: vec![
                Box::new(CsvParser),
                Box::new(ExcelParser),
                Box::new(ParquetParser),
                Box::new(JsonParser),
            ],
        }
    }

    /// Get a parser for the given file path.
    ///
    /// Files without an extension are sniffed by content.
    pub fn get_parser(&self, path: &Path) -> Result<&dyn Parser, SheetError> {
        let ext = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => ext.to_lowercase(),
            None => detect_format(path).unwrap_or("").to_string(),
        };

        self.parsers
            .iter()
            .find(|parser| parser.supports_extension(&ext))
            .map(|parser| parser.as_ref())
            .ok_or_else(|| {
                SheetError::UnsupportedFormat(if ext.is_empty() {
                    "unknown".to_string()
                } else {
                    ext
                })
            })
    }

    /// Parse a file using the appropriate parser
    pub fn parse(&self, path: &Path, config: &Config) -> Result<Table> {
        if !path.exists() {
            return Err(SheetError::InputNotFound(path.to_path_buf()).into());
        }

        let parser = self.get_parser(path)?;
        let table = parser.parse(path, config)?;
        info!(
            path = %path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            "loaded table"
        );
        Ok(table)
    }
}

/// Detect file format from content (for files without extension)
pub fn detect_format(path: &Path) -> Option<&'static str> {
    use std::fs::File;
    use std::io::{BufRead, BufReader, Read};

    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let mut buffer = [0u8; 8];
    let bytes_read = reader.read(&mut buffer).ok()?;

    if bytes_read < 4 {
        return None;
    }

    // Check for Parquet magic bytes
    if &buffer[0..4] == b"PAR1" {
        return Some("parquet");
    }

    // Check for Excel ZIP format (xlsx)
    if &buffer[0..4] == b"PK\x03\x04" {
        return Some("xlsx");
    }

    // Check for old Excel format (xls)
    if &buffer[0..4] == b"\xD0\xCF\x11\xE0" {
        return Some("xls");
    }

    // Try to detect JSON
    reader.seek_relative(-(bytes_read as i64)).ok()?;
    let mut line = String::new();
    reader.read_line(&mut line).ok()?;
    let trimmed = line.trim_start();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        return Some("json");
    }

    // Default to CSV
    Some("csv")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_get_parser_by_extension() {
        let factory = ParserFactory::new();
        assert!(factory.get_parser(Path::new("a.CSV")).is_ok());
        assert!(factory.get_parser(Path::new("a.xlsx")).is_ok());
        assert!(factory.get_parser(Path::new("a.parquet")).is_ok());
        assert!(factory.get_parser(Path::new("a.json")).is_ok());
        assert!(matches!(
            factory.get_parser(Path::new("a.docx")),
            Err(SheetError::UnsupportedFormat(ext)) if ext == "docx"
        ));
    }

    #[test]
    fn test_missing_input() {
        let factory = ParserFactory::new();
        let err = factory
            .parse(Path::new("does/not/exist.xlsx"), &Config::default())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SheetError>(),
            Some(SheetError::InputNotFound(_))
        ));
    }

    #[test]
    fn test_detect_format() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("data");
        std::fs::File::create(&json_path)
            .unwrap()
            .write_all(b"  [{\"a\": 1}]")
            .unwrap();
        assert_eq!(detect_format(&json_path), Some("json"));

        let csv_path = dir.path().join("table");
        std::fs::File::create(&csv_path)
            .unwrap()
            .write_all(b"a,b\n1,2\n")
            .unwrap();
        assert_eq!(detect_format(&csv_path), Some("csv"));
    }
}
