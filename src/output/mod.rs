//! Export and preview of cleaned tables

mod csv;
mod html;
mod json;
mod parquet;
mod terminal;
mod xlsx;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::config::OutputFormat;
use crate::error::SheetError;
use crate::model::Table;

pub use self::csv::CsvExporter;
pub use self::html::HtmlReport;
pub use self::json::JsonExporter;
pub use self::parquet::ParquetExporter;
pub use self::terminal::{print_summary, render_preview};
pub use self::xlsx::XlsxExporter;

/// Trait for table exporters
pub trait Exporter {
    /// Serialize the table to a writer
    fn export(&self, table: &Table, writer: &mut dyn Write) -> Result<()>;
}

/// Factory for creating exporters
pub struct ExporterFactory;

impl ExporterFactory {
    /// Create an exporter for the given format
    pub fn create(format: OutputFormat) -> Box<dyn Exporter> {
        match format {
            OutputFormat::Xlsx => Box::new(XlsxExporter::new()),
            OutputFormat::Csv => Box::new(CsvExporter::new()),
            OutputFormat::Tsv => Box::new(CsvExporter::with_delimiter(b'\t')),
            OutputFormat::Json => Box::new(JsonExporter::new()),
            OutputFormat::Parquet => Box::new(ParquetExporter::new()),
        }
    }
}

/// Export a table to a file
pub fn write_to_path(table: &Table, path: &Path, format: OutputFormat) -> Result<()> {
    let file = File::create(path).map_err(|source| SheetError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);

    ExporterFactory::create(format).export(table, &mut writer)?;
    writer.flush().map_err(|source| SheetError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        path = %path.display(),
        format = format.extension(),
        rows = table.row_count(),
        "wrote cleaned table"
    );
    Ok(())
}
