//! Errors raised by the input and output collaborators.
//!
//! The cleaning pipeline itself never fails.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("no sheets found in workbook")]
    NoSheets,

    #[error("sheet '{0}' is empty")]
    EmptySheet(String),

    #[error("JSON input must be an object or an array of objects")]
    InvalidJson,

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
