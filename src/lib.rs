//! sheetclean - Column-wise cleaning for raw spreadsheet data
//!
//! Loads a table (Excel, CSV, JSON, Parquet), normalizes every text cell,
//! coerces columns to timestamps and numbers where possible, drops rows
//! left fully empty, and exports the result.

pub mod clean;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod output;
pub mod parser;

pub use clean::{clean, clean_with_report, CleanOutcome, CleanReport};
pub use config::Config;
pub use error::SheetError;
pub use model::{CellValue, Table};
