//! Configuration handling for sheetclean

use std::path::{Path, PathBuf};

/// Input file used when none is given
pub const DEFAULT_INPUT: &str = "raw_data.xlsx";

/// Stem of the output file used when none is given
pub const DEFAULT_OUTPUT_STEM: &str = "clean_data";

/// Worksheet written by the xlsx exporter
pub const OUTPUT_SHEET_NAME: &str = "clean_data";

/// Rows shown in previews by default
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

/// Export format for the cleaned table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Csv,
    Tsv,
    Json,
    Parquet,
}

impl OutputFormat {
    /// File extension written for this format
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
            OutputFormat::Parquet => "parquet",
        }
    }

    /// Guess the format from a path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse().ok())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "xlsx" => Ok(OutputFormat::Xlsx),
            "csv" => Ok(OutputFormat::Csv),
            "tsv" => Ok(OutputFormat::Tsv),
            "json" => Ok(OutputFormat::Json),
            "parquet" | "pq" => Ok(OutputFormat::Parquet),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Configuration for a cleaning run
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the raw input file
    pub input: PathBuf,
    /// Path the cleaned table is written to
    pub output: Option<PathBuf>,
    /// Output format (inferred from `output` when not set)
    pub output_format: Option<OutputFormat>,
    /// For Excel files: which sheet to read
    pub sheet_name: Option<String>,
    /// Rows shown in terminal and HTML previews (0 disables them)
    pub preview_rows: usize,
    /// Where to write the HTML preview report
    pub html_report: Option<PathBuf>,
    /// Clean and preview without writing the output file
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: None,
            output_format: None,
            sheet_name: None,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            html_report: None,
            dry_run: false,
        }
    }
}

impl Config {
    /// Create a new Config reading from `input`
    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            ..Default::default()
        }
    }

    /// Set the output path
    pub fn with_output(mut self, output: PathBuf) -> Self {
        self.output = Some(output);
        self
    }

    /// Set the output format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    /// Set Excel sheet name
    pub fn with_sheet_name(mut self, name: String) -> Self {
        self.sheet_name = Some(name);
        self
    }

    /// Set the number of preview rows
    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    /// Set the HTML report path
    pub fn with_html_report(mut self, path: PathBuf) -> Self {
        self.html_report = Some(path);
        self
    }

    /// Enable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// The format to export: explicit, else from the output path, else xlsx
    pub fn resolved_format(&self) -> OutputFormat {
        self.output_format
            .or_else(|| self.output.as_deref().and_then(OutputFormat::from_path))
            .unwrap_or_default()
    }

    /// The output path, defaulting to `clean_data.<ext>`
    pub fn resolved_output(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            PathBuf::from(format!(
                "{}.{}",
                DEFAULT_OUTPUT_STEM,
                self.resolved_format().extension()
            ))
        })
    }
}
