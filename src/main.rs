//! sheetclean - Column-wise cleaning for raw spreadsheet data

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use termcolor::ColorChoice;
use tracing::info;

use sheetclean::clean::clean_with_report;
use sheetclean::config::{Config, OutputFormat, DEFAULT_INPUT, DEFAULT_PREVIEW_ROWS};
use sheetclean::logging::{init_logging, LogConfig, LogFormat};
use sheetclean::output::{print_summary, render_preview, write_to_path, HtmlReport};
use sheetclean::parser::ParserFactory;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Xlsx,
    Csv,
    Tsv,
    Json,
    Parquet,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Xlsx => OutputFormat::Xlsx,
            CliOutputFormat::Csv => OutputFormat::Csv,
            CliOutputFormat::Tsv => OutputFormat::Tsv,
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::Parquet => OutputFormat::Parquet,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogFormat {
    Pretty,
    Compact,
    Json,
}

impl From<CliLogFormat> for LogFormat {
    fn from(f: CliLogFormat) -> Self {
        match f {
            CliLogFormat::Pretty => LogFormat::Pretty,
            CliLogFormat::Compact => LogFormat::Compact,
            CliLogFormat::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliColor {
    Auto,
    Always,
    Never,
}

impl From<CliColor> for ColorChoice {
    fn from(c: CliColor) -> Self {
        match c {
            CliColor::Auto => ColorChoice::Auto,
            CliColor::Always => ColorChoice::Always,
            CliColor::Never => ColorChoice::Never,
        }
    }
}

/// Clean raw spreadsheet data (Excel, CSV, JSON, Parquet)
#[derive(Parser, Debug)]
#[command(name = "sheetclean")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Raw input file
    #[arg(default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Where to write the cleaned table (default: clean_data.<format>)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (inferred from the output extension when omitted)
    #[arg(short, long, value_enum)]
    format: Option<CliOutputFormat>,

    /// For Excel files: which sheet to read
    #[arg(long)]
    sheet: Option<String>,

    /// Rows shown in previews (0 disables them)
    #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
    preview: usize,

    /// Write an HTML preview report to this path
    #[arg(long)]
    html_report: Option<PathBuf>,

    /// Clean and preview without writing the output file
    #[arg(long)]
    dry_run: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Log output format
    #[arg(long, value_enum, default_value = "pretty")]
    log_format: CliLogFormat,

    /// When to use colors
    #[arg(long, value_enum, default_value = "auto")]
    color: CliColor,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let color: ColorChoice = cli.color.into();
    init_logging(
        &LogConfig::from_verbosity(cli.verbose, cli.quiet)
            .with_format(cli.log_format.into())
            .with_ansi(!matches!(color, ColorChoice::Never)),
    );

    let mut config = Config::new(cli.input)
        .with_preview_rows(cli.preview)
        .with_dry_run(cli.dry_run);
    if let Some(output) = cli.output {
        config = config.with_output(output);
    }
    if let Some(format) = cli.format {
        config = config.with_output_format(format.into());
    }
    if let Some(sheet) = cli.sheet {
        config = config.with_sheet_name(sheet);
    }
    if let Some(path) = cli.html_report {
        config = config.with_html_report(path);
    }

    let raw = ParserFactory::new()
        .parse(&config.input, &config)
        .with_context(|| format!("Failed to load {}", config.input.display()))?;

    if config.preview_rows > 0 {
        println!("Raw data:");
        print!("{}", render_preview(&raw, config.preview_rows));
        println!();
    }

    let outcome = clean_with_report(&raw);

    if config.preview_rows > 0 {
        println!("Cleaned data:");
        print!("{}", render_preview(&outcome.table, config.preview_rows));
        println!();
    }
    print_summary(&outcome.report, color)?;

    if let Some(path) = &config.html_report {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        HtmlReport::new(&config.input, config.preview_rows)
            .render(&outcome.table, &outcome.report, &mut writer)
            .with_context(|| format!("Failed to write HTML report {}", path.display()))?;
        writer.flush()?;
        info!(path = %path.display(), "wrote HTML report");
    }

    if config.dry_run {
        info!("dry run, skipping export");
        return Ok(());
    }

    let output = config.resolved_output();
    write_to_path(&outcome.table, &output, config.resolved_format())?;
    println!("Cleaned data written to {}", output.display());

    Ok(())
}
