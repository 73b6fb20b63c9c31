//! Terminal preview and colored summary

use std::io::Write;

use anyhow::Result;
use tabled::builder::Builder;
use tabled::settings::Style;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::clean::CleanReport;
use crate::model::Table;

/// Render the first `rows` rows of a table as a bordered grid
pub fn render_preview(table: &Table, rows: usize) -> String {
    if table.column_count() == 0 {
        return "(no columns)\n".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(table.column_names().into_iter().map(String::from));
    for row in table.rows().take(rows) {
        builder.push_record(row.iter().map(|cell| cell.display().into_owned()));
    }

    let mut grid = builder.build();
    grid.with(Style::modern());

    let mut out = grid.to_string();
    out.push('\n');
    if table.row_count() > rows {
        out.push_str(&format!("... {} more rows\n", table.row_count() - rows));
    }
    out
}

/// Print the cleaning summary to stdout
pub fn print_summary(report: &CleanReport, color_choice: ColorChoice) -> Result<()> {
    let mut stdout = StandardStream::stdout(color_choice);
    write_summary(report, &mut stdout)
}

/// Write the cleaning summary with colors
pub fn write_summary<W: WriteColor>(report: &CleanReport, writer: &mut W) -> Result<()> {
    writer.set_color(ColorSpec::new().set_bold(true))?;
    write!(writer, "Rows:")?;
    writer.reset()?;
    write!(writer, " {} → {}", report.rows_before, report.rows_after)?;
    if report.rows_dropped() > 0 {
        writer.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
        write!(writer, " (-{} empty)", report.rows_dropped())?;
        writer.reset()?;
    }
    writeln!(writer)?;

    for column in &report.columns {
        write!(writer, "  {} [{}]:", column.name, column.inferred_type)?;
        if !column.has_changes() {
            writeln!(writer, " unchanged")?;
            continue;
        }

        let parts = [
            (column.numbers, "numbers", Color::Green),
            (column.timestamps, "timestamps", Color::Cyan),
            (column.nulled, "nulls", Color::Yellow),
            (column.stripped, "stripped", Color::Magenta),
        ];
        for (count, label, color) in parts {
            if count == 0 {
                continue;
            }
            writer.set_color(ColorSpec::new().set_fg(Some(color)))?;
            write!(writer, " {} {}", count, label)?;
            writer.reset()?;
        }
        writeln!(writer)?;
    }

    Ok(())
}
