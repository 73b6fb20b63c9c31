//! HTML preview report

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::clean::CleanReport;
use crate::model::Table;

/// HTML page with the cleaning summary and the first rows of the cleaned table
pub struct HtmlReport {
    source: String,
    preview_rows: usize,
}

#[derive(Serialize)]
struct PreviewCell {
    text: String,
    kind: String,
}

impl HtmlReport {
    pub fn new(source: &Path, preview_rows: usize) -> Self {
        Self {
            source: source.display().to_string(),
            preview_rows,
        }
    }

    /// Render the report to a writer. Values are HTML-escaped by the template engine.
    pub fn render(&self, table: &Table, report: &CleanReport, writer: &mut dyn Write) -> Result<()> {
        let rows: Vec<Vec<PreviewCell>> = table
            .rows()
            .take(self.preview_rows)
            .map(|row| {
                row.iter()
                    .map(|cell| PreviewCell {
                        text: cell.display().into_owned(),
                        kind: cell.cell_type().to_string(),
                    })
                    .collect()
            })
            .collect();

        let mut context = Context::new();
        context.insert("source", &self.source);
        context.insert("css", CSS_STYLES);
        context.insert("report", report);
        context.insert("columns", &table.column_names());
        context.insert("rows", &rows);
        context.insert("more_rows", &table.row_count().saturating_sub(rows.len()));

        let html = Tera::one_off(TEMPLATE, &context, true)?;
        writer.write_all(html.as_bytes())?;
        Ok(())
    }
}

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>sheetclean: {{ source }}</title>
  <style>{{ css | safe }}</style>
</head>
<body>
  <div class="header">
    <h1>sheetclean</h1>
    <p class="files">{{ source }}</p>
  </div>

  <div class="summary">
    <div class="stat"><span class="num">{{ report.rows_before }}</span><span class="label">rows in</span></div>
    <div class="stat kept"><span class="num">{{ report.rows_after }}</span><span class="label">rows out</span></div>
    <div class="stat dropped"><span class="num">-{{ report.rows_before - report.rows_after }}</span><span class="label">empty rows</span></div>
  </div>

  <div class="section">
    <h2>Columns</h2>
    <table class="columns">
      <tr><th>Column</th><th>Type</th><th>Numbers</th><th>Timestamps</th><th>Nulls</th><th>Stripped</th></tr>
      {% for column in report.columns %}
      <tr>
        <td>{{ column.name }}</td>
        <td class="{{ column.inferred_type }}">{{ column.inferred_type }}</td>
        <td>{{ column.numbers }}</td>
        <td>{{ column.timestamps }}</td>
        <td>{{ column.nulled }}</td>
        <td>{{ column.stripped }}</td>
      </tr>
      {% endfor %}
    </table>
  </div>

  <div class="section">
    <h2>Cleaned Data</h2>
    <table class="preview">
      <tr>{% for name in columns %}<th>{{ name }}</th>{% endfor %}</tr>
      {% for row in rows %}
      <tr>{% for cell in row %}<td class="{{ cell.kind }}">{{ cell.text }}</td>{% endfor %}</tr>
      {% endfor %}
    </table>
    {% if more_rows > 0 %}<p class="more">... {{ more_rows }} more rows</p>{% endif %}
  </div>

  <div class="footer">
    <p>Generated by sheetclean</p>
  </div>
</body>
</html>
"#;

const CSS_STYLES: &str = r#"
    :root {
      --bg: #1a1b26;
      --fg: #a9b1d6;
      --accent: #7aa2f7;
      --green: #9ece6a;
      --red: #f7768e;
      --yellow: #e0af68;
      --cyan: #7dcfff;
      --border: #414868;
    }

    * { box-sizing: border-box; margin: 0; padding: 0; }

    body {
      font-family: 'JetBrains Mono', 'Fira Code', monospace;
      background: var(--bg);
      color: var(--fg);
      padding: 2rem;
      line-height: 1.6;
    }

    .header {
      border-bottom: 2px solid var(--border);
      padding-bottom: 1rem;
      margin-bottom: 2rem;
    }

    .header h1 { color: var(--accent); font-size: 2rem; font-weight: 600; }
    .header .files { opacity: 0.8; margin-top: 0.5rem; }

    .summary { display: flex; gap: 2rem; margin-bottom: 2rem; }

    .stat {
      display: flex;
      flex-direction: column;
      padding: 1rem;
      border-radius: 8px;
      background: rgba(255,255,255,0.05);
    }

    .stat .num { font-size: 1.5rem; font-weight: 600; }
    .stat.kept .num { color: var(--green); }
    .stat.dropped .num { color: var(--red); }

    .section { margin-bottom: 2rem; }

    .section h2 {
      color: var(--accent);
      font-size: 1.25rem;
      margin-bottom: 1rem;
      padding-bottom: 0.5rem;
      border-bottom: 1px solid var(--border);
    }

    table { width: 100%; border-collapse: collapse; margin-bottom: 1rem; }
    th, td { text-align: left; padding: 0.75rem; border: 1px solid var(--border); }
    th { background: rgba(255,255,255,0.05); font-weight: 600; }

    td.number { color: var(--green); }
    td.timestamp { color: var(--cyan); }
    td.mixed { color: var(--yellow); }
    td.null { background: rgba(247, 118, 142, 0.08); }

    .more { opacity: 0.6; }

    .footer {
      margin-top: 3rem;
      padding-top: 1rem;
      border-top: 1px solid var(--border);
      opacity: 0.6;
      font-size: 0.875rem;
    }
"#;
