//! Column-wise cleaning pipeline
//!
//! Columns are processed left to right. Each column is fully normalized
//! (see [`normalize`]) before its coercion attempts run (see [`coerce`]).
//! Once every column is done, fully-empty rows are pruned (see [`prune`]).
//!
//! The input table is never modified; the pipeline works on a copy.

pub mod coerce;
pub mod normalize;
pub mod prune;

use serde::Serialize;
use tracing::{debug, info, info_span};

use crate::model::{CellType, Column, Table};

pub use coerce::{coerce_column, coerce_number, coerce_timestamp, parse_timestamp, Unchanged};
pub use normalize::{is_null_token, normalize, title_case, NULL_TOKENS};
pub use prune::prune_empty_rows;

use normalize::Outcome;

/// What the pipeline did to one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnReport {
    pub name: String,
    pub index: usize,
    /// Text cells replaced by `Null`
    pub nulled: usize,
    /// Text cells that lost non-numeric characters
    pub stripped: usize,
    /// Cells converted to timestamps
    pub timestamps: usize,
    /// Cells converted to numbers
    pub numbers: usize,
    /// Type of the column after pruning
    pub inferred_type: CellType,
}

impl ColumnReport {
    fn new(column: &Column) -> Self {
        Self {
            name: column.name.clone(),
            index: column.index,
            nulled: 0,
            stripped: 0,
            timestamps: 0,
            numbers: 0,
            inferred_type: CellType::Null,
        }
    }

    /// Check if any cell of the column changed value or type
    pub fn has_changes(&self) -> bool {
        self.nulled + self.stripped + self.timestamps + self.numbers > 0
    }
}

/// Summary of a pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    pub rows_before: usize,
    pub rows_after: usize,
    /// Source lines of the rows removed by pruning
    pub dropped_lines: Vec<usize>,
    pub columns: Vec<ColumnReport>,
}

impl CleanReport {
    /// Number of rows removed by pruning
    pub fn rows_dropped(&self) -> usize {
        self.rows_before - self.rows_after
    }
}

/// Cleaned table plus the report of how it was produced
#[derive(Debug, Clone)]
pub struct CleanOutcome {
    pub table: Table,
    pub report: CleanReport,
}

/// Clean a table, returning a new one
pub fn clean(table: &Table) -> Table {
    clean_with_report(table).table
}

/// Clean a table and report per-column conversions
pub fn clean_with_report(input: &Table) -> CleanOutcome {
    let _span = info_span!(
        "clean",
        rows = input.row_count(),
        columns = input.column_count()
    )
    .entered();

    let mut table = input.clone();
    table.conform();
    let mut report = CleanReport {
        rows_before: table.row_count(),
        ..Default::default()
    };

    for column in &mut table.columns {
        let column_report = clean_column(column);
        debug!(
            column = %column_report.name,
            nulled = column_report.nulled,
            stripped = column_report.stripped,
            timestamps = column_report.timestamps,
            numbers = column_report.numbers,
            "column cleaned"
        );
        report.columns.push(column_report);
    }

    report.dropped_lines = prune_empty_rows(&mut table);
    report.rows_after = table.row_count();

    table.infer_column_types();
    for (column_report, column) in report.columns.iter_mut().zip(&table.columns) {
        column_report.inferred_type = column.inferred_type;
    }

    info!(
        rows_before = report.rows_before,
        rows_after = report.rows_after,
        dropped = report.rows_dropped(),
        "table cleaned"
    );

    CleanOutcome { table, report }
}

/// Normalize every cell of the column, then run the coercion attempts
fn clean_column(column: &mut Column) -> ColumnReport {
    let mut report = ColumnReport::new(column);

    let cells = std::mem::take(&mut column.cells);
    column.cells = cells
        .into_iter()
        .map(|cell| {
            let (value, outcome) = normalize::normalize_cell(cell);
            match outcome {
                Outcome::Nulled => report.nulled += 1,
                Outcome::Stripped => report.stripped += 1,
                Outcome::Bypassed | Outcome::Cased => {}
            }
            value
        })
        .collect();

    let counts = coerce_column(&mut column.cells);
    report.timestamps = counts.timestamps;
    report.numbers = counts.numbers;
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellValue;
    use chrono::NaiveDate;

    fn text(s: &str) -> CellValue {
        CellValue::from(s)
    }

    #[test]
    fn test_end_to_end_column() {
        let table = Table::from_columns(vec![(
            "name",
            vec![text("  john SMITH "), text("NA"), text("123.45"), text("")],
        )]);

        let outcome = clean_with_report(&table);

        // The two null rows are pruned, the rest keep their order.
        assert_eq!(
            outcome.table.columns[0].cells,
            vec![text("John Smith"), CellValue::Number(123.45)]
        );
        assert_eq!(outcome.report.dropped_lines, vec![3, 5]);
        assert_eq!(outcome.report.columns[0].nulled, 2);
        assert_eq!(outcome.report.columns[0].numbers, 1);
        assert_eq!(outcome.report.columns[0].inferred_type, CellType::Mixed);
    }

    #[test]
    fn test_empty_rows_are_dropped_and_reindexed() {
        let table = Table::from_columns(vec![
            ("a", vec![text("x"), text(""), text("y")]),
            ("b", vec![text("1"), text("NaN"), CellValue::Null]),
            ("c", vec![CellValue::Null, CellValue::Null, text("z")]),
        ]);

        let cleaned = clean(&table);

        assert_eq!(cleaned.row_count(), 2);
        assert_eq!(
            cleaned.row(0),
            Some(vec![&text("X"), &CellValue::Number(1.0), &CellValue::Null])
        );
        assert_eq!(
            cleaned.row(1),
            Some(vec![&text("Y"), &CellValue::Null, &text("Z")])
        );
        assert_eq!(cleaned.row(2), None);
        assert_eq!(cleaned.source_lines, vec![2, 4]);
    }

    #[test]
    fn test_columns_and_input_are_preserved() {
        let table = Table::from_columns(vec![
            ("First Name", vec![text(" ann "), text("")]),
            ("amount", vec![text(""), text("")]),
        ]);

        let cleaned = clean(&table);

        assert_eq!(cleaned.column_names(), vec!["First Name", "amount"]);
        assert_eq!(cleaned.columns[1].index, 1);
        assert_eq!(table.columns[0].cells[0], text(" ann "));
        assert_eq!(table.row_count(), 2);
        assert_eq!(cleaned.row_count(), 1);
    }

    #[test]
    fn test_hand_built_tables_keep_their_cells() {
        let short = Table {
            columns: vec![Column::with_cells("a", 0, Vec::new())],
            source_lines: vec![2],
        };
        let outcome = clean_with_report(&short);
        assert_eq!(outcome.table.row_count(), 0);
        assert_eq!(outcome.report.dropped_lines, vec![2]);

        let unlined = Table {
            columns: vec![Column::with_cells("a", 0, vec![text("x")])],
            source_lines: Vec::new(),
        };
        let cleaned = clean(&unlined);
        assert_eq!(cleaned.row_count(), 1);
        assert_eq!(cleaned.columns[0].cells, vec![text("X")]);
    }

    #[test]
    fn test_dates_survive_when_separators_do() {
        let table = Table::from_columns(vec![(
            "when",
            vec![text("03-04-2024"), text("03/04/2024"), text("Tuesday")],
        )]);

        let cleaned = clean(&table);
        let april_third = NaiveDate::from_ymd_opt(2024, 4, 3)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();

        assert_eq!(
            cleaned.columns[0].cells,
            vec![
                CellValue::Timestamp(april_third),
                // Slashes are stripped as noise, leaving a plain number.
                CellValue::Number(3042024.0),
                text("Tuesday"),
            ]
        );
    }

    #[test]
    fn test_typed_source_cells_pass_through() {
        let stamp = NaiveDate::from_ymd_opt(2023, 12, 31)
            .and_then(|d| d.and_hms_opt(23, 59, 0))
            .unwrap();
        let table = Table::from_columns(vec![(
            "mixed",
            vec![CellValue::Number(42.0), CellValue::Timestamp(stamp), text("12,5")],
        )]);

        let outcome = clean_with_report(&table);

        assert_eq!(
            outcome.table.columns[0].cells,
            vec![
                CellValue::Number(42.0),
                CellValue::Timestamp(stamp),
                CellValue::Number(12.5),
            ]
        );
        assert_eq!(outcome.report.columns[0].numbers, 1);
        assert_eq!(outcome.report.columns[0].timestamps, 0);
    }

    #[test]
    fn test_lossy_identifiers() {
        let table = Table::from_columns(vec![("unit", vec![text("Unit 4B"), text("Room 12B")])]);

        let outcome = clean_with_report(&table);

        assert_eq!(
            outcome.table.columns[0].cells,
            vec![CellValue::Number(4.0), CellValue::Number(12.0)]
        );
        assert_eq!(outcome.report.columns[0].stripped, 2);
        assert!(outcome.report.columns[0].has_changes());
    }
}
