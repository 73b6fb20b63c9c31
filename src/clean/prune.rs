//! Removal of fully-empty rows

use crate::model::Table;

/// Drop every row whose cells are all `Null`.
///
/// Surviving rows keep their order and are renumbered from zero. Returns the
/// source lines of the dropped rows. A table without columns has no non-null
/// cell, so all of its rows are dropped. A column too short to reach a row
/// counts as `Null` there.
pub fn prune_empty_rows(table: &mut Table) -> Vec<usize> {
    let keep: Vec<bool> = (0..table.row_count())
        .map(|row| {
            table
                .columns
                .iter()
                .any(|c| c.cells.get(row).is_some_and(|cell| !cell.is_null()))
        })
        .collect();

    let dropped = table
        .source_lines
        .iter()
        .zip(&keep)
        .filter(|(_, kept)| !**kept)
        .map(|(line, _)| *line)
        .collect();

    table.retain_rows(&keep);
    dropped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellValue, Column};

    #[test]
    fn test_prune_keeps_order() {
        let mut table = Table::from_columns(vec![
            (
                "a",
                vec![
                    CellValue::Null,
                    CellValue::from("x"),
                    CellValue::Null,
                    CellValue::Null,
                ],
            ),
            (
                "b",
                vec![
                    CellValue::Null,
                    CellValue::Null,
                    CellValue::Null,
                    CellValue::Number(2.0),
                ],
            ),
        ]);

        let dropped = prune_empty_rows(&mut table);

        assert_eq!(dropped, vec![2, 4]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(
            table.row(0),
            Some(vec![&CellValue::from("x"), &CellValue::Null])
        );
        assert_eq!(
            table.row(1),
            Some(vec![&CellValue::Null, &CellValue::Number(2.0)])
        );
    }

    #[test]
    fn test_prune_without_columns_drops_everything() {
        let mut table = Table::new(Vec::<Column>::new());
        table.add_row(Vec::new(), 2);
        table.add_row(Vec::new(), 3);

        assert_eq!(prune_empty_rows(&mut table), vec![2, 3]);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_prune_tolerates_short_columns() {
        let mut table = Table {
            columns: vec![
                Column::with_cells("a", 0, Vec::new()),
                Column::with_cells("b", 1, vec![CellValue::Null, CellValue::from("x")]),
            ],
            source_lines: vec![2, 3],
        };

        assert_eq!(prune_empty_rows(&mut table), vec![2]);
        assert_eq!(table.source_lines, vec![3]);
        assert_eq!(table.columns[1].cells, vec![CellValue::from("x")]);
    }

    #[test]
    fn test_prune_empty_table() {
        let mut table = Table::from_columns(vec![("a", Vec::new())]);
        assert!(prune_empty_rows(&mut table).is_empty());
        assert_eq!(table.column_count(), 1);
    }
}
