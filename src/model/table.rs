//! Table and cell data structures

use std::borrow::Cow;

use chrono::{NaiveDateTime, NaiveTime};

use super::schema::{CellType, Column};

/// A cell value with type information
#[derive(Debug, Clone)]
pub enum CellValue {
    Null,
    Text(Cow<'static, str>),
    Number(f64),
    Timestamp(NaiveDateTime),
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Text(a), CellValue::Text(b)) => a == b,
            (CellValue::Number(a), CellValue::Number(b)) => {
                // Handle NaN comparison
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (CellValue::Timestamp(a), CellValue::Timestamp(b)) => a == b,
            _ => false,
        }
    }
}

impl CellValue {
    /// Build a text cell from anything string-like
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(Cow::Owned(s.into()))
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Borrow the text of a `Text` cell
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    /// The type tag of this value
    pub fn cell_type(&self) -> CellType {
        match self {
            CellValue::Null => CellType::Null,
            CellValue::Text(_) => CellType::Text,
            CellValue::Number(_) => CellType::Number,
            CellValue::Timestamp(_) => CellType::Timestamp,
        }
    }

    /// Convert to a display string. Null renders as an empty string.
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed(""),
            CellValue::Text(s) => Cow::Borrowed(s.as_ref()),
            CellValue::Number(f) => Cow::Owned(f.to_string()),
            CellValue::Timestamp(dt) => {
                if dt.time() == NaiveTime::MIN {
                    Cow::Owned(dt.format("%Y-%m-%d").to_string())
                } else {
                    Cow::Owned(dt.format("%Y-%m-%d %H:%M:%S").to_string())
                }
            }
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(Cow::Owned(s.to_string()))
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(Cow::Owned(s))
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Number(f)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Number(i as f64)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::Timestamp(dt)
    }
}

impl<T> From<Option<T>> for CellValue
where
    T: Into<CellValue>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => CellValue::Null,
        }
    }
}

static NULL: CellValue = CellValue::Null;

/// A column-major table.
///
/// Every column holds exactly `row_count()` cells. `source_lines[i]` is the
/// 1-indexed line (or sheet row) the i-th row was read from.
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// Columns in their original left-to-right order
    pub columns: Vec<Column>,
    /// Origin of each row in the source file
    pub source_lines: Vec<usize>,
}

impl Table {
    /// Create a table from columns.
    ///
    /// The row count is the length of the longest column; shorter columns are
    /// padded with nulls. Source lines start at 2, as if the data had been
    /// read below a header row.
    pub fn new(columns: Vec<Column>) -> Self {
        let mut table = Self {
            columns,
            source_lines: Vec::new(),
        };
        table.conform();
        table
    }

    /// Build a table from `(name, cells)` pairs, as [`Table::new`] does.
    pub fn from_columns<S, I>(columns: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, Vec<CellValue>)>,
    {
        Self::new(
            columns
                .into_iter()
                .enumerate()
                .map(|(i, (name, cells))| Column::with_cells(name, i, cells))
                .collect(),
        )
    }

    /// Restore the row-count invariant after the public fields were edited.
    ///
    /// The row count becomes the larger of `source_lines.len()` and the
    /// longest column. Short columns are padded with nulls and missing source
    /// lines continue after the last known one.
    pub fn conform(&mut self) {
        let row_count = self
            .columns
            .iter()
            .map(|c| c.cells.len())
            .max()
            .unwrap_or(0)
            .max(self.source_lines.len());

        for column in &mut self.columns {
            column.cells.resize(row_count, CellValue::Null);
        }

        let mut next = self.source_lines.last().map_or(2, |line| line + 1);
        while self.source_lines.len() < row_count {
            self.source_lines.push(next);
            next += 1;
        }
    }

    /// Add a row to the table, padding with nulls or truncating to fit
    pub fn add_row(&mut self, mut cells: Vec<CellValue>, source_line: usize) {
        cells.resize(self.columns.len(), CellValue::Null);
        for (column, cell) in self.columns.iter_mut().zip(cells) {
            column.cells.push(cell);
        }
        self.source_lines.push(source_line);
    }

    /// Keep only the rows whose flag is `true`, preserving order
    pub fn retain_rows(&mut self, keep: &[bool]) {
        for column in &mut self.columns {
            let mut flags = keep.iter();
            column
                .cells
                .retain(|_| flags.next().copied().unwrap_or(false));
        }
        let mut flags = keep.iter();
        self.source_lines
            .retain(|_| flags.next().copied().unwrap_or(false));
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Get column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Get a cell by row and column index
    pub fn cell(&self, row: usize, column: usize) -> Option<&CellValue> {
        self.columns.get(column).and_then(|c| c.cells.get(row))
    }

    /// Cells of one row in column order
    pub fn row(&self, index: usize) -> Option<Vec<&CellValue>> {
        if index >= self.row_count() {
            return None;
        }
        Some(self.row_cells(index))
    }

    /// Iterate over rows in order
    pub fn rows(&self) -> impl Iterator<Item = Vec<&CellValue>> + '_ {
        (0..self.row_count()).map(move |i| self.row_cells(i))
    }

    /// Cells of one row; a column too short to reach the row reads as `Null`
    fn row_cells(&self, index: usize) -> Vec<&CellValue> {
        self.columns
            .iter()
            .map(|c| c.cells.get(index).unwrap_or(&NULL))
            .collect()
    }

    /// A copy of the first `n` rows
    pub fn head(&self, n: usize) -> Table {
        let n = n.min(self.row_count());
        Table {
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    cells: c.cells.iter().take(n).cloned().collect(),
                    ..c.clone()
                })
                .collect(),
            source_lines: self.source_lines[..n].to_vec(),
        }
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.source_lines.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Infer column types from data
    pub fn infer_column_types(&mut self) {
        for column in &mut self.columns {
            column.inferred_type = column
                .cells
                .iter()
                .fold(CellType::Null, |acc, cell| acc.widen(cell.cell_type()));
        }
    }
}
