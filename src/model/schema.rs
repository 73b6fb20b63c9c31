//! Column metadata and type information

use serde::Serialize;

use super::table::CellValue;

/// Inferred cell type for a column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    #[default]
    Null,
    Text,
    Number,
    Timestamp,
    Mixed,
}

impl CellType {
    /// Widen the type to accommodate another type
    pub fn widen(self, other: CellType) -> CellType {
        if self == other {
            return self;
        }

        match (self, other) {
            (CellType::Null, t) | (t, CellType::Null) => t,
            _ => CellType::Mixed,
        }
    }
}

impl std::fmt::Display for CellType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellType::Null => write!(f, "null"),
            CellType::Text => write!(f, "text"),
            CellType::Number => write!(f, "number"),
            CellType::Timestamp => write!(f, "timestamp"),
            CellType::Mixed => write!(f, "mixed"),
        }
    }
}

/// A named column and its cells
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name (from header)
    pub name: String,
    /// Column index (0-based position)
    pub index: usize,
    /// Cell values, one per row
    pub cells: Vec<CellValue>,
    /// Inferred type from data
    pub inferred_type: CellType,
}

impl Column {
    /// Create a new empty column with name and index
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self::with_cells(name, index, Vec::new())
    }

    /// Create a column holding the given cells
    pub fn with_cells(name: impl Into<String>, index: usize, cells: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            index,
            cells,
            inferred_type: CellType::Null,
        }
    }
}
