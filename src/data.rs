//! Cell values and the data accessor seam used by the clipboard engine.
//!
//! Accessors are addressed by **physical** row/column; translation from
//! visual coordinates happens in [`crate::grid::Grid`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cell_ref::cell_ref;

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Interpret pasted text. Pasted values always stay text; numeric
    /// coercion belongs to cell types, which live outside this crate.
    pub fn from_pasted(text: &str) -> Self {
        if text.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(text.to_string())
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", if *b { "true" } else { "false" }),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

/// Read access to cell values by physical index.
pub trait DataAccessor {
    fn value_at(&self, row: usize, col: usize) -> CellValue;
}

/// Read/write cell storage.
pub trait DataStore: DataAccessor {
    /// Write a value; returns `false` if the cell is out of bounds.
    fn set_value_at(&mut self, row: usize, col: usize, value: CellValue) -> bool;

    /// Physical (rows, columns).
    fn dimensions(&self) -> (usize, usize);

    /// Read-only view of this store.
    fn as_accessor(&self) -> &dyn DataAccessor;
}

/// Row-major in-memory storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GridData {
    rows: Vec<Vec<CellValue>>,
}

impl GridData {
    /// Empty storage of `rows` x `cols`.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows: vec![vec![CellValue::Empty; cols]; rows],
        }
    }

    /// Build from rows; ragged rows are padded to the widest row.
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();
        Self { rows }
    }

    /// A `rows` x `cols` fixture whose cells hold their own reference ("A1", "B1", ...).
    pub fn spreadsheet(rows: usize, cols: usize) -> Self {
        let rows = (0..rows)
            .map(|r| (0..cols).map(|c| CellValue::Text(cell_ref(r, c))).collect())
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }
}

impl DataAccessor for GridData {
    fn value_at(&self, row: usize, col: usize) -> CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .cloned()
            .unwrap_or_default()
    }
}

impl DataStore for GridData {
    fn set_value_at(&mut self, row: usize, col: usize, value: CellValue) -> bool {
        match self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    fn dimensions(&self) -> (usize, usize) {
        let cols = self.rows.first().map_or(0, Vec::len);
        (self.rows.len(), cols)
    }

    fn as_accessor(&self) -> &dyn DataAccessor {
        self
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_spreadsheet_fixture() {
        let data = GridData::spreadsheet(2, 3);
        assert_eq!(data.dimensions(), (2, 3));
        assert_eq!(data.value_at(0, 0), CellValue::from("A1"));
        assert_eq!(data.value_at(1, 2), CellValue::from("C2"));
        assert_eq!(data.value_at(5, 5), CellValue::Empty);
    }

    #[test]
    fn test_set_value_out_of_bounds() {
        let mut data = GridData::new(1, 1);
        assert!(data.set_value_at(0, 0, CellValue::Number(1.5)));
        assert!(!data.set_value_at(1, 0, CellValue::Bool(true)));
        assert_eq!(data.value_at(0, 0).to_string(), "1.5");
    }

    #[test]
    fn test_untagged_json() {
        let data: GridData = serde_json::from_str(r#"[[null, true, 2, "x"], ["y"]]"#).unwrap();
        let data = GridData::from_rows(data.rows().to_vec());
        assert_eq!(data.dimensions(), (2, 4));
        assert_eq!(data.value_at(0, 0), CellValue::Empty);
        assert_eq!(data.value_at(0, 1), CellValue::Bool(true));
        assert_eq!(data.value_at(0, 2), CellValue::Number(2.0));
        assert_eq!(data.value_at(1, 3), CellValue::Empty);
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Empty.to_string(), "");
        assert_eq!(CellValue::Bool(false).to_string(), "false");
        assert_eq!(CellValue::from("abc").to_string(), "abc");
        assert!(CellValue::from("").is_empty());
    }
}
