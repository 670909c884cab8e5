//! Selection model: an ordered list of ranges plus derived highlight layers.
//!
//! Single-target operations (copy, cut, paste) read the last range.
//! Highlighting folds over every range.

use serde::{Deserialize, Serialize};

use super::coords::{CellCoords, CellRange};

/// Kind of highlight layer drawn for a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HighlightType {
    /// Selected data cells
    Area,
    /// Row headers of the selected rows
    RowHeader,
    /// Column headers of the selected columns
    ColumnHeader,
    /// Headers of fully selected rows/columns
    ActiveHeader,
    /// Autofill drag target
    Fill,
    /// The focused cell
    Focus,
    /// Application-defined layer
    Custom,
}

/// One highlight layer entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlight {
    pub kind: HighlightType,
    pub range: CellRange,
    /// CSS-ish class name for custom layers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

impl Highlight {
    fn new(kind: HighlightType, range: CellRange) -> Self {
        Self {
            kind,
            range,
            class_name: None,
        }
    }
}

/// Current shape of the grid, as needed by selection logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridExtent {
    /// Visual (non-trimmed) row count
    pub rows: usize,
    /// Visual (non-trimmed) column count
    pub columns: usize,
    /// Number of column-header rows
    pub column_header_levels: usize,
    /// Whether a row-header column is shown
    pub row_headers: bool,
}

impl GridExtent {
    fn header_depth(&self) -> i32 {
        i32::try_from(self.column_header_levels).unwrap_or(i32::MAX)
    }

    fn last_row(&self) -> i32 {
        i32::try_from(self.rows).unwrap_or(i32::MAX) - 1
    }

    fn last_col(&self) -> i32 {
        i32::try_from(self.columns).unwrap_or(i32::MAX) - 1
    }
}

/// Ordered collection of selected ranges.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    ranges: Vec<CellRange>,
    fill: Option<CellRange>,
    custom: Vec<(String, CellRange)>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with a single cell.
    pub fn select_cell(&mut self, coords: CellCoords) {
        self.select_cells([CellRange::single(coords)]);
    }

    /// Replace the selection with one range drawn from `from` to `to`.
    pub fn select_range(&mut self, from: CellCoords, to: CellCoords) {
        self.select_cells([CellRange::between(from, to)]);
    }

    /// Replace the selection wholesale.
    pub fn select_cells(&mut self, ranges: impl IntoIterator<Item = CellRange>) {
        self.ranges = ranges.into_iter().collect();
        self.fill = None;
    }

    /// Append a range (multi-range selection).
    pub fn add_range(&mut self, range: CellRange) {
        self.ranges.push(range);
    }

    /// Select every cell, every column-header row and the row-header column.
    ///
    /// The range reflects the current visual extent, so trimmed rows and
    /// columns are never part of it. When nothing is selectable the selection
    /// is cleared.
    pub fn select_all(&mut self, extent: GridExtent) {
        let top = if extent.column_header_levels > 0 {
            -extent.header_depth()
        } else {
            0
        };
        let left = if extent.row_headers { -1 } else { 0 };
        let bottom = extent.last_row();
        let right = extent.last_col();
        if bottom < top || right < left {
            self.clear();
            return;
        }
        let highlight = CellCoords::new(
            if extent.rows > 0 { 0 } else { bottom },
            if extent.columns > 0 { 0 } else { right },
        );
        self.select_cells([CellRange::new(
            highlight,
            CellCoords::new(top, left),
            CellCoords::new(bottom, right),
        )]);
    }

    pub fn clear(&mut self) {
        self.ranges.clear();
        self.fill = None;
        self.custom.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn ranges(&self) -> &[CellRange] {
        &self.ranges
    }

    /// The most recently added range.
    pub fn last_range(&self) -> Option<&CellRange> {
        self.ranges.last()
    }

    /// Bounding box of every range.
    pub fn bounding_range(&self) -> Option<CellRange> {
        let mut iter = self.ranges.iter();
        let first = iter.next()?.normalized();
        Some(iter.fold(first, |acc, range| acc.union(range)))
    }

    /// Whether any range covers the coords.
    pub fn is_selected(&self, coords: CellCoords) -> bool {
        self.ranges.iter().any(|range| range.includes(coords))
    }

    pub fn set_fill(&mut self, range: Option<CellRange>) {
        self.fill = range;
    }

    pub fn fill(&self) -> Option<&CellRange> {
        self.fill.as_ref()
    }

    pub fn add_custom(&mut self, class_name: impl Into<String>, range: CellRange) {
        self.custom.push((class_name.into(), range));
    }

    /// Derive typed highlight layers for the current extent.
    pub fn highlights(&self, extent: GridExtent) -> Vec<Highlight> {
        let mut layers = Vec::new();
        let last_row = extent.last_row();
        let last_col = extent.last_col();

        for range in &self.ranges {
            let tl = range.top_left();
            let br = range.bottom_right();
            let row_from = tl.row.max(0);
            let row_to = br.row.min(last_row);
            let col_from = tl.col.max(0);
            let col_to = br.col.min(last_col);
            let has_rows = row_from <= row_to;
            let has_cols = col_from <= col_to;

            if has_rows && has_cols {
                let area = CellRange::new(
                    range.highlight,
                    CellCoords::new(row_from, col_from),
                    CellCoords::new(row_to, col_to),
                );
                layers.push(Highlight::new(HighlightType::Area, area));
            }
            if extent.row_headers && has_rows {
                let rows = CellRange::between(
                    CellCoords::new(row_from, -1),
                    CellCoords::new(row_to, -1),
                );
                let whole_rows = col_from == 0 && col_to == last_col;
                layers.push(Highlight::new(
                    if whole_rows { HighlightType::ActiveHeader } else { HighlightType::RowHeader },
                    rows,
                ));
            }
            if extent.column_header_levels > 0 && has_cols {
                let cols = CellRange::between(
                    CellCoords::new(-1, col_from),
                    CellCoords::new(-1, col_to),
                );
                let whole_cols = row_from == 0 && row_to == last_row;
                layers.push(Highlight::new(
                    if whole_cols { HighlightType::ActiveHeader } else { HighlightType::ColumnHeader },
                    cols,
                ));
            }
        }

        if let Some(last) = self.ranges.last() {
            layers.push(Highlight::new(
                HighlightType::Focus,
                CellRange::single(last.highlight),
            ));
        }
        if let Some(fill) = self.fill {
            layers.push(Highlight::new(HighlightType::Fill, fill));
        }
        for (class_name, range) in &self.custom {
            layers.push(Highlight {
                kind: HighlightType::Custom,
                range: *range,
                class_name: Some(class_name.clone()),
            });
        }
        layers
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    fn c(row: i32, col: i32) -> CellCoords {
        CellCoords::new(row, col)
    }

    fn extent(rows: usize, columns: usize, levels: usize, row_headers: bool) -> GridExtent {
        GridExtent {
            rows,
            columns,
            column_header_levels: levels,
            row_headers,
        }
    }

    #[test]
    fn test_select_all_includes_headers() {
        let mut selection = Selection::new();
        selection.select_all(extent(5, 4, 2, true));
        let range = selection.last_range().unwrap();
        assert_eq!(range.from, c(-2, -1));
        assert_eq!(range.to, c(4, 3));
        assert_eq!(range.highlight, c(0, 0));
    }

    #[test]
    fn test_select_all_without_rows_keeps_headers() {
        let mut selection = Selection::new();
        selection.select_all(extent(0, 5, 1, true));
        let range = selection.last_range().unwrap();
        assert_eq!(range.from, c(-1, -1));
        assert_eq!(range.to, c(-1, 4));
        assert!(range.highlight.is_header());
    }

    #[test]
    fn test_select_all_with_nothing_selectable_clears() {
        let mut selection = Selection::new();
        selection.select_cell(c(0, 0));
        selection.select_all(extent(0, 5, 0, true));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_new_selection_replaces_ranges() {
        let mut selection = Selection::new();
        selection.select_cell(c(0, 0));
        selection.add_range(CellRange::single(c(2, 2)));
        assert_eq!(selection.ranges().len(), 2);
        assert_eq!(selection.last_range().unwrap().from, c(2, 2));

        selection.select_range(c(1, 1), c(0, 0));
        assert_eq!(selection.ranges().len(), 1);
    }

    #[test]
    fn test_bounding_range_folds_all_ranges() {
        let mut selection = Selection::new();
        selection.select_cell(c(1, 1));
        selection.add_range(CellRange::between(c(4, 0), c(3, 2)));
        let bounds = selection.bounding_range().unwrap();
        assert_eq!(bounds.top_left(), c(1, 0));
        assert_eq!(bounds.bottom_right(), c(4, 2));
        assert!(selection.is_selected(c(3, 1)));
        assert!(!selection.is_selected(c(2, 1)));
    }

    #[test]
    fn test_highlights_for_cell_range() {
        let mut selection = Selection::new();
        selection.select_range(c(1, 1), c(2, 2));
        let layers = selection.highlights(extent(5, 5, 1, true));
        let kinds: Vec<_> = layers.iter().map(|h| h.kind).collect();
        assert_eq!(
            kinds,
            vec![
                HighlightType::Area,
                HighlightType::RowHeader,
                HighlightType::ColumnHeader,
                HighlightType::Focus
            ]
        );
        assert_eq!(layers[1].range.from, c(1, -1));
        assert_eq!(layers[2].range.to, c(-1, 2));
    }

    #[test]
    fn test_whole_column_marks_active_header() {
        let mut selection = Selection::new();
        selection.select_range(c(-1, 2), c(4, 2));
        let layers = selection.highlights(extent(5, 5, 1, false));
        assert!(layers
            .iter()
            .any(|h| h.kind == HighlightType::ActiveHeader && h.range.from == c(-1, 2)));
    }

    #[test]
    fn test_fill_and_custom_layers() {
        let mut selection = Selection::new();
        selection.select_cell(c(0, 0));
        selection.set_fill(Some(CellRange::between(c(1, 0), c(3, 0))));
        selection.add_custom("note", CellRange::single(c(4, 4)));
        let layers = selection.highlights(extent(5, 5, 0, false));
        assert!(layers.iter().any(|h| h.kind == HighlightType::Fill));
        let custom = layers.iter().find(|h| h.kind == HighlightType::Custom).unwrap();
        assert_eq!(custom.class_name.as_deref(), Some("note"));
    }
}
