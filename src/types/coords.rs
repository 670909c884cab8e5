//! Cell coordinates and rectangular ranges in visual index space.
//!
//! Negative rows address column-header rows (-1 is the innermost header row),
//! negative columns address the row-header column.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// A visual (row, col) pair. Either component may be negative for headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellCoords {
    pub row: i32,
    pub col: i32,
}

impl CellCoords {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Build coords from unsigned visual indexes; `None` if they do not fit.
    pub fn from_visual(row: usize, col: usize) -> Option<Self> {
        Some(Self {
            row: i32::try_from(row).ok()?,
            col: i32::try_from(col).ok()?,
        })
    }

    /// True when the coords point at a header (negative row or column).
    pub fn is_header(&self) -> bool {
        self.row < 0 || self.col < 0
    }

    /// True when the coords point at a data cell.
    pub fn is_cell(&self) -> bool {
        self.row >= 0 && self.col >= 0
    }

    /// Row as a visual index, `None` for header rows.
    pub fn visual_row(&self) -> Option<usize> {
        usize::try_from(self.row).ok()
    }

    /// Column as a visual index, `None` for the row-header column.
    pub fn visual_col(&self) -> Option<usize> {
        usize::try_from(self.col).ok()
    }

    /// Whether the coords lie inside a grid of `rows` x `cols` data cells
    /// plus `header_rows` column-header rows and `row_header_cols` row-header columns.
    pub fn is_valid(&self, rows: usize, cols: usize, header_rows: usize, row_header_cols: usize) -> bool {
        let row_ok = match self.visual_row() {
            Some(r) => r < rows,
            None => usize::try_from(-i64::from(self.row)).is_ok_and(|depth| depth <= header_rows),
        };
        let col_ok = match self.visual_col() {
            Some(c) => c < cols,
            None => usize::try_from(-i64::from(self.col)).is_ok_and(|depth| depth <= row_header_cols),
        };
        row_ok && col_ok
    }
}

/// Direction in which a range was drawn, from `from` towards `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeDirection {
    /// Top-left to bottom-right
    NwSe,
    /// Top-right to bottom-left
    NeSw,
    /// Bottom-left to top-right
    SwNe,
    /// Bottom-right to top-left
    SeNw,
}

/// A rectangle of visual coordinates with a highlighted (focused) cell.
///
/// Ranges are values: every operation returns a new range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRange {
    pub highlight: CellCoords,
    pub from: CellCoords,
    pub to: CellCoords,
}

impl CellRange {
    /// A range from `from` to `to`. A `highlight` outside the rectangle is
    /// clamped onto its nearest edge.
    pub fn new(highlight: CellCoords, from: CellCoords, to: CellCoords) -> Self {
        let (top, bottom) = (from.row.min(to.row), from.row.max(to.row));
        let (left, right) = (from.col.min(to.col), from.col.max(to.col));
        Self {
            highlight: CellCoords::new(
                highlight.row.clamp(top, bottom),
                highlight.col.clamp(left, right),
            ),
            from,
            to,
        }
    }

    /// A range covering one cell, highlighted on itself.
    pub fn single(coords: CellCoords) -> Self {
        Self::new(coords, coords, coords)
    }

    /// A range from `from` to `to`, highlighted on `from`.
    pub fn between(from: CellCoords, to: CellCoords) -> Self {
        Self::new(from, from, to)
    }

    /// The same rectangle with `from` at the top-left and `to` at the bottom-right.
    /// Each axis is ordered independently.
    pub fn normalized(&self) -> Self {
        Self {
            highlight: self.highlight,
            from: self.top_left(),
            to: self.bottom_right(),
        }
    }

    pub fn top_left(&self) -> CellCoords {
        CellCoords::new(self.from.row.min(self.to.row), self.from.col.min(self.to.col))
    }

    pub fn bottom_right(&self) -> CellCoords {
        CellCoords::new(self.from.row.max(self.to.row), self.from.col.max(self.to.col))
    }

    pub fn top_right(&self) -> CellCoords {
        CellCoords::new(self.from.row.min(self.to.row), self.from.col.max(self.to.col))
    }

    pub fn bottom_left(&self) -> CellCoords {
        CellCoords::new(self.from.row.max(self.to.row), self.from.col.min(self.to.col))
    }

    pub fn direction(&self) -> RangeDirection {
        let down = self.to.row >= self.from.row;
        let right = self.to.col >= self.from.col;
        match (down, right) {
            (true, true) => RangeDirection::NwSe,
            (true, false) => RangeDirection::NeSw,
            (false, true) => RangeDirection::SwNe,
            (false, false) => RangeDirection::SeNw,
        }
    }

    /// Number of rows covered, headers included.
    pub fn height(&self) -> usize {
        usize::try_from(i64::from(self.from.row).abs_diff(i64::from(self.to.row)))
            .map_or(usize::MAX, |d| d.saturating_add(1))
    }

    /// Number of columns covered, headers included.
    pub fn width(&self) -> usize {
        usize::try_from(i64::from(self.from.col).abs_diff(i64::from(self.to.col)))
            .map_or(usize::MAX, |d| d.saturating_add(1))
    }

    pub fn is_single(&self) -> bool {
        self.from == self.to
    }

    /// True when either corner lies in a header.
    pub fn is_header(&self) -> bool {
        self.from.is_header() || self.to.is_header()
    }

    /// True when both corners lie in column headers (no data rows covered).
    pub fn is_column_header_only(&self) -> bool {
        self.from.row < 0 && self.to.row < 0
    }

    /// Inclusive membership test against the normalized bounds.
    pub fn includes(&self, coords: CellCoords) -> bool {
        let tl = self.top_left();
        let br = self.bottom_right();
        coords.row >= tl.row && coords.row <= br.row && coords.col >= tl.col && coords.col <= br.col
    }

    /// Whether `other` lies entirely inside this range.
    pub fn includes_range(&self, other: &CellRange) -> bool {
        self.includes(other.top_left()) && self.includes(other.bottom_right())
    }

    pub fn overlaps(&self, other: &CellRange) -> bool {
        self.intersection(other).is_some()
    }

    /// The shared rectangle, highlighted on its top-left corner.
    pub fn intersection(&self, other: &CellRange) -> Option<CellRange> {
        let a_tl = self.top_left();
        let a_br = self.bottom_right();
        let b_tl = other.top_left();
        let b_br = other.bottom_right();
        let tl = CellCoords::new(a_tl.row.max(b_tl.row), a_tl.col.max(b_tl.col));
        let br = CellCoords::new(a_br.row.min(b_br.row), a_br.col.min(b_br.col));
        if tl.row > br.row || tl.col > br.col {
            return None;
        }
        let highlight = if self.includes(self.highlight) && other.includes(self.highlight) {
            self.highlight
        } else {
            tl
        };
        Some(CellRange::new(highlight, tl, br))
    }

    /// Grow the range so it also covers `coords`, keeping the drawing direction.
    pub fn expand(&self, coords: CellCoords) -> CellRange {
        let tl = self.top_left();
        let br = self.bottom_right();
        let new_tl = CellCoords::new(tl.row.min(coords.row), tl.col.min(coords.col));
        let new_br = CellCoords::new(br.row.max(coords.row), br.col.max(coords.col));
        let (from, to) = match self.direction() {
            RangeDirection::NwSe => (new_tl, new_br),
            RangeDirection::NeSw => (
                CellCoords::new(new_tl.row, new_br.col),
                CellCoords::new(new_br.row, new_tl.col),
            ),
            RangeDirection::SwNe => (
                CellCoords::new(new_br.row, new_tl.col),
                CellCoords::new(new_tl.row, new_br.col),
            ),
            RangeDirection::SeNw => (new_br, new_tl),
        };
        CellRange::new(self.highlight, from, to)
    }

    /// The union bounding box of two ranges, highlighted like `self`.
    pub fn union(&self, other: &CellRange) -> CellRange {
        self.expand(other.top_left()).expand(other.bottom_right())
    }

    /// Data rows covered by the range, clamped to `count` visual rows.
    pub fn row_span(&self, count: usize) -> Option<RangeInclusive<usize>> {
        clamp_axis(self.top_left().row, self.bottom_right().row, count)
    }

    /// Data columns covered by the range, clamped to `count` visual columns.
    pub fn column_span(&self, count: usize) -> Option<RangeInclusive<usize>> {
        clamp_axis(self.top_left().col, self.bottom_right().col, count)
    }

    /// Number of column-header rows covered (rows with negative index).
    pub fn header_rows_covered(&self) -> usize {
        let top = self.top_left().row;
        let bottom = self.bottom_right().row.min(-1);
        if top > bottom {
            return 0;
        }
        usize::try_from(i64::from(bottom) - i64::from(top) + 1).unwrap_or(0)
    }
}

fn clamp_axis(start: i32, end: i32, count: usize) -> Option<RangeInclusive<usize>> {
    if count == 0 {
        return None;
    }
    let end = usize::try_from(end).ok()?;
    let start = usize::try_from(start.max(0)).ok()?;
    let end = end.min(count - 1);
    if start > end {
        return None;
    }
    Some(start..=end)
}
