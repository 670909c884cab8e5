//! Viewport state: scroll position, size, fixed rows/columns and direction.
//!
//! Scroll positions are in layout coordinates. Fixed rows/columns are never
//! scrolled, so the minimum scroll position is the fixed boundary.
//! All indexes here are renderable indexes.

use std::ops::Range;

use super::axis::AxisLayout;
use super::calculator::{CalculationType, RenderOffset, ViewportRange};
use crate::types::LayoutDirection;

/// Options for computing the rendered area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportOptions {
    pub row_offset: RenderOffset,
    pub column_offset: RenderOffset,
    pub render_all_rows: bool,
    pub render_all_columns: bool,
    pub calculation_type: CalculationType,
}

/// Items to render: fixed items plus the scrolled range of each axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportArea {
    pub fixed_rows: Range<usize>,
    pub fixed_columns: Range<usize>,
    pub rows: Option<ViewportRange>,
    pub columns: Option<ViewportRange>,
}

impl ViewportArea {
    /// Rendered rows in order: fixed first, then scrolled.
    pub fn row_indexes(&self) -> Vec<usize> {
        Self::indexes(&self.fixed_rows, self.rows.as_ref())
    }

    /// Rendered columns in order: fixed first, then scrolled.
    pub fn column_indexes(&self) -> Vec<usize> {
        Self::indexes(&self.fixed_columns, self.columns.as_ref())
    }

    fn indexes(fixed: &Range<usize>, scrolled: Option<&ViewportRange>) -> Vec<usize> {
        fixed
            .clone()
            .chain(scrolled.into_iter().flat_map(ViewportRange::indexes))
            .collect()
    }
}

/// Viewport state - the visible window over the grid
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Horizontal scroll position in layout coordinates
    pub scroll_x: f32,
    /// Vertical scroll position in layout coordinates
    pub scroll_y: f32,
    /// Viewport width in pixels (data area, without headers)
    pub width: f32,
    /// Viewport height in pixels (data area, without headers)
    pub height: f32,
    /// Rows pinned at the top
    pub fixed_rows_top: usize,
    /// Columns pinned at the start edge (left in LTR, right in RTL)
    pub fixed_columns_start: usize,
    pub direction: LayoutDirection,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            width,
            height,
            fixed_rows_top: 0,
            fixed_columns_start: 0,
            direction: LayoutDirection::Ltr,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    fn fixed_rows(&self, rows: &AxisLayout) -> usize {
        self.fixed_rows_top.min(rows.len())
    }

    fn fixed_columns(&self, cols: &AxisLayout) -> usize {
        self.fixed_columns_start.min(cols.len())
    }

    /// Rendered area for the current scroll position.
    pub fn area(&self, rows: &AxisLayout, cols: &AxisLayout, options: &ViewportOptions) -> ViewportArea {
        let fixed_rows = self.fixed_rows(rows);
        let fixed_cols = self.fixed_columns(cols);
        ViewportArea {
            fixed_rows: 0..fixed_rows,
            fixed_columns: 0..fixed_cols,
            rows: Self::scrolled_range(
                rows,
                fixed_rows,
                self.scroll_y,
                self.height,
                options.render_all_rows,
                options.row_offset,
                options.calculation_type,
            ),
            columns: Self::scrolled_range(
                cols,
                fixed_cols,
                self.scroll_x,
                self.width,
                options.render_all_columns,
                options.column_offset,
                options.calculation_type,
            ),
        }
    }

    fn scrolled_range(
        layout: &AxisLayout,
        fixed: usize,
        scroll: f32,
        size: f32,
        render_all: bool,
        offset: RenderOffset,
        calculation_type: CalculationType,
    ) -> Option<ViewportRange> {
        let fixed_size = layout.leading_size(fixed);
        let range = layout
            .calculator(fixed, scroll - fixed_size, size - fixed_size)
            .render_all(render_all)
            .overscan(offset)
            .calculation_type(calculation_type)
            .fixed_items(fixed > 0)
            .calculate()?;
        Some(ViewportRange {
            start: range.start + fixed,
            end: range.end + fixed,
            start_position: range.start_position + fixed_size,
            ..range
        })
    }

    /// Clamp scroll position to valid range.
    ///
    /// The minimum is the fixed boundary; the maximum lets the last item
    /// reach the end of the viewport.
    pub fn clamp_scroll(&mut self, rows: &AxisLayout, cols: &AxisLayout) {
        let fixed_width = cols.leading_size(self.fixed_columns(cols));
        let fixed_height = rows.leading_size(self.fixed_rows(rows));

        let scrollable_width = cols.total_size() - fixed_width;
        let scrollable_height = rows.total_size() - fixed_height;
        let content_width = self.width - fixed_width;
        let content_height = self.height - fixed_height;

        let max_x = fixed_width + (scrollable_width - content_width).max(0.0);
        let max_y = fixed_height + (scrollable_height - content_height).max(0.0);

        self.scroll_x = self.scroll_x.clamp(fixed_width, max_x);
        self.scroll_y = self.scroll_y.clamp(fixed_height, max_y);
    }

    /// Scroll by delta amounts
    pub fn scroll_by(&mut self, delta_x: f32, delta_y: f32, rows: &AxisLayout, cols: &AxisLayout) {
        self.scroll_x += delta_x;
        self.scroll_y += delta_y;
        self.clamp_scroll(rows, cols);
    }

    /// Set absolute scroll position
    pub fn set_scroll(&mut self, x: f32, y: f32, rows: &AxisLayout, cols: &AxisLayout) {
        self.scroll_x = x;
        self.scroll_y = y;
        self.clamp_scroll(rows, cols);
    }

    /// Scroll the minimum distance that brings a cell fully into view.
    /// Fixed rows/columns are always visible and never scroll.
    pub fn scroll_to_cell(&mut self, row: usize, col: usize, rows: &AxisLayout, cols: &AxisLayout) {
        let fixed_rows = self.fixed_rows(rows);
        let fixed_cols = self.fixed_columns(cols);
        if row >= fixed_rows {
            if let Some(top) = rows.position(row) {
                let content = self.height - rows.leading_size(fixed_rows);
                self.scroll_y = Self::reveal(self.scroll_y, top, rows.size(row), content);
            }
        }
        if col >= fixed_cols {
            if let Some(left) = cols.position(col) {
                let content = self.width - cols.leading_size(fixed_cols);
                self.scroll_x = Self::reveal(self.scroll_x, left, cols.size(col), content);
            }
        }
        self.clamp_scroll(rows, cols);
    }

    fn reveal(scroll: f32, start: f32, size: f32, content: f32) -> f32 {
        if start < scroll {
            start
        } else if start + size > scroll + content {
            start + size - content
        } else {
            scroll
        }
    }

    /// Cell at viewport-relative screen coordinates.
    pub fn cell_at(&self, x: f32, y: f32, rows: &AxisLayout, cols: &AxisLayout) -> Option<(usize, usize)> {
        let x = if self.direction.is_rtl() { self.width - x } else { x };
        let row = Self::hit(y, self.scroll_y, self.fixed_rows(rows), rows)?;
        let col = Self::hit(x, self.scroll_x, self.fixed_columns(cols), cols)?;
        Some((row, col))
    }

    fn hit(screen: f32, scroll: f32, fixed: usize, layout: &AxisLayout) -> Option<usize> {
        let fixed_size = layout.leading_size(fixed);
        if screen < fixed_size {
            return layout.index_at(screen);
        }
        let index = layout.index_at(screen - fixed_size + scroll)?;
        (index >= fixed).then_some(index)
    }

    /// Screen x of a column's leading edge. In RTL the axis is mirrored, so
    /// the value is the column's left edge measured from the viewport's left.
    pub fn screen_x(&self, col: usize, cols: &AxisLayout) -> Option<f32> {
        let left = cols.position(col)?;
        let fixed = self.fixed_columns(cols);
        let x = if col < fixed {
            left
        } else {
            cols.leading_size(fixed) + left - self.scroll_x
        };
        Some(if self.direction.is_rtl() {
            self.width - x - cols.size(col)
        } else {
            x
        })
    }

    /// Screen y of a row's top edge.
    pub fn screen_y(&self, row: usize, rows: &AxisLayout) -> Option<f32> {
        let top = rows.position(row)?;
        let fixed = self.fixed_rows(rows);
        Some(if row < fixed {
            top
        } else {
            rows.leading_size(fixed) + top - self.scroll_y
        })
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

    fn grid() -> (AxisLayout, AxisLayout) {
        (AxisLayout::uniform(100, 20.0), AxisLayout::uniform(20, 50.0))
    }

    #[test]
    fn test_area_without_fixed() {
        let (rows, cols) = grid();
        let viewport = Viewport::new(200.0, 100.0);
        let options = ViewportOptions {
            calculation_type: CalculationType::PartiallyVisible,
            ..ViewportOptions::default()
        };
        let area = viewport.area(&rows, &cols, &options);
        assert!(area.fixed_rows.is_empty());
        assert_eq!(area.row_indexes(), vec![0, 1, 2, 3, 4]);
        assert_eq!(area.column_indexes(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_area_with_fixed_rows() {
        let (rows, cols) = grid();
        let mut viewport = Viewport::new(200.0, 100.0);
        viewport.fixed_rows_top = 2;
        viewport.set_scroll(0.0, 240.0, &rows, &cols);
        let options = ViewportOptions {
            calculation_type: CalculationType::PartiallyVisible,
            ..ViewportOptions::default()
        };
        let area = viewport.area(&rows, &cols, &options);
        assert_eq!(area.fixed_rows, 0..2);
        // 60px of scrolled content starting 200px past the fixed boundary
        let scrolled = area.rows.unwrap();
        assert_eq!((scrolled.start, scrolled.end), (12, 14));
        assert_eq!(scrolled.start_position, 240.0);
    }

    #[test]
    fn test_clamp_scroll() {
        let (rows, cols) = grid();
        let mut viewport = Viewport::new(200.0, 100.0);
        viewport.set_scroll(-50.0, 1e9, &rows, &cols);
        assert_eq!(viewport.scroll_x, 0.0);
        assert_eq!(viewport.scroll_y, 2000.0 - 100.0);
    }

    #[test]
    fn test_scroll_to_cell() {
        let (rows, cols) = grid();
        let mut viewport = Viewport::new(200.0, 100.0);
        viewport.scroll_to_cell(10, 0, &rows, &cols);
        // Row 10 spans 200..220; bottom-aligned in a 100px viewport
        assert_eq!(viewport.scroll_y, 120.0);
        viewport.scroll_to_cell(2, 0, &rows, &cols);
        assert_eq!(viewport.scroll_y, 40.0);
    }

    #[test]
    fn test_cell_at_ltr_and_rtl() {
        let (rows, cols) = grid();
        let mut viewport = Viewport::new(200.0, 100.0);
        assert_eq!(viewport.cell_at(10.0, 45.0, &rows, &cols), Some((2, 0)));
        viewport.direction = LayoutDirection::Rtl;
        assert_eq!(viewport.cell_at(10.0, 45.0, &rows, &cols), Some((2, 3)));
        assert_eq!(viewport.screen_x(0, &cols), Some(150.0));
    }

    #[test]
    fn test_screen_position_of_fixed_column() {
        let (rows, cols) = grid();
        let mut viewport = Viewport::new(200.0, 100.0);
        viewport.fixed_columns_start = 1;
        viewport.set_scroll(150.0, 0.0, &rows, &cols);
        assert_eq!(viewport.screen_x(0, &cols), Some(0.0));
        // Column 3 starts at 150; scrolled content begins right after the fixed column
        assert_eq!(viewport.screen_x(3, &cols), Some(50.0));
        assert_eq!(viewport.cell_at(60.0, 0.0, &rows, &cols), Some((0, 3)));
    }
}
