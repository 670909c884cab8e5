//! The grid facade: data, index mappers, headers, selection and sizes in
//! one place, addressed by visual coordinates.

use std::collections::HashMap;
use std::fmt;

use crate::clipboard::CopySource;
use crate::config::GridSettings;
use crate::data::{CellValue, DataStore};
use crate::headers::{ColumnHeaders, NestedHeaders};
use crate::index_mapper::IndexMapper;
use crate::layout::{stretch_widths, AxisLayout, Viewport, ViewportOptions};
use crate::types::{CellCoords, CellRange, GridExtent, Selection};

/// A grid over any [`DataStore`].
pub struct Grid {
    data: Box<dyn DataStore>,
    rows: IndexMapper,
    columns: IndexMapper,
    headers: ColumnHeaders,
    selection: Selection,
    /// Height overrides by physical row
    row_heights: HashMap<usize, f32>,
    /// Width overrides by physical column
    column_widths: HashMap<usize, f32>,
    settings: GridSettings,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("dimensions", &self.data.dimensions())
            .field("rows", &self.rows)
            .field("columns", &self.columns)
            .field("headers", &self.headers)
            .field("selection", &self.selection)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Grid {
    pub fn new(data: impl DataStore + 'static, settings: GridSettings) -> Self {
        let (rows, cols) = data.dimensions();
        let mut headers = ColumnHeaders::new(settings.col_headers);
        if let Some(nested) = &settings.nested_headers {
            headers.set_source(NestedHeaders::new(nested));
        }
        Self {
            data: Box::new(data),
            rows: IndexMapper::new(rows),
            columns: IndexMapper::new(cols),
            headers,
            selection: Selection::new(),
            row_heights: HashMap::new(),
            column_widths: HashMap::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    pub fn rows(&self) -> &IndexMapper {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut IndexMapper {
        &mut self.rows
    }

    pub fn columns(&self) -> &IndexMapper {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut IndexMapper {
        &mut self.columns
    }

    pub fn headers(&self) -> &ColumnHeaders {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut ColumnHeaders {
        &mut self.headers
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    /// Visual row count.
    pub fn count_rows(&self) -> usize {
        self.rows.count_visual()
    }

    /// Visual column count.
    pub fn count_cols(&self) -> usize {
        self.columns.count_visual()
    }

    /// Value at a visual cell; `None` outside the grid.
    pub fn value_at(&self, row: usize, col: usize) -> Option<CellValue> {
        let (row, col) = self.physical(row, col)?;
        Some(self.data.value_at(row, col))
    }

    /// Write a visual cell. Returns `false` outside the grid.
    pub fn set_value(&mut self, row: usize, col: usize, value: CellValue) -> bool {
        match self.physical(row, col) {
            Some((row, col)) => self.data.set_value_at(row, col, value),
            None => false,
        }
    }

    fn physical(&self, row: usize, col: usize) -> Option<(usize, usize)> {
        Some((self.rows.to_physical(row)?, self.columns.to_physical(col)?))
    }

    pub fn select_cell(&mut self, row: i32, col: i32) {
        self.selection.select_cell(CellCoords::new(row, col));
    }

    pub fn select_range(&mut self, from: CellCoords, to: CellCoords) {
        self.selection.select_range(from, to);
    }

    pub fn select_all(&mut self) {
        let extent = self.extent();
        self.selection.select_all(extent);
    }

    pub fn extent(&self) -> GridExtent {
        GridExtent {
            rows: self.count_rows(),
            columns: self.count_cols(),
            column_header_levels: self.headers.levels(),
            row_headers: self.settings.row_headers,
        }
    }

    /// Read-only view for the clipboard serializer.
    pub fn copy_source(&self) -> CopySource<'_> {
        CopySource {
            data: self.data.as_accessor(),
            rows: &self.rows,
            columns: &self.columns,
            headers: &self.headers,
        }
    }

    /// The last selected range, if any.
    pub fn last_range(&self) -> Option<CellRange> {
        self.selection.last_range().copied()
    }

    /// Override a row height by visual index; `None` restores the default.
    pub fn set_row_height(&mut self, row: usize, height: Option<f32>) {
        if let Some(physical) = self.rows.to_physical(row) {
            Self::set_size(&mut self.row_heights, physical, height);
        }
    }

    /// Override a column width by visual index; `None` restores the default.
    pub fn set_column_width(&mut self, col: usize, width: Option<f32>) {
        if let Some(physical) = self.columns.to_physical(col) {
            Self::set_size(&mut self.column_widths, physical, width);
        }
    }

    fn set_size(sizes: &mut HashMap<usize, f32>, physical: usize, size: Option<f32>) {
        match size {
            Some(size) if size.is_finite() && size >= 0.0 => {
                sizes.insert(physical, size);
            }
            _ => {
                sizes.remove(&physical);
            }
        }
    }

    /// Positions of the renderable rows.
    pub fn row_layout(&self) -> AxisLayout {
        AxisLayout::from_sizes(Self::renderable_sizes(
            &self.rows,
            &self.row_heights,
            self.settings.default_row_height,
        ))
    }

    /// Positions of the renderable columns, stretched to `viewport_width`.
    pub fn column_layout(&self, viewport_width: f32) -> AxisLayout {
        let widths: Vec<f32> = Self::renderable_sizes(
            &self.columns,
            &self.column_widths,
            self.settings.default_column_width,
        )
        .collect();
        AxisLayout::from_sizes(stretch_widths(&widths, viewport_width, self.settings.stretch_h))
    }

    fn renderable_sizes<'a>(
        mapper: &'a IndexMapper,
        overrides: &'a HashMap<usize, f32>,
        default: f32,
    ) -> impl Iterator<Item = f32> + 'a {
        (0..mapper.count_renderable()).map(move |renderable| {
            mapper
                .renderable_to_physical(renderable)
                .and_then(|physical| overrides.get(&physical).copied())
                .unwrap_or(default)
        })
    }

    pub fn viewport_options(&self) -> ViewportOptions {
        self.settings.viewport_options()
    }

    /// A viewport with the configured fixed rows/columns and direction.
    pub fn new_viewport(&self, width: f32, height: f32) -> Viewport {
        Viewport {
            fixed_rows_top: self.settings.fixed_rows_top,
            fixed_columns_start: self.settings.fixed_columns_start,
            direction: self.settings.layout_direction,
            ..Viewport::new(width, height)
        }
    }

    /// Visual indexes of the rows to render, fixed rows first.
    pub fn rendered_rows(&self, viewport: &Viewport) -> Vec<usize> {
        let area = viewport.area(
            &self.row_layout(),
            &self.column_layout(viewport.width),
            &self.viewport_options(),
        );
        area.row_indexes()
            .into_iter()
            .filter_map(|r| self.rows.renderable_to_visual(r))
            .collect()
    }

    /// Visual indexes of the columns to render, fixed columns first.
    pub fn rendered_columns(&self, viewport: &Viewport) -> Vec<usize> {
        let area = viewport.area(
            &self.row_layout(),
            &self.column_layout(viewport.width),
            &self.viewport_options(),
        );
        area.column_indexes()
            .into_iter()
            .filter_map(|c| self.columns.renderable_to_visual(c))
            .collect()
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
    use crate::data::GridData;
    use crate::index_mapper::IndexMapType;
    use crate::layout::ColumnStretch;

    fn grid(rows: usize, cols: usize) -> Grid {
        Grid::new(GridData::spreadsheet(rows, cols), GridSettings::default())
    }

    #[test]
    fn test_visual_access_follows_sequence() {
        let mut grid = grid(3, 2);
        grid.rows_mut().set_indexes_sequence(vec![2, 0, 1]).unwrap();
        assert_eq!(grid.value_at(0, 0), Some(CellValue::from("A3")));
        assert!(grid.set_value(0, 1, CellValue::from("x")));
        assert_eq!(grid.value_at(0, 1), Some(CellValue::from("x")));
        assert_eq!(grid.value_at(3, 0), None);
        assert!(!grid.set_value(0, 5, CellValue::Empty));
    }

    #[test]
    fn test_extent_and_select_all() {
        let mut grid = grid(4, 3);
        grid.columns_mut()
            .register_index_map("trim", IndexMapType::Trimming, |c| c == 2);
        let extent = grid.extent();
        assert_eq!((extent.rows, extent.columns, extent.column_header_levels), (4, 2, 1));
        grid.select_all();
        let range = grid.last_range().unwrap();
        assert_eq!(range.top_left(), CellCoords::new(-1, 0));
        assert_eq!(range.bottom_right(), CellCoords::new(3, 1));
    }

    #[test]
    fn test_layouts_skip_hidden_and_use_overrides() {
        let mut grid = grid(3, 3);
        grid.set_row_height(1, Some(40.0));
        grid.rows_mut()
            .register_index_map("hide", IndexMapType::Hiding, |r| r == 0);
        let rows = grid.row_layout();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.total_size(), 63.0);

        grid.set_row_height(1, None);
        assert_eq!(grid.row_layout().total_size(), 46.0);
    }

    #[test]
    fn test_column_layout_stretches() {
        let settings = GridSettings {
            stretch_h: ColumnStretch::Last,
            ..GridSettings::default()
        };
        let grid = Grid::new(GridData::new(1, 2), settings);
        let cols = grid.column_layout(300.0);
        assert_eq!(cols.size(0), 50.0);
        assert_eq!(cols.size(1), 250.0);
    }

    #[test]
    fn test_rendered_indexes_are_visual() {
        let mut grid = grid(100, 5);
        grid.rows_mut()
            .register_index_map("hide", IndexMapType::Hiding, |r| r < 2);
        let viewport = grid.new_viewport(250.0, 230.0);
        let rows = grid.rendered_rows(&viewport);
        assert_eq!(rows.first(), Some(&2));
        assert!(rows.len() >= 10);
        assert_eq!(grid.rendered_columns(&viewport), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_nested_headers_from_settings() {
        let settings = GridSettings::from_json(r#"{"nestedHeaders": [["A", "B"], ["C", "D"]]}"#).unwrap();
        let grid = Grid::new(GridData::new(1, 2), settings);
        assert_eq!(grid.headers().levels(), 2);
        assert_eq!(grid.extent().column_header_levels, 2);
    }
}
