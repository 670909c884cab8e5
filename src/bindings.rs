//! JavaScript surface: a grid handle driven by DOM clipboard events.

use std::collections::HashSet;

use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::ClipboardEvent;

use crate::clipboard::CopyPaste;
use crate::config::GridSettings;
use crate::data::{CellValue, GridData};
use crate::grid::Grid;
use crate::headers::HeaderContext;
use crate::index_mapper::{IndexMapType, IndexMapper};
use crate::layout::Viewport;
use crate::types::CellCoords;

const HIDDEN_MAP: &str = "hidden";
const TRIMMED_MAP: &str = "trimmed";

#[derive(Serialize)]
struct RenderedArea {
    rows: Vec<usize>,
    columns: Vec<usize>,
}

/// A grid plus its clipboard controller and viewport.
#[wasm_bindgen]
pub struct GridHandle {
    grid: Grid,
    copy_paste: CopyPaste,
    viewport: Viewport,
}

#[wasm_bindgen]
impl GridHandle {
    /// `data` is an array of rows; `settings` is optional.
    #[wasm_bindgen(constructor)]
    pub fn new(data: JsValue, settings: JsValue) -> Result<GridHandle, JsValue> {
        console_error_panic_hook::set_once();

        let rows: Vec<Vec<CellValue>> = serde_wasm_bindgen::from_value(data)?;
        let settings: GridSettings = if settings.is_undefined() || settings.is_null() {
            GridSettings::default()
        } else {
            serde_wasm_bindgen::from_value(settings)?
        };
        settings.validate()?;

        let copy_paste = CopyPaste::new(&settings.copy_paste);
        let grid = Grid::new(GridData::from_rows(rows), settings);
        let viewport = grid.new_viewport(800.0, 600.0);
        Ok(GridHandle {
            grid,
            copy_paste,
            viewport,
        })
    }

    /// Handle a `copy` event. Returns `true` when the clipboard was written.
    pub fn on_copy(&mut self, event: &ClipboardEvent) -> bool {
        let Some(mut transfer) = event.clipboard_data() else {
            return false;
        };
        let copied = self.copy_paste.on_copy(&self.grid, &mut transfer).is_some();
        if copied {
            event.prevent_default();
        }
        copied
    }

    /// Handle a `cut` event. Returns `true` when the clipboard was written.
    pub fn on_cut(&mut self, event: &ClipboardEvent) -> bool {
        let Some(mut transfer) = event.clipboard_data() else {
            return false;
        };
        let cut = self.copy_paste.on_cut(&mut self.grid, &mut transfer).is_some();
        if cut {
            event.prevent_default();
        }
        cut
    }

    /// Handle a `paste` event. Returns the pasted area as
    /// `[top, left, bottom, right]`.
    pub fn on_paste(&mut self, event: &ClipboardEvent) -> Option<Vec<i32>> {
        let transfer = event.clipboard_data()?;
        let pasted = self.copy_paste.on_paste(&mut self.grid, &transfer)?;
        event.prevent_default();
        let (from, to) = (pasted.top_left(), pasted.bottom_right());
        Some(vec![from.row, from.col, to.row, to.col])
    }

    pub fn copy_cells_only(&mut self) {
        self.copy_paste.copy_cells_only();
    }

    pub fn copy_column_headers_only(&mut self) {
        self.copy_paste.copy_column_headers_only();
    }

    pub fn copy_with_column_headers(&mut self) {
        self.copy_paste.copy_with_column_headers();
    }

    pub fn copy_with_all_column_headers(&mut self) {
        self.copy_paste.copy_with_all_column_headers();
    }

    pub fn select_cell(&mut self, row: i32, col: i32) {
        self.grid.select_cell(row, col);
    }

    pub fn select_range(&mut self, from_row: i32, from_col: i32, to_row: i32, to_col: i32) {
        self.grid
            .select_range(CellCoords::new(from_row, from_col), CellCoords::new(to_row, to_col));
    }

    pub fn select_all(&mut self) {
        self.grid.select_all();
    }

    /// Selected ranges as `{highlight, from, to}` objects.
    pub fn selection(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(self.grid.selection().ranges())?)
    }

    /// Value at a visual cell, `undefined` outside the grid.
    pub fn value_at(&self, row: usize, col: usize) -> Result<JsValue, JsValue> {
        match self.grid.value_at(row, col) {
            Some(value) => Ok(serde_wasm_bindgen::to_value(&value)?),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    pub fn count_rows(&self) -> usize {
        self.grid.count_rows()
    }

    pub fn count_cols(&self) -> usize {
        self.grid.count_cols()
    }

    /// Hide these physical rows; replaces the previous set.
    pub fn hide_rows(&mut self, physical: Vec<u32>) {
        set_map(self.grid.rows_mut(), HIDDEN_MAP, IndexMapType::Hiding, &physical);
    }

    /// Trim these physical rows; replaces the previous set.
    pub fn trim_rows(&mut self, physical: Vec<u32>) {
        set_map(self.grid.rows_mut(), TRIMMED_MAP, IndexMapType::Trimming, &physical);
    }

    pub fn hide_columns(&mut self, physical: Vec<u32>) {
        set_map(self.grid.columns_mut(), HIDDEN_MAP, IndexMapType::Hiding, &physical);
    }

    pub fn trim_columns(&mut self, physical: Vec<u32>) {
        set_map(self.grid.columns_mut(), TRIMMED_MAP, IndexMapType::Trimming, &physical);
    }

    /// Install `modifier(label, column, level)`; it must return the label to
    /// show. Pass `null` to remove it.
    pub fn set_column_header_modifier(&mut self, modifier: Option<js_sys::Function>) {
        let modifier = modifier.map(|f| {
            Box::new(move |label: &str, ctx: &HeaderContext| {
                f.call3(
                    &JsValue::NULL,
                    &JsValue::from_str(label),
                    &JsValue::from(ctx.column),
                    &JsValue::from(ctx.level.0),
                )
                .ok()
                .and_then(|value| value.as_string())
                .unwrap_or_else(|| label.to_string())
            }) as crate::headers::HeaderModifier
        });
        self.grid.headers_mut().set_modifier(modifier);
    }

    /// Resize and scroll the viewport, then return the visual rows and
    /// columns to render as `{rows, columns}`.
    pub fn viewport(&mut self, width: f32, height: f32, scroll_x: f32, scroll_y: f32) -> Result<JsValue, JsValue> {
        self.viewport.resize(width, height);
        let rows = self.grid.row_layout();
        let cols = self.grid.column_layout(width);
        self.viewport.set_scroll(scroll_x, scroll_y, &rows, &cols);
        let area = RenderedArea {
            rows: self.grid.rendered_rows(&self.viewport),
            columns: self.grid.rendered_columns(&self.viewport),
        };
        Ok(serde_wasm_bindgen::to_value(&area)?)
    }
}

fn set_map(mapper: &mut IndexMapper, name: &str, kind: IndexMapType, physical: &[u32]) {
    let indexes: HashSet<usize> = physical
        .iter()
        .filter_map(|&i| usize::try_from(i).ok())
        .collect();
    mapper.register_index_map(name, kind, |p| indexes.contains(&p));
}
