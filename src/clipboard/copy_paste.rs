//! Copy, cut and paste against a [`Grid`] and a clipboard.

use std::collections::BTreeMap;
use std::fmt;

use super::parser::parse_clipboard;
use super::serializer::{ClipboardSerializer, CopyMode};
use super::table::CopyableTable;
use super::{ClipboardPayload, MIME_HTML, MIME_PLAIN};
use crate::config::CopyPasteSettings;
use crate::data::CellValue;
use crate::grid::Grid;
use crate::index_mapper::IndexMapper;
use crate::types::{CellCoords, CellRange};

/// A clipboard: string payloads keyed by MIME type.
pub trait ClipboardData {
    fn set_data(&mut self, mime: &str, value: &str);
    fn get_data(&self, mime: &str) -> Option<String>;
}

/// In-memory clipboard, for native hosts and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryClipboard {
    entries: BTreeMap<String, String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard holding a plain-text payload and optionally HTML.
    pub fn with_payload(plain_text: &str, html: Option<&str>) -> Self {
        let mut clipboard = Self::new();
        clipboard.set_data(MIME_PLAIN, plain_text);
        if let Some(html) = html {
            clipboard.set_data(MIME_HTML, html);
        }
        clipboard
    }
}

impl ClipboardData for MemoryClipboard {
    fn set_data(&mut self, mime: &str, value: &str) {
        self.entries.insert(mime.to_string(), value.to_string());
    }

    fn get_data(&self, mime: &str) -> Option<String> {
        self.entries.get(mime).cloned()
    }
}

#[cfg(target_arch = "wasm32")]
impl ClipboardData for web_sys::DataTransfer {
    fn set_data(&mut self, mime: &str, value: &str) {
        if let Err(e) = web_sys::DataTransfer::set_data(self, mime, value) {
            log::warn!("clipboard rejected {mime}: {e:?}");
        }
    }

    fn get_data(&self, mime: &str) -> Option<String> {
        web_sys::DataTransfer::get_data(self, mime)
            .ok()
            .filter(|value| !value.is_empty())
    }
}

/// Runs before a copy, cut or paste with the rows involved; `false` cancels.
pub type TableHook = Box<dyn FnMut(&[Vec<String>]) -> bool>;

/// Runs after a copy or cut with the rows written to the clipboard.
pub type AfterHook = Box<dyn FnMut(&[Vec<String>])>;

/// Runs after a paste with the parsed rows and the area written.
pub type PasteHook = Box<dyn FnMut(&[Vec<String>], &CellRange)>;

/// Optional callbacks around clipboard operations.
#[derive(Default)]
pub struct ClipboardHooks {
    pub before_copy: Option<TableHook>,
    pub after_copy: Option<AfterHook>,
    pub before_cut: Option<TableHook>,
    pub after_cut: Option<AfterHook>,
    pub before_paste: Option<TableHook>,
    pub after_paste: Option<PasteHook>,
}

impl fmt::Debug for ClipboardHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClipboardHooks")
            .field("before_copy", &self.before_copy.is_some())
            .field("after_copy", &self.after_copy.is_some())
            .field("before_cut", &self.before_cut.is_some())
            .field("after_cut", &self.after_cut.is_some())
            .field("before_paste", &self.before_paste.is_some())
            .field("after_paste", &self.after_paste.is_some())
            .finish()
    }
}

fn allowed(hook: &mut Option<TableHook>, data: &[Vec<String>]) -> bool {
    hook.as_mut().map_or(true, |hook| hook(data))
}

/// Clipboard controller.
///
/// The copy mode is armed by one of the `copy_*` methods and applies to the
/// next [`CopyPaste::on_copy`] only.
#[derive(Debug, Default)]
pub struct CopyPaste {
    serializer: ClipboardSerializer,
    pending_mode: CopyMode,
    skip_hidden: bool,
    pub hooks: ClipboardHooks,
}

impl CopyPaste {
    pub fn new(settings: &CopyPasteSettings) -> Self {
        Self {
            serializer: ClipboardSerializer::from_settings(settings),
            pending_mode: CopyMode::CellsOnly,
            skip_hidden: settings.skip_hidden,
            hooks: ClipboardHooks::default(),
        }
    }

    pub fn serializer(&self) -> &ClipboardSerializer {
        &self.serializer
    }

    pub fn serializer_mut(&mut self) -> &mut ClipboardSerializer {
        &mut self.serializer
    }

    /// Mode the next copy will use.
    pub fn pending_mode(&self) -> CopyMode {
        self.pending_mode
    }

    pub fn copy_cells_only(&mut self) {
        self.pending_mode = CopyMode::CellsOnly;
    }

    pub fn copy_column_headers_only(&mut self) {
        self.pending_mode = CopyMode::ColumnHeadersOnly;
    }

    pub fn copy_with_column_headers(&mut self) {
        self.pending_mode = CopyMode::WithColumnHeaders;
    }

    pub fn copy_with_all_column_headers(&mut self) {
        self.pending_mode = CopyMode::WithAllColumnHeaders;
    }

    /// Serialize the last selected range into `clipboard`.
    ///
    /// Returns `None` when nothing is selected or a hook cancelled the copy.
    pub fn on_copy(&mut self, grid: &Grid, clipboard: &mut dyn ClipboardData) -> Option<ClipboardPayload> {
        let mode = std::mem::take(&mut self.pending_mode);
        let range = grid.last_range()?;
        let table = self.serializer.table(&grid.copy_source(), &range, mode);
        let data = hook_rows(&table);
        if !allowed(&mut self.hooks.before_copy, &data) {
            log::debug!("copy cancelled by hook");
            return None;
        }

        let payload = write_payload(&table, clipboard);
        if let Some(hook) = self.hooks.after_copy.as_mut() {
            hook(&data);
        }
        Some(payload)
    }

    /// Copy the last selected range's cells, then empty them.
    pub fn on_cut(&mut self, grid: &mut Grid, clipboard: &mut dyn ClipboardData) -> Option<ClipboardPayload> {
        self.pending_mode = CopyMode::CellsOnly;
        let range = grid.last_range()?;
        let table = self.serializer.table(&grid.copy_source(), &range, CopyMode::CellsOnly);
        let data = hook_rows(&table);
        if !allowed(&mut self.hooks.before_cut, &data) {
            log::debug!("cut cancelled by hook");
            return None;
        }

        let payload = write_payload(&table, clipboard);
        for &row in &table.row_indexes {
            for &col in &table.column_indexes {
                grid.set_value(row, col, CellValue::Empty);
            }
        }
        if let Some(hook) = self.hooks.after_cut.as_mut() {
            hook(&data);
        }
        Some(payload)
    }

    /// Write the clipboard contents starting at the top-left cell of the last
    /// selected range and select the written area.
    ///
    /// A selection larger than the pasted block is filled by repeating the
    /// block. Writes are clipped to the grid.
    pub fn on_paste(&mut self, grid: &mut Grid, clipboard: &dyn ClipboardData) -> Option<CellRange> {
        let range = grid.last_range()?;
        let html = clipboard.get_data(MIME_HTML);
        let text = clipboard.get_data(MIME_PLAIN);
        let data = parse_clipboard(html.as_deref(), text.as_deref());
        let data_rows = data.len();
        let data_cols = data.iter().map(Vec::len).max().unwrap_or(0);
        if data_rows == 0 || data_cols == 0 {
            return None;
        }
        if !allowed(&mut self.hooks.before_paste, &data) {
            log::debug!("paste cancelled by hook");
            return None;
        }

        let top_left = range.top_left();
        let selected_rows = range.row_span(grid.count_rows()).map_or(0, Iterator::count);
        let selected_cols = range.column_span(grid.count_cols()).map_or(0, Iterator::count);
        let rows = self.target_indexes(top_left.row, data_rows.max(selected_rows), grid.rows());
        let cols = self.target_indexes(top_left.col, data_cols.max(selected_cols), grid.columns());

        for (i, &row) in rows.iter().enumerate() {
            let source = data.get(i % data_rows);
            for (j, &col) in cols.iter().enumerate() {
                let value = source
                    .and_then(|r| r.get(j % data_cols))
                    .map_or(CellValue::Empty, |text| CellValue::from_pasted(text));
                grid.set_value(row, col, value);
            }
        }

        let pasted = pasted_range(&rows, &cols)?;
        grid.selection_mut().select_cells([pasted]);
        if let Some(hook) = self.hooks.after_paste.as_mut() {
            hook(&data, &pasted);
        }
        Some(pasted)
    }

    /// Up to `count` visual indexes from `start` on, skipping hidden ones
    /// when configured.
    fn target_indexes(&self, start: i32, count: usize, mapper: &IndexMapper) -> Vec<usize> {
        let start = usize::try_from(start.max(0)).unwrap_or(0);
        (start..mapper.count_visual())
            .filter(|&visual| !(self.skip_hidden && mapper.is_visual_hidden(visual)))
            .take(count)
            .collect()
    }
}

/// Header labels followed by cell rows.
fn hook_rows(table: &CopyableTable) -> Vec<Vec<String>> {
    let mut rows = table.header_labels();
    rows.extend(table.rows.iter().cloned());
    rows
}

fn write_payload(table: &CopyableTable, clipboard: &mut dyn ClipboardData) -> ClipboardPayload {
    let payload = table.to_payload();
    clipboard.set_data(MIME_PLAIN, &payload.plain_text);
    clipboard.set_data(MIME_HTML, &payload.html);
    payload
}

fn pasted_range(rows: &[usize], cols: &[usize]) -> Option<CellRange> {
    let coords = |row: &usize, col: &usize| -> Option<CellCoords> {
        Some(CellCoords::new(i32::try_from(*row).ok()?, i32::try_from(*col).ok()?))
    };
    let from = coords(rows.first()?, cols.first()?)?;
    let to = coords(rows.last()?, cols.last()?)?;
    Some(CellRange::between(from, to))
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
    use crate::config::GridSettings;
    use crate::data::GridData;

    fn grid(rows: usize, cols: usize) -> Grid {
        Grid::new(GridData::spreadsheet(rows, cols), GridSettings::default())
    }

    #[test]
    fn test_mode_resets_after_copy() {
        let grid = grid(2, 2);
        let mut copy_paste = CopyPaste::default();
        let mut clipboard = MemoryClipboard::new();
        copy_paste.copy_with_column_headers();
        assert_eq!(copy_paste.pending_mode(), CopyMode::WithColumnHeaders);
        assert!(copy_paste.on_copy(&grid, &mut clipboard).is_none());
        assert_eq!(copy_paste.pending_mode(), CopyMode::CellsOnly);
    }

    #[test]
    fn test_copy_writes_both_formats() {
        let mut grid = grid(3, 3);
        grid.select_cell(1, 1);
        let mut clipboard = MemoryClipboard::new();
        let payload = CopyPaste::default().on_copy(&grid, &mut clipboard).unwrap();
        assert_eq!(payload.plain_text, "B2");
        assert_eq!(clipboard.get_data(MIME_PLAIN).as_deref(), Some("B2"));
        assert_eq!(clipboard.get_data(MIME_HTML), Some(payload.html));
    }

    #[test]
    fn test_before_copy_cancels() {
        let mut grid = grid(2, 2);
        grid.select_cell(0, 0);
        let mut copy_paste = CopyPaste::default();
        copy_paste.hooks.before_copy = Some(Box::new(|_: &[Vec<String>]| false));
        let mut clipboard = MemoryClipboard::new();
        assert!(copy_paste.on_copy(&grid, &mut clipboard).is_none());
        assert_eq!(clipboard, MemoryClipboard::new());
    }

    #[test]
    fn test_paste_repeats_into_larger_selection() {
        let mut grid = grid(4, 4);
        grid.select_range(CellCoords::new(0, 0), CellCoords::new(3, 1));
        let clipboard = MemoryClipboard::with_payload("x\ty", None);
        let pasted = CopyPaste::default().on_paste(&mut grid, &clipboard).unwrap();
        assert_eq!(pasted, CellRange::between(CellCoords::new(0, 0), CellCoords::new(3, 1)));
        for row in 0..4 {
            assert_eq!(grid.value_at(row, 0), Some(CellValue::from("x")));
            assert_eq!(grid.value_at(row, 1), Some(CellValue::from("y")));
        }
        assert_eq!(grid.value_at(0, 2), Some(CellValue::from("C1")));
    }

    #[test]
    fn test_paste_is_clipped_to_grid() {
        let mut grid = grid(2, 2);
        grid.select_cell(1, 1);
        let clipboard = MemoryClipboard::with_payload("a\tb\nc\td", None);
        let pasted = CopyPaste::default().on_paste(&mut grid, &clipboard).unwrap();
        assert_eq!(pasted, CellRange::single(CellCoords::new(1, 1)));
        assert_eq!(grid.value_at(1, 1), Some(CellValue::from("a")));
    }
}
