//! gridkit - headless data-grid core for the web
//!
//! Everything a browser data grid computes that is not DOM work:
//! - Physical/visual/renderable index mapping with hiding and trimming
//! - Viewport virtualization, fixed rows/columns, column stretching
//! - Cell coordinates, ranges and multi-range selection
//! - Nested column headers
//! - Clipboard copy (text/plain + text/html) and paste parsing
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { GridHandle } from 'gridkit';
//! await init();
//! const grid = new GridHandle([["A1", "B1"], ["A2", "B2"]], { colHeaders: true });
//! document.addEventListener('copy', (e) => grid.on_copy(e));
//! document.addEventListener('paste', (e) => grid.on_paste(e));
//! ```

pub mod cell_ref;
pub mod clipboard;
pub mod config;
pub mod data;
pub mod error;
pub mod grid;
pub mod headers;
pub mod index_mapper;
pub mod layout;
pub mod types;
pub mod xml_helpers;

#[cfg(target_arch = "wasm32")]
pub mod bindings;

use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
pub use bindings::GridHandle;

pub use clipboard::{ClipboardPayload, CopyMode, CopyPaste, MemoryClipboard};
pub use config::{CopyPasteSettings, GridSettings};
pub use data::{CellValue, DataAccessor, DataStore, GridData};
pub use error::{GridError, Result};
pub use grid::Grid;
pub use index_mapper::{IndexMapType, IndexMapper};
pub use types::*;

/// Parse a pasted payload into rows of strings, preferring the HTML table
///
/// # Errors
/// Returns an error if the matrix cannot be converted to a JS value.
#[wasm_bindgen(js_name = "parseClipboard")]
pub fn parse_clipboard_to_js(html: Option<String>, text: Option<String>) -> std::result::Result<JsValue, JsValue> {
    let rows = clipboard::parse_clipboard(html.as_deref(), text.as_deref());
    serde_wasm_bindgen::to_value(&rows)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
