//! Clipboard engine: serializing selections to text/HTML and parsing pasted
//! payloads back into a value matrix.
//!
//! Payload format:
//! - `text/plain`: cells joined by `\t`, rows joined by `\n`, no trailing newline
//! - `text/html`: a fixed `<meta>` + `<style>` preamble followed by one `<table>`

mod copy_paste;
mod parser;
mod serializer;
mod table;

use serde::{Deserialize, Serialize};

pub use copy_paste::{AfterHook, ClipboardData, ClipboardHooks, CopyPaste, MemoryClipboard, PasteHook, TableHook};
pub use parser::{parse_clipboard, parse_html, parse_plain_text, MAX_CLIPBOARD_TEXT_BYTES, MAX_PASTE_CELLS};
pub use serializer::{CellTransform, ClipboardSerializer, CopyMode, CopySource};
pub use table::{CopyableTable, HeaderSlot};

/// MIME type of the plain-text payload.
pub const MIME_PLAIN: &str = "text/plain";

/// MIME type of the HTML payload.
pub const MIME_HTML: &str = "text/html";

/// Emitted before every HTML table.
pub const HTML_PREAMBLE: &str = concat!(
    r#"<meta name="generator" content="Handsontable"/>"#,
    r#"<style type="text/css">td{white-space:normal}br{mso-data-placement:same-cell}</style>"#,
);

/// Both clipboard representations of one copy.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipboardPayload {
    pub plain_text: String,
    pub html: String,
}

impl ClipboardPayload {
    /// Payload of a copy that resolved to nothing.
    pub fn empty() -> Self {
        CopyableTable::default().to_payload()
    }
}
