//! Parse pasted clipboard payloads into a matrix of strings.
//!
//! HTML is preferred when present: the first `<table>` is read, spans are
//! expanded and the result is padded to a rectangle. Plain text is
//! tab/newline delimited with Excel-style quoting and is returned as-is
//! (ragged rows stay ragged).

use std::borrow::Cow;
use std::iter::Peekable;
use std::str::Chars;

use quick_xml::escape::unescape_with;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{GridError, Result};
use crate::xml_helpers::{html_span, local_name_string, tag_name};

/// Payloads larger than this are ignored.
pub const MAX_CLIPBOARD_TEXT_BYTES: usize = 10 * 1024 * 1024;

/// Most cells an HTML table may expand to once spans are resolved.
pub const MAX_PASTE_CELLS: usize = 1_000_000;

/// Parse a paste, preferring HTML over plain text.
///
/// HTML that is blank, oversized, has no table or fails to parse falls back
/// to the plain-text payload.
pub fn parse_clipboard(html: Option<&str>, text: Option<&str>) -> Vec<Vec<String>> {
    if let Some(html) = html.filter(|h| !h.trim().is_empty()) {
        if html.len() > MAX_CLIPBOARD_TEXT_BYTES {
            log::warn!("ignoring {} byte HTML clipboard payload", html.len());
        } else {
            match parse_html(html) {
                Ok(Some(rows)) => return rows,
                Ok(None) => log::debug!("clipboard HTML has no table, using plain text"),
                Err(e @ GridError::PasteTooLarge { .. }) => {
                    log::warn!("ignoring clipboard HTML table: {e}");
                }
                Err(e) => log::debug!("clipboard HTML did not parse ({e}), using plain text"),
            }
        }
    }

    let Some(text) = text else {
        return Vec::new();
    };
    if text.len() > MAX_CLIPBOARD_TEXT_BYTES {
        log::warn!("ignoring {} byte text clipboard payload", text.len());
        return Vec::new();
    }
    parse_plain_text(text)
}

/// Read the first `<table>` of an HTML fragment.
///
/// Returns `Ok(None)` when the fragment contains no table. Body cells with
/// `colspan`/`rowspan` repeat their value over the spanned slots; covered
/// slots of header cells are left empty. A rowspan stops at the table's last
/// row. Tables nested inside cells are skipped.
///
/// Fails with [`GridError::PasteTooLarge`] when the expanded table would
/// hold more than [`MAX_PASTE_CELLS`] cells.
pub fn parse_html(html: &str) -> Result<Option<Vec<Vec<String>>>> {
    let mut reader = Reader::from_str(html);
    reader.trim_text(false);
    reader.check_end_names(false);

    let mut grid = GridBuilder::default();
    let mut cell: Option<CellDraft> = None;
    let mut found = false;
    let mut depth = 0usize;
    let mut in_thead = false;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                let name = local_name_string(e);
                if name == "table" {
                    if depth == 0 && found {
                        break;
                    }
                    found = true;
                    depth += 1;
                    continue;
                }
                if depth != 1 {
                    continue;
                }
                match name.as_str() {
                    "thead" => in_thead = true,
                    "tbody" | "tfoot" => in_thead = false,
                    "tr" => {
                        grid.finish_cell(cell.take())?;
                        grid.start_row();
                    }
                    "td" | "th" => {
                        grid.finish_cell(cell.take())?;
                        cell = Some(CellDraft::new(e, in_thead));
                    }
                    "br" => {
                        if let Some(cell) = cell.as_mut() {
                            cell.text.push('\n');
                        }
                    }
                    _ => {}
                }
            }
            Event::Empty(ref e) if depth == 1 => match local_name_string(e).as_str() {
                "br" => {
                    if let Some(cell) = cell.as_mut() {
                        cell.text.push('\n');
                    }
                }
                "td" | "th" => {
                    grid.finish_cell(cell.take())?;
                    grid.finish_cell(Some(CellDraft::new(e, in_thead)))?;
                }
                _ => {}
            },
            Event::Text(ref e) if depth == 1 => {
                if let Some(cell) = cell.as_mut() {
                    let raw = String::from_utf8_lossy(e);
                    cell.text.push_str(&decode_text(&raw));
                }
            }
            Event::CData(ref e) if depth == 1 => {
                if let Some(cell) = cell.as_mut() {
                    cell.text.push_str(&String::from_utf8_lossy(e));
                }
            }
            Event::End(ref e) => {
                let name = tag_name(e.local_name().as_ref());
                if name == "table" {
                    if depth == 1 {
                        grid.finish_cell(cell.take())?;
                        break;
                    }
                    depth = depth.saturating_sub(1);
                    continue;
                }
                if depth != 1 {
                    continue;
                }
                match name.as_str() {
                    "td" | "th" | "tr" => grid.finish_cell(cell.take())?,
                    "thead" => in_thead = false,
                    _ => {}
                }
            }
            Event::Eof => {
                grid.finish_cell(cell.take())?;
                break;
            }
            _ => {}
        }
    }

    if !found {
        return Ok(None);
    }
    grid.finish().map(Some)
}

/// Parse tab/newline delimited text.
///
/// `\r\n` and `\r` count as newlines and one trailing newline is ignored.
/// A field starting with `"` is quoted only if the closing quote is
/// followed by a tab, a newline or the end of input; `""` inside it is a
/// literal quote. Otherwise the quote is kept as text.
pub fn parse_plain_text(text: &str) -> Vec<Vec<String>> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let body = normalized.strip_suffix('\n').unwrap_or(&normalized);
    if body.is_empty() {
        return Vec::new();
    }

    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut at_field_start = true;
    let mut chars = body.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if at_field_start => {
                at_field_start = false;
                if let Some((value, rest)) = quoted_field(chars.clone()) {
                    field = value;
                    chars = rest;
                } else {
                    field.push('"');
                }
            }
            '\t' => {
                row.push(std::mem::take(&mut field));
                at_field_start = true;
            }
            '\n' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
                at_field_start = true;
            }
            c => {
                field.push(c);
                at_field_start = false;
            }
        }
    }
    row.push(field);
    rows.push(row);
    rows
}

/// Read a quoted field body after its opening quote.
fn quoted_field(mut chars: Peekable<Chars<'_>>) -> Option<(String, Peekable<Chars<'_>>)> {
    let mut value = String::new();
    loop {
        match chars.next()? {
            '"' => {
                if chars.next_if_eq(&'"').is_some() {
                    value.push('"');
                    continue;
                }
                return match chars.peek() {
                    None | Some('\t' | '\n') => Some((value, chars)),
                    Some(_) => None,
                };
            }
            c => value.push(c),
        }
    }
}

/// Collapse source line breaks, then resolve entities. Undecodable text is
/// kept verbatim.
fn decode_text(raw: &str) -> String {
    let collapsed = collapse_line_breaks(raw);
    match unescape_with(&collapsed, resolve_entity) {
        Ok(Cow::Borrowed(text)) => text.to_string(),
        Ok(Cow::Owned(text)) => text,
        Err(_) => collapsed,
    }
}

fn resolve_entity(name: &str) -> Option<&'static str> {
    match name {
        "amp" => Some("&"),
        "lt" => Some("<"),
        "gt" => Some(">"),
        "quot" => Some("\""),
        "apos" => Some("'"),
        "nbsp" => Some(" "),
        _ => None,
    }
}

/// Whitespace runs containing a line break are markup formatting: dropped
/// at either edge of the chunk, a single space in between. Other runs are
/// kept.
fn collapse_line_breaks(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut run = String::new();
    let mut seen_text = false;

    for ch in raw.chars() {
        if ch.is_whitespace() {
            run.push(ch);
            continue;
        }
        flush_run(&mut out, &mut run, seen_text, false);
        out.push(ch);
        seen_text = true;
    }
    flush_run(&mut out, &mut run, seen_text, true);
    out
}

fn flush_run(out: &mut String, run: &mut String, seen_text: bool, at_end: bool) {
    if run.is_empty() {
        return;
    }
    if run.contains(['\n', '\r']) {
        if seen_text && !at_end {
            out.push(' ');
        }
    } else {
        out.push_str(run);
    }
    run.clear();
}

/// A cell being read.
struct CellDraft {
    text: String,
    colspan: usize,
    rowspan: usize,
    header: bool,
}

impl CellDraft {
    fn new(e: &BytesStart<'_>, header: bool) -> Self {
        Self {
            text: String::new(),
            colspan: html_span(e, "colspan"),
            rowspan: html_span(e, "rowspan"),
            header,
        }
    }
}

/// Places cells row by row, skipping slots taken by earlier rowspans.
#[derive(Default)]
struct GridBuilder {
    rows: Vec<Vec<Option<String>>>,
    current: Option<usize>,
    /// Slots written so far, including spanned copies
    filled: usize,
}

impl GridBuilder {
    fn start_row(&mut self) {
        let row = self.current.map_or(0, |r| r + 1);
        self.current = Some(row);
        self.slot(row, 0);
    }

    fn finish_cell(&mut self, cell: Option<CellDraft>) -> Result<()> {
        let Some(cell) = cell else {
            return Ok(());
        };
        self.filled = self
            .filled
            .saturating_add(cell.rowspan.saturating_mul(cell.colspan));
        if self.filled > MAX_PASTE_CELLS {
            return Err(GridError::PasteTooLarge {
                limit: MAX_PASTE_CELLS,
            });
        }
        let row = match self.current {
            Some(row) => row,
            None => {
                self.start_row();
                0
            }
        };
        let col = self
            .rows
            .get(row)
            .and_then(|slots| slots.iter().position(Option::is_none).or(Some(slots.len())))
            .unwrap_or(0);

        for r in row..row + cell.rowspan {
            for c in col..col + cell.colspan {
                let origin = r == row && c == col;
                let value = if origin || !cell.header {
                    cell.text.clone()
                } else {
                    String::new()
                };
                if let Some(slot) = self.slot(r, c) {
                    *slot = Some(value);
                }
            }
        }
        Ok(())
    }

    /// Slot at (row, col), growing the grid as needed.
    fn slot(&mut self, row: usize, col: usize) -> Option<&mut Option<String>> {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let slots = self.rows.get_mut(row)?;
        if slots.len() <= col {
            slots.resize(col + 1, None);
        }
        slots.get_mut(col)
    }

    /// Rectangular matrix; unfilled slots become empty strings. Rows that
    /// only exist because of a rowspan past the last `<tr>` are dropped.
    fn finish(mut self) -> Result<Vec<Vec<String>>> {
        self.rows.truncate(self.current.map_or(0, |r| r + 1));
        let width = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        if width.saturating_mul(self.rows.len()) > MAX_PASTE_CELLS {
            return Err(GridError::PasteTooLarge {
                limit: MAX_PASTE_CELLS,
            });
        }
        Ok(self
            .rows
            .into_iter()
            .map(|slots| {
                let mut row: Vec<String> = slots.into_iter().map(Option::unwrap_or_default).collect();
                row.resize(width, String::new());
                row
            })
            .collect())
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

    fn matrix(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_plain_text_basic() {
        assert_eq!(parse_plain_text("A1\tB1\nA2\tB2\n"), matrix(&[&["A1", "B1"], &["A2", "B2"]]));
        assert_eq!(parse_plain_text("a\r\nb\rc"), matrix(&[&["a"], &["b"], &["c"]]));
        assert!(parse_plain_text("").is_empty());
        assert!(parse_plain_text("\n").is_empty());
    }

    #[test]
    fn test_plain_text_ragged_rows() {
        assert_eq!(parse_plain_text("a\tb\tc\nd"), matrix(&[&["a", "b", "c"], &["d"]]));
    }

    #[test]
    fn test_plain_text_quoted() {
        assert_eq!(
            parse_plain_text("\"multi\nline\"\tx\n\"say \"\"hi\"\"\""),
            matrix(&[&["multi\nline", "x"], &["say \"hi\""]])
        );
    }

    #[test]
    fn test_plain_text_stray_quotes() {
        assert_eq!(parse_plain_text("\"abc\"def\tx"), matrix(&[&["\"abc\"def", "x"]]));
        assert_eq!(parse_plain_text("\"open\tx"), matrix(&[&["\"open", "x"]]));
        assert_eq!(parse_plain_text("5\" screen"), matrix(&[&["5\" screen"]]));
    }

    #[test]
    fn test_html_simple_table() {
        let html = "<table><tbody><tr><td>A1</td><td>B1</td></tr><tr><td>A2</td><td></td></tr></tbody></table>";
        assert_eq!(parse_html(html).unwrap(), Some(matrix(&[&["A1", "B1"], &["A2", ""]])));
    }

    #[test]
    fn test_html_without_table() {
        assert_eq!(parse_html("<p>hello</p>").unwrap(), None);
    }

    #[test]
    fn test_html_spans() {
        let html = "<table>\
            <thead><tr><th colspan=2>H</th><th>I</th></tr></thead>\
            <tbody><tr><td rowspan=2>x</td><td colspan=2>y</td></tr><tr><td>z</td></tr></tbody>\
            </table>";
        assert_eq!(
            parse_html(html).unwrap(),
            Some(matrix(&[&["H", "", "I"], &["x", "y", "y"], &["x", "z", ""]]))
        );
    }

    #[test]
    fn test_html_rowspan_stops_at_last_row() {
        let html = "<table><tr><td rowspan=3>x</td><td>y</td></tr></table>";
        assert_eq!(parse_html(html).unwrap(), Some(matrix(&[&["x", "y"]])));
    }

    #[test]
    fn test_html_text_normalization() {
        let html = "<table><tr><td>\n  a &amp; b\n  c&nbsp;d<br>e</td><td>1 & 2</td></tr></table>";
        assert_eq!(parse_html(html).unwrap(), Some(matrix(&[&["a & b c d\ne", "1 & 2"]])));
    }

    #[test]
    fn test_html_nested_table_is_ignored() {
        let html = "<table><tr><td>a<table><tr><td>inner</td></tr></table></td><td>b</td></tr></table>\
                    <table><tr><td>second</td></tr></table>";
        assert_eq!(parse_html(html).unwrap(), Some(matrix(&[&["a", "b"]])));
    }

    #[test]
    fn test_clipboard_prefers_html() {
        let rows = parse_clipboard(Some("<table><tr><td>html</td></tr></table>"), Some("text"));
        assert_eq!(rows, matrix(&[&["html"]]));
    }

    #[test]
    fn test_clipboard_falls_back_to_text() {
        assert_eq!(parse_clipboard(Some("   "), Some("a\tb")), matrix(&[&["a", "b"]]));
        assert_eq!(parse_clipboard(Some("<b>bold</b>"), Some("t")), matrix(&[&["t"]]));
        assert!(parse_clipboard(None, None).is_empty());
    }

    #[test]
    fn test_collapse_line_breaks() {
        assert_eq!(collapse_line_breaks("\n  a\n  b  c\n"), "a b  c");
        assert_eq!(collapse_line_breaks("  a "), "  a ");
    }
}
