//! The resolved copy: header rows and data rows, ready to render.

use quick_xml::escape::partial_escape;

use super::{ClipboardPayload, HTML_PREAMBLE};

/// One header slot per exported column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderSlot {
    /// First exported column of a header spanning `colspan` exported columns
    Label { text: String, colspan: usize },
    /// Column covered by the label to its left
    Covered,
}

impl HeaderSlot {
    pub fn label(text: impl Into<String>) -> Self {
        HeaderSlot::Label {
            text: text.into(),
            colspan: 1,
        }
    }
}

/// Rows and columns chosen for a copy, with their resolved text.
///
/// Every header row and data row has exactly one entry per exported column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyableTable {
    /// Header rows, outermost first
    pub column_headers: Vec<Vec<HeaderSlot>>,
    pub rows: Vec<Vec<String>>,
    /// Visual indexes of the exported rows
    pub row_indexes: Vec<usize>,
    /// Visual indexes of the exported columns
    pub column_indexes: Vec<usize>,
}

impl CopyableTable {
    pub fn is_empty(&self) -> bool {
        self.column_headers.is_empty() && self.rows.is_empty()
    }

    /// Header rows as plain strings; covered slots are empty.
    pub fn header_labels(&self) -> Vec<Vec<String>> {
        self.column_headers
            .iter()
            .map(|row| {
                row.iter()
                    .map(|slot| match slot {
                        HeaderSlot::Label { text, .. } => text.clone(),
                        HeaderSlot::Covered => String::new(),
                    })
                    .collect()
            })
            .collect()
    }

    /// Tab/newline delimited text.
    pub fn to_plain_text(&self) -> String {
        let mut lines: Vec<String> = Vec::with_capacity(self.column_headers.len() + self.rows.len());
        for row in self.header_labels().iter().chain(self.rows.iter()) {
            let cells: Vec<String> = row.iter().map(|v| escape_cell_value(v)).collect();
            lines.push(cells.join("\t"));
        }
        lines.join("\n")
    }

    /// Preamble plus one `<table>`; `<thead>`/`<tbody>` only when they have rows.
    pub fn to_html(&self) -> String {
        let mut html = String::from(HTML_PREAMBLE);
        html.push_str("<table>");
        if !self.column_headers.is_empty() {
            html.push_str("<thead>");
            for row in &self.column_headers {
                html.push_str("<tr>");
                for slot in row {
                    if let HeaderSlot::Label { text, colspan } = slot {
                        if *colspan > 1 {
                            html.push_str(&format!("<th colspan={colspan}>"));
                        } else {
                            html.push_str("<th>");
                        }
                        html.push_str(&escape_html(text));
                        html.push_str("</th>");
                    }
                }
                html.push_str("</tr>");
            }
            html.push_str("</thead>");
        }
        if !self.rows.is_empty() {
            html.push_str("<tbody>");
            for row in &self.rows {
                html.push_str("<tr>");
                for value in row {
                    html.push_str("<td>");
                    html.push_str(&escape_html(value));
                    html.push_str("</td>");
                }
                html.push_str("</tr>");
            }
            html.push_str("</tbody>");
        }
        html.push_str("</table>");
        html
    }

    pub fn to_payload(&self) -> ClipboardPayload {
        ClipboardPayload {
            plain_text: self.to_plain_text(),
            html: self.to_html(),
        }
    }
}

/// Escape a cell value for TSV/clipboard format.
/// Only multi-line values are wrapped in quotes (internal quotes doubled);
/// everything else is written raw.
pub fn escape_cell_value(value: &str) -> String {
    if value.contains('\n') {
        let escaped = value.replace('"', "\"\"");
        format!("\"{}\"", escaped)
    } else {
        value.to_string()
    }
}

/// Escape text for an HTML cell: `& < >` as entities, line breaks (`\r\n`,
/// `\n` or `\r`) as `<br>`, tabs as `&#9;`.
pub fn escape_html(value: &str) -> String {
    partial_escape(value)
        .replace("\r\n", "<br>")
        .replace(['\n', '\r'], "<br>")
        .replace('\t', "&#9;")
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

    fn table(headers: Vec<Vec<HeaderSlot>>, rows: &[&[&str]]) -> CopyableTable {
        CopyableTable {
            column_headers: headers,
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
            ..CopyableTable::default()
        }
    }

    #[test]
    fn test_empty_table() {
        let empty = CopyableTable::default();
        assert!(empty.is_empty());
        assert_eq!(empty.to_plain_text(), "");
        assert_eq!(empty.to_html(), format!("{HTML_PREAMBLE}<table></table>"));
    }

    #[test]
    fn test_rows_only() {
        let t = table(vec![], &[&["A1", "B1"], &["A2", "B2"]]);
        assert_eq!(t.to_plain_text(), "A1\tB1\nA2\tB2");
        assert_eq!(
            t.to_html(),
            format!(
                "{HTML_PREAMBLE}<table><tbody><tr><td>A1</td><td>B1</td></tr>\
                 <tr><td>A2</td><td>B2</td></tr></tbody></table>"
            )
        );
    }

    #[test]
    fn test_merged_header() {
        let headers = vec![vec![
            HeaderSlot::label("A"),
            HeaderSlot::Label {
                text: "B".to_string(),
                colspan: 2,
            },
            HeaderSlot::Covered,
        ]];
        let t = table(headers, &[]);
        assert_eq!(t.to_plain_text(), "A\tB\t");
        assert_eq!(
            t.to_html(),
            format!("{HTML_PREAMBLE}<table><thead><tr><th>A</th><th colspan=2>B</th></tr></thead></table>")
        );
    }

    #[test]
    fn test_escaping() {
        assert_eq!(escape_cell_value("plain"), "plain");
        assert_eq!(escape_cell_value("a\tb"), "a\tb");
        assert_eq!(escape_cell_value("say \"hi\""), "say \"hi\"");
        assert_eq!(escape_cell_value("x\r"), "x\r");
        assert_eq!(escape_cell_value("say \"hi\"\nbye"), "\"say \"\"hi\"\"\nbye\"");
        assert_eq!(escape_html("a<b & c>\nd\te"), "a&lt;b &amp; c&gt;<br>d&#9;e");
        assert_eq!(escape_html("a\rb\r\nc"), "a<br>b<br>c");
    }

    #[test]
    fn test_plain_text_writes_values_raw() {
        let t = table(vec![], &[&["say \"hi\"", "a\tb"]]);
        assert_eq!(t.to_plain_text(), "say \"hi\"\ta\tb");
    }
}
