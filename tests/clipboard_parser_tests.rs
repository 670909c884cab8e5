// Clipboard parsing: spreadsheet-style payloads and copy/parse round trips.
// CI: 128 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use gridkit::clipboard::{
    parse_clipboard, parse_html, parse_plain_text, CopyableTable, MAX_CLIPBOARD_TEXT_BYTES,
    MAX_PASTE_CELLS,
};
use gridkit::{CellValue, Grid, GridData, GridError, GridSettings};
use proptest::prelude::*;

fn matrix(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| r.iter().map(|s| s.to_string()).collect())
        .collect()
}

fn table(rows: &[Vec<String>]) -> CopyableTable {
    CopyableTable {
        rows: rows.to_vec(),
        ..CopyableTable::default()
    }
}

// ---------------------------------------------------------------------------
// Payloads produced by other applications
// ---------------------------------------------------------------------------

#[test]
fn test_excel_style_html() {
    let html = r#"<html xmlns:o="urn:schemas-microsoft-com:office:office">
<body>
<!--StartFragment-->
<table border=0 cellpadding=0 cellspacing=0 width=128>
 <col width=64 span=2>
 <tr height=20>
  <td height=20 class=xl65 width=64>Name</td>
  <td class=xl65 width=64>Qty</td>
 </tr>
 <tr height=20>
  <td height=20>Bolt &amp; nut</td>
  <td align=right>12</td>
 </tr>
</table>
<!--EndFragment-->
</body>
</html>"#;
    assert_eq!(
        parse_html(html).unwrap(),
        Some(matrix(&[&["Name", "Qty"], &["Bolt & nut", "12"]]))
    );
}

#[test]
fn test_google_sheets_style_html() {
    let html = concat!(
        r#"<meta charset="utf-8"><google-sheets-html-origin>"#,
        r#"<table xmlns="http://www.w3.org/1999/xhtml" cellspacing="0" cellpadding="0" dir="ltr" border="1">"#,
        r#"<colgroup><col width="100"/><col width="100"/></colgroup><tbody>"#,
        r#"<tr style="height:21px;"><td style="overflow:hidden;">a<br/>b</td><td></td></tr>"#,
        r#"</tbody></table>"#,
    );
    assert_eq!(parse_html(html).unwrap(), Some(matrix(&[&["a\nb", ""]])));
}

#[test]
fn test_rowspan_and_colspan_in_body() {
    let html = "<table>\
        <tr><td rowspan=2>x</td><td colspan=2>y</td></tr>\
        <tr><td>1</td><td>2</td></tr>\
        </table>";
    assert_eq!(
        parse_html(html).unwrap(),
        Some(matrix(&[&["x", "y", "y"], &["x", "1", "2"]]))
    );
}

#[test]
fn test_rowspan_past_last_row_is_clipped() {
    let html = "<table><tr><td rowspan=3>x</td><td>y</td></tr></table>";
    assert_eq!(parse_html(html).unwrap(), Some(matrix(&[&["x", "y"]])));

    let html = "<table><tr><td rowspan=5>x</td></tr><tr><td>y</td></tr></table>";
    assert_eq!(parse_html(html).unwrap(), Some(matrix(&[&["x", ""], &["x", "y"]])));
}

#[test]
fn test_spans_beyond_cell_budget_fall_back_to_text() {
    let html = format!(
        "<table><tr>{}</tr></table>",
        "<td rowspan=1000 colspan=1000>x</td>".repeat(3)
    );
    assert!(matches!(
        parse_html(&html),
        Err(GridError::PasteTooLarge { limit: MAX_PASTE_CELLS })
    ));
    assert_eq!(parse_clipboard(Some(&html), Some("a\tb")), matrix(&[&["a", "b"]]));
}

#[test]
fn test_wide_row_over_many_rows_exceeds_cell_budget() {
    let html = format!(
        "<table><tr><td colspan=1000>wide</td></tr>{}</table>",
        "<tr><td>y</td></tr>".repeat(1000)
    );
    assert!(parse_html(&html).is_err());
    assert_eq!(parse_clipboard(Some(&html), None), Vec::<Vec<String>>::new());
}

#[test]
fn test_header_spans_leave_covered_slots_empty() {
    let html = "<table><thead><tr><th colspan=3>Group</th></tr></thead>\
        <tbody><tr><td>a</td><td>b</td><td>c</td></tr></tbody></table>";
    assert_eq!(
        parse_html(html).unwrap(),
        Some(matrix(&[&["Group", "", ""], &["a", "b", "c"]]))
    );
}

#[test]
fn test_only_first_table_is_read() {
    let html = "<table><tr><td>first</td></tr></table><table><tr><td>second</td></tr></table>";
    assert_eq!(parse_html(html).unwrap(), Some(matrix(&[&["first"]])));
}

#[test]
fn test_nested_table_is_skipped() {
    let html = "<table><tr><td>outer<table><tr><td>inner</td></tr></table></td><td>b</td></tr></table>";
    assert_eq!(parse_html(html).unwrap(), Some(matrix(&[&["outer", "b"]])));
}

#[test]
fn test_html_without_table_falls_back_to_text() {
    assert_eq!(parse_html("<p>hello</p>").unwrap(), None);
    assert_eq!(
        parse_clipboard(Some("<p>hello</p>"), Some("a\tb")),
        matrix(&[&["a", "b"]])
    );
    assert_eq!(parse_clipboard(Some("   "), Some("x")), matrix(&[&["x"]]));
    assert!(parse_clipboard(None, None).is_empty());
}

#[test]
fn test_oversized_payloads_are_ignored() {
    let big = "a".repeat(MAX_CLIPBOARD_TEXT_BYTES + 1);
    assert!(parse_clipboard(None, Some(&big)).is_empty());

    let big_html = format!("<table><tr><td>{big}</td></tr></table>");
    assert_eq!(parse_clipboard(Some(&big_html), Some("small")), matrix(&[&["small"]]));
}

#[test]
fn test_plain_text_cases() {
    let cases: &[(&str, &[&[&str]])] = &[
        ("a\tb", &[&["a", "b"]]),
        ("a\tb\n", &[&["a", "b"]]),
        ("a\tb\r\nc\td\r\n", &[&["a", "b"], &["c", "d"]]),
        ("a\t\tc", &[&["a", "", "c"]]),
        ("\"x\ty\"\tz", &[&["x\ty", "z"]]),
        ("\"\"\"quoted\"\"\"", &[&["\"quoted\""]]),
        ("12\" ruler", &[&["12\" ruler"]]),
        ("a\n\nb", &[&["a"], &[""], &["b"]]),
    ];
    for (input, expected) in cases {
        assert_eq!(parse_plain_text(input), matrix(expected), "input {input:?}");
    }
}

// ---------------------------------------------------------------------------
// Round trips
// ---------------------------------------------------------------------------

#[test]
fn test_grid_copy_parses_back() {
    let data = GridData::from_rows(vec![
        vec![CellValue::from("plain"), CellValue::from("with\ttab")],
        vec![CellValue::from("two\nlines"), CellValue::from("\"quoted\"")],
        vec![CellValue::from(3.5), CellValue::from(true)],
    ]);
    let mut grid = Grid::new(data, GridSettings::default());
    grid.select_all();
    let range = grid.last_range().unwrap();
    let payload = gridkit::clipboard::ClipboardSerializer::new().serialize(
        &grid.copy_source(),
        &range,
        gridkit::CopyMode::CellsOnly,
    );

    // plain text carries single-line values raw, so their tabs and quotes
    // are read back as delimiters; HTML keeps every value intact
    assert_eq!(
        parse_plain_text(&payload.plain_text),
        matrix(&[&["plain", "with", "tab"], &["two\nlines", "quoted"], &["3.5", "true"]])
    );
    let expected = matrix(&[
        &["plain", "with\ttab"],
        &["two\nlines", "\"quoted\""],
        &["3.5", "true"],
    ]);
    assert_eq!(parse_html(&payload.html).unwrap(), Some(expected));
}

fn config_128() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(128),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

/// Non-empty cell text, including characters that need escaping.
fn arb_cell() -> impl Strategy<Value = String> + Clone {
    prop_oneof![
        3 => r"[a-zA-Z0-9]{1,8}",
        1 => r#"[a-z<>&" \t\n]{1,6}"#,
    ]
}

/// Cell text that survives raw plain-text output: no tabs and no leading
/// quote outside of multi-line values.
fn arb_text_cell() -> impl Strategy<Value = String> + Clone {
    prop_oneof![
        3 => r"[a-zA-Z0-9]{1,8}",
        1 => r#"[a-z<>& \n][a-z<>&" \n]{0,5}"#,
        1 => r#"[a-z"]{0,3}\n[a-z" ]{0,3}"#,
    ]
}

fn arb_matrix<S>(cell: S) -> impl Strategy<Value = Vec<Vec<String>>>
where
    S: Strategy<Value = String> + Clone,
{
    (1usize..5, 1usize..5).prop_flat_map(move |(rows, cols)| {
        prop::collection::vec(prop::collection::vec(cell.clone(), cols), rows)
    })
}

fn arb_rows() -> impl Strategy<Value = Vec<Vec<String>>> {
    arb_matrix(arb_cell())
}

proptest! {
    #![proptest_config(config_128())]

    #[test]
    fn prop_plain_text_round_trip(rows in arb_matrix(arb_text_cell())) {
        let text = table(&rows).to_plain_text();
        prop_assert_eq!(parse_plain_text(&text), rows);
    }

    #[test]
    fn prop_html_round_trip(rows in arb_rows()) {
        let html = table(&rows).to_html();
        prop_assert_eq!(parse_html(&html).unwrap(), Some(rows));
    }

    #[test]
    fn prop_clipboard_prefers_html(rows in arb_rows()) {
        let payload = table(&rows).to_payload();
        prop_assert_eq!(parse_clipboard(Some(&payload.html), Some("ignored")), rows);
    }
}
