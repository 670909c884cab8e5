//! Copy, cut and paste through the clipboard controller
//!
//! Expected payloads are byte-exact: the plain-text and HTML formats are
//! what spreadsheet applications read back.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::RefCell;
use std::rc::Rc;

use gridkit::clipboard::{
    ClipboardData, ClipboardPayload, CopyMode, CopyPaste, MemoryClipboard, HTML_PREAMBLE, MIME_HTML,
    MIME_PLAIN,
};
use gridkit::headers::HeaderContext;
use gridkit::{CellCoords, CellRange, CellValue, Grid, GridData, GridSettings, IndexMapType};
use test_case::test_case;

// =============================================================================
// HELPERS
// =============================================================================

fn settings(col_headers: bool, row_headers: bool) -> GridSettings {
    GridSettings {
        col_headers,
        row_headers,
        ..GridSettings::default()
    }
}

fn spreadsheet(rows: usize, cols: usize, settings: GridSettings) -> Grid {
    Grid::new(GridData::spreadsheet(rows, cols), settings)
}

/// `levels` header rows whose labels read `{label}-{visual column}-{row}`.
fn install_level_headers(grid: &mut Grid, levels: usize) {
    let headers = grid.headers_mut();
    headers.renderers_mut().clear();
    for _ in 0..levels {
        headers
            .renderers_mut()
            .push(Box::new(|_: &HeaderContext, label: &str| label.to_string()));
    }
    headers.set_modifier(Some(Box::new(|value: &str, ctx: &HeaderContext| {
        format!("{value}-{}-{}", ctx.column, ctx.row_index())
    })));
}

fn html(table: &str) -> String {
    format!("{HTML_PREAMBLE}{table}")
}

fn copy(grid: &Grid, mode: CopyMode) -> ClipboardPayload {
    let mut copy_paste = CopyPaste::default();
    match mode {
        CopyMode::CellsOnly => copy_paste.copy_cells_only(),
        CopyMode::ColumnHeadersOnly => copy_paste.copy_column_headers_only(),
        CopyMode::WithColumnHeaders => copy_paste.copy_with_column_headers(),
        CopyMode::WithAllColumnHeaders => copy_paste.copy_with_all_column_headers(),
    }
    let mut clipboard = MemoryClipboard::new();
    let payload = copy_paste
        .on_copy(grid, &mut clipboard)
        .expect("copy should produce a payload");
    assert_eq!(clipboard.get_data(MIME_PLAIN).as_deref(), Some(payload.plain_text.as_str()));
    assert_eq!(clipboard.get_data(MIME_HTML).as_deref(), Some(payload.html.as_str()));
    payload
}

fn hide_all(grid: &mut Grid, rows: bool) {
    let mapper = if rows { grid.rows_mut() } else { grid.columns_mut() };
    mapper.register_index_map("map", IndexMapType::Hiding, |_| true);
}

fn trim_all(grid: &mut Grid, rows: bool) {
    let mapper = if rows { grid.rows_mut() } else { grid.columns_mut() };
    mapper.register_index_map("map", IndexMapType::Trimming, |_| true);
}

// =============================================================================
// COPY WITH ALL COLUMN HEADERS
// =============================================================================

#[test]
fn test_all_headers_single_cell() {
    let mut grid = spreadsheet(5, 5, settings(true, true));
    install_level_headers(&mut grid, 3);
    grid.select_cell(1, 0);

    let payload = copy(&grid, CopyMode::WithAllColumnHeaders);

    assert_eq!(payload.plain_text, "A-0-0\nA-0-1\nA-0-2\nA2");
    assert_eq!(
        payload.html,
        html(
            "<table><thead>\
             <tr><th>A-0-0</th></tr><tr><th>A-0-1</th></tr><tr><th>A-0-2</th></tr>\
             </thead><tbody><tr><td>A2</td></tr></tbody></table>"
        )
    );
}

#[test]
fn test_all_headers_select_all() {
    let mut grid = spreadsheet(2, 3, settings(true, true));
    install_level_headers(&mut grid, 3);
    grid.select_all();

    let payload = copy(&grid, CopyMode::WithAllColumnHeaders);

    assert_eq!(
        payload.plain_text,
        [
            "A-0-0\tB-1-0\tC-2-0",
            "A-0-1\tB-1-1\tC-2-1",
            "A-0-2\tB-1-2\tC-2-2",
            "A1\tB1\tC1",
            "A2\tB2\tC2",
        ]
        .join("\n")
    );
    assert_eq!(
        payload.html,
        html(
            "<table><thead>\
             <tr><th>A-0-0</th><th>B-1-0</th><th>C-2-0</th></tr>\
             <tr><th>A-0-1</th><th>B-1-1</th><th>C-2-1</th></tr>\
             <tr><th>A-0-2</th><th>B-1-2</th><th>C-2-2</th></tr>\
             </thead><tbody>\
             <tr><td>A1</td><td>B1</td><td>C1</td></tr>\
             <tr><td>A2</td><td>B2</td><td>C2</td></tr>\
             </tbody></table>"
        )
    );
}

#[test_case(true ; "all rows hidden")]
#[test_case(false ; "all columns hidden")]
fn test_all_headers_hidden_content_is_kept(rows: bool) {
    let mut grid = spreadsheet(5, 5, settings(true, true));
    install_level_headers(&mut grid, 2);
    grid.select_range(CellCoords::new(1, 1), CellCoords::new(2, 3));
    hide_all(&mut grid, rows);

    let payload = copy(&grid, CopyMode::WithAllColumnHeaders);

    assert_eq!(
        payload.plain_text,
        "B-1-0\tC-2-0\tD-3-0\nB-1-1\tC-2-1\tD-3-1\nB2\tC2\tD2\nB3\tC3\tD3"
    );
    assert_eq!(
        payload.html,
        html(
            "<table><thead>\
             <tr><th>B-1-0</th><th>C-2-0</th><th>D-3-0</th></tr>\
             <tr><th>B-1-1</th><th>C-2-1</th><th>D-3-1</th></tr>\
             </thead><tbody>\
             <tr><td>B2</td><td>C2</td><td>D2</td></tr>\
             <tr><td>B3</td><td>C3</td><td>D3</td></tr>\
             </tbody></table>"
        )
    );
}

#[test_case(true ; "all rows hidden")]
#[test_case(false ; "all columns hidden")]
fn test_all_headers_hidden_without_col_headers(rows: bool) {
    let mut grid = spreadsheet(5, 5, settings(false, true));
    grid.select_range(CellCoords::new(1, 1), CellCoords::new(2, 3));
    hide_all(&mut grid, rows);

    let payload = copy(&grid, CopyMode::WithAllColumnHeaders);

    assert_eq!(payload.plain_text, "B2\tC2\tD2\nB3\tC3\tD3");
    assert_eq!(
        payload.html,
        html(
            "<table><tbody>\
             <tr><td>B2</td><td>C2</td><td>D2</td></tr>\
             <tr><td>B3</td><td>C3</td><td>D3</td></tr>\
             </tbody></table>"
        )
    );
}

#[test]
fn test_all_headers_all_rows_trimmed() {
    let mut grid = spreadsheet(5, 5, settings(true, true));
    install_level_headers(&mut grid, 2);
    grid.select_all();
    trim_all(&mut grid, true);

    let payload = copy(&grid, CopyMode::WithAllColumnHeaders);

    assert_eq!(
        payload.plain_text,
        "A-0-0\tB-1-0\tC-2-0\tD-3-0\tE-4-0\nA-0-1\tB-1-1\tC-2-1\tD-3-1\tE-4-1"
    );
    assert_eq!(
        payload.html,
        html(
            "<table><thead>\
             <tr><th>A-0-0</th><th>B-1-0</th><th>C-2-0</th><th>D-3-0</th><th>E-4-0</th></tr>\
             <tr><th>A-0-1</th><th>B-1-1</th><th>C-2-1</th><th>D-3-1</th><th>E-4-1</th></tr>\
             </thead></table>"
        )
    );
}

#[test_case(true, false ; "rows trimmed without col headers")]
#[test_case(false, true ; "columns trimmed")]
#[test_case(false, false ; "columns trimmed without col headers")]
fn test_all_headers_trimmed_is_empty(rows: bool, col_headers: bool) {
    let mut grid = spreadsheet(5, 5, settings(col_headers, true));
    if col_headers {
        install_level_headers(&mut grid, 2);
    }
    grid.select_all();
    trim_all(&mut grid, rows);

    let payload = copy(&grid, CopyMode::WithAllColumnHeaders);

    assert_eq!(payload.plain_text, "");
    assert_eq!(payload.html, html("<table></table>"));
    assert_eq!(payload, ClipboardPayload::empty());
}

#[test]
fn test_all_headers_nested() {
    let settings = GridSettings::from_json(
        r#"{
            "rowHeaders": true,
            "nestedHeaders": [
                ["A", {"label": "B", "colspan": 8}, "C"],
                ["D", {"label": "E", "colspan": 4}, {"label": "F", "colspan": 4}, "G"],
                ["H", {"label": "I", "colspan": 2}, {"label": "J", "colspan": 2},
                      {"label": "K", "colspan": 2}, {"label": "L", "colspan": 2}, "M"],
                ["N", "O", "P", "Q", "R", "S", "T", "U", "V", "W"]
            ]
        }"#,
    )
    .unwrap();
    let mut grid = spreadsheet(2, 10, settings);
    grid.select_all();

    let payload = copy(&grid, CopyMode::WithAllColumnHeaders);

    assert_eq!(
        payload.plain_text,
        [
            "A\tB\t\t\t\t\t\t\t\tC",
            "D\tE\t\t\t\tF\t\t\t\tG",
            "H\tI\t\tJ\t\tK\t\tL\t\tM",
            "N\tO\tP\tQ\tR\tS\tT\tU\tV\tW",
            "A1\tB1\tC1\tD1\tE1\tF1\tG1\tH1\tI1\tJ1",
            "A2\tB2\tC2\tD2\tE2\tF2\tG2\tH2\tI2\tJ2",
        ]
        .join("\n")
    );
    for line in payload.plain_text.lines() {
        assert_eq!(line.split('\t').count(), 10);
    }
    assert_eq!(
        payload.html,
        html(
            "<table><thead>\
             <tr><th>A</th><th colspan=8>B</th><th>C</th></tr>\
             <tr><th>D</th><th colspan=4>E</th><th colspan=4>F</th><th>G</th></tr>\
             <tr><th>H</th><th colspan=2>I</th><th colspan=2>J</th><th colspan=2>K</th><th colspan=2>L</th><th>M</th></tr>\
             <tr><th>N</th><th>O</th><th>P</th><th>Q</th><th>R</th><th>S</th><th>T</th><th>U</th><th>V</th><th>W</th></tr>\
             </thead><tbody>\
             <tr><td>A1</td><td>B1</td><td>C1</td><td>D1</td><td>E1</td><td>F1</td><td>G1</td><td>H1</td><td>I1</td><td>J1</td></tr>\
             <tr><td>A2</td><td>B2</td><td>C2</td><td>D2</td><td>E2</td><td>F2</td><td>G2</td><td>H2</td><td>I2</td><td>J2</td></tr>\
             </tbody></table>"
        )
    );
}

// =============================================================================
// COPY COLUMN HEADERS ONLY
// =============================================================================

#[test]
fn test_headers_only_single_cell() {
    let mut grid = spreadsheet(5, 5, settings(true, true));
    install_level_headers(&mut grid, 2);
    grid.select_cell(1, 1);

    let payload = copy(&grid, CopyMode::ColumnHeadersOnly);

    assert_eq!(payload.plain_text, "B-1-1");
    assert_eq!(
        payload.html,
        html("<table><thead><tr><th>B-1-1</th></tr></thead></table>")
    );
}

#[test]
fn test_headers_only_select_all() {
    let mut grid = spreadsheet(4, 4, settings(true, true));
    install_level_headers(&mut grid, 2);
    grid.select_all();

    let payload = copy(&grid, CopyMode::ColumnHeadersOnly);

    assert_eq!(payload.plain_text, "A-0-1\tB-1-1\tC-2-1\tD-3-1");
    assert_eq!(
        payload.html,
        html("<table><thead><tr><th>A-0-1</th><th>B-1-1</th><th>C-2-1</th><th>D-3-1</th></tr></thead></table>")
    );
}

#[test_case(true ; "all rows hidden")]
#[test_case(false ; "all columns hidden")]
fn test_headers_only_hidden(rows: bool) {
    let mut grid = spreadsheet(5, 5, settings(true, true));
    grid.select_range(CellCoords::new(1, 1), CellCoords::new(2, 3));
    hide_all(&mut grid, rows);

    let payload = copy(&grid, CopyMode::ColumnHeadersOnly);

    assert_eq!(payload.plain_text, "B\tC\tD");
    assert_eq!(
        payload.html,
        html("<table><thead><tr><th>B</th><th>C</th><th>D</th></tr></thead></table>")
    );
}

#[test]
fn test_headers_only_all_rows_trimmed() {
    let mut grid = spreadsheet(5, 5, settings(true, true));
    grid.select_all();
    trim_all(&mut grid, true);

    let payload = copy(&grid, CopyMode::ColumnHeadersOnly);

    assert_eq!(payload.plain_text, "A\tB\tC\tD\tE");
    assert_eq!(
        payload.html,
        html("<table><thead><tr><th>A</th><th>B</th><th>C</th><th>D</th><th>E</th></tr></thead></table>")
    );
}

#[test_case(Some(true) ; "all rows hidden")]
#[test_case(Some(false) ; "all columns hidden")]
#[test_case(None ; "nothing hidden")]
fn test_headers_only_without_col_headers_is_empty(hidden_rows: Option<bool>) {
    let mut grid = spreadsheet(5, 5, settings(false, true));
    grid.select_range(CellCoords::new(1, 1), CellCoords::new(2, 3));
    if let Some(rows) = hidden_rows {
        hide_all(&mut grid, rows);
    }

    let payload = copy(&grid, CopyMode::ColumnHeadersOnly);

    assert_eq!(payload, ClipboardPayload::empty());
}

#[test_case(true, false ; "rows trimmed without col headers")]
#[test_case(false, true ; "columns trimmed")]
#[test_case(false, false ; "columns trimmed without col headers")]
fn test_headers_only_trimmed_is_empty(rows: bool, col_headers: bool) {
    let mut grid = spreadsheet(5, 5, settings(col_headers, true));
    grid.select_all();
    trim_all(&mut grid, rows);

    let payload = copy(&grid, CopyMode::ColumnHeadersOnly);

    assert_eq!(payload, ClipboardPayload::empty());
}

// =============================================================================
// COPY CELLS
// =============================================================================

#[test]
fn test_select_all_copy_shape() {
    let mut grid = spreadsheet(7, 4, settings(true, true));
    grid.select_all();

    let payload = copy(&grid, CopyMode::CellsOnly);

    let lines: Vec<&str> = payload.plain_text.split('\n').collect();
    assert_eq!(lines.len(), 7);
    assert!(lines.iter().all(|line| line.split('\t').count() == 4));
}

#[test]
fn test_copy_with_column_headers_uses_innermost_level() {
    let mut grid = spreadsheet(3, 3, settings(true, false));
    install_level_headers(&mut grid, 2);
    grid.select_range(CellCoords::new(0, 1), CellCoords::new(1, 2));

    let payload = copy(&grid, CopyMode::WithColumnHeaders);

    assert_eq!(payload.plain_text, "B-1-1\tC-2-1\nB1\tC1\nB2\tC2");
}

#[test]
fn test_copy_escapes_special_values() {
    let data = GridData::from_rows(vec![vec![
        CellValue::from("tab\there"),
        CellValue::from("<b>&</b>"),
        CellValue::from("line\nbreak"),
    ]]);
    let mut grid = Grid::new(data, GridSettings::default());
    grid.select_range(CellCoords::new(0, 0), CellCoords::new(0, 2));

    let payload = copy(&grid, CopyMode::CellsOnly);

    assert_eq!(payload.plain_text, "tab\there\t<b>&</b>\t\"line\nbreak\"");
    assert_eq!(
        payload.html,
        html("<table><tbody><tr><td>tab&#9;here</td><td>&lt;b&gt;&amp;&lt;/b&gt;</td><td>line<br>break</td></tr></tbody></table>")
    );
}

#[test]
fn test_copy_uses_last_range() {
    let mut grid = spreadsheet(3, 3, settings(true, false));
    grid.select_cell(0, 0);
    grid.selection_mut()
        .add_range(CellRange::single(CellCoords::new(2, 2)));

    assert_eq!(copy(&grid, CopyMode::CellsOnly).plain_text, "C3");
}

#[test]
fn test_copy_without_selection() {
    let grid = spreadsheet(3, 3, settings(true, false));
    let mut clipboard = MemoryClipboard::new();
    assert!(CopyPaste::default().on_copy(&grid, &mut clipboard).is_none());
    assert_eq!(clipboard.get_data(MIME_PLAIN), None);
}

// =============================================================================
// CUT
// =============================================================================

#[test]
fn test_cut_empties_cells() {
    let mut grid = spreadsheet(2, 2, GridSettings::default());
    grid.select_cell(1, 0);
    let mut clipboard = MemoryClipboard::new();

    let payload = CopyPaste::default().on_cut(&mut grid, &mut clipboard).unwrap();

    assert_eq!(payload.plain_text, "A2");
    assert_eq!(
        payload.html,
        html("<table><tbody><tr><td>A2</td></tr></tbody></table>")
    );
    assert_eq!(grid.value_at(1, 0), Some(CellValue::Empty));
    assert_eq!(grid.value_at(0, 0), Some(CellValue::from("A1")));
}

#[test]
fn test_cut_hooks_receive_cut_data() {
    let mut grid = spreadsheet(2, 2, GridSettings::default());
    grid.select_cell(0, 0);
    let seen: Rc<RefCell<Vec<Vec<Vec<String>>>>> = Rc::default();

    let mut copy_paste = CopyPaste::default();
    let before = Rc::clone(&seen);
    copy_paste.hooks.before_cut = Some(Box::new(move |data: &[Vec<String>]| {
        before.borrow_mut().push(data.to_vec());
        true
    }));
    let after = Rc::clone(&seen);
    copy_paste.hooks.after_cut = Some(Box::new(move |data: &[Vec<String>]| {
        after.borrow_mut().push(data.to_vec());
    }));

    let mut clipboard = MemoryClipboard::new();
    let payload = copy_paste.on_cut(&mut grid, &mut clipboard).unwrap();

    let expected = vec![vec!["A1".to_string()]];
    assert_eq!(*seen.borrow(), vec![expected.clone(), expected]);
    assert_eq!(
        payload.html,
        html("<table><tbody><tr><td>A1</td></tr></tbody></table>")
    );
}

#[test]
fn test_cancelled_cut_keeps_cells() {
    let mut grid = spreadsheet(2, 2, GridSettings::default());
    grid.select_cell(0, 0);
    let mut copy_paste = CopyPaste::default();
    copy_paste.hooks.before_cut = Some(Box::new(|_: &[Vec<String>]| false));

    let mut clipboard = MemoryClipboard::new();
    assert!(copy_paste.on_cut(&mut grid, &mut clipboard).is_none());
    assert_eq!(grid.value_at(0, 0), Some(CellValue::from("A1")));
}

#[test]
fn test_cut_ignores_armed_header_mode() {
    let mut grid = spreadsheet(2, 2, GridSettings::default());
    grid.select_cell(0, 1);
    let mut copy_paste = CopyPaste::default();
    copy_paste.copy_with_all_column_headers();

    let mut clipboard = MemoryClipboard::new();
    let payload = copy_paste.on_cut(&mut grid, &mut clipboard).unwrap();
    assert_eq!(payload.plain_text, "B1");
    assert_eq!(copy_paste.pending_mode(), CopyMode::CellsOnly);
}

// =============================================================================
// PASTE
// =============================================================================

#[test]
fn test_paste_prefers_html() {
    let mut grid = Grid::new(GridData::new(3, 3), GridSettings::default());
    grid.select_cell(0, 0);
    let clipboard = MemoryClipboard::with_payload(
        "ignored",
        Some("<table><tr><td>a</td><td>b</td></tr><tr><td>c</td><td>d</td></tr></table>"),
    );

    let pasted = CopyPaste::default().on_paste(&mut grid, &clipboard).unwrap();

    assert_eq!(pasted, CellRange::between(CellCoords::new(0, 0), CellCoords::new(1, 1)));
    assert_eq!(grid.value_at(1, 1), Some(CellValue::from("d")));
    assert_eq!(grid.selection().last_range(), Some(&pasted));
}

#[test]
fn test_copy_then_paste_elsewhere() {
    let mut grid = spreadsheet(4, 4, GridSettings::default());
    grid.select_range(CellCoords::new(0, 0), CellCoords::new(1, 1));
    let mut copy_paste = CopyPaste::default();
    let mut clipboard = MemoryClipboard::new();
    copy_paste.on_copy(&grid, &mut clipboard).unwrap();

    grid.select_cell(2, 2);
    copy_paste.on_paste(&mut grid, &clipboard).unwrap();

    assert_eq!(grid.value_at(2, 2), Some(CellValue::from("A1")));
    assert_eq!(grid.value_at(3, 3), Some(CellValue::from("B2")));
}

#[test]
fn test_paste_skips_hidden_when_configured() {
    let settings = GridSettings::from_json(r#"{"copyPaste": {"skipHidden": true}}"#).unwrap();
    let mut grid = Grid::new(GridData::new(3, 3), settings.clone());
    grid.columns_mut()
        .register_index_map("hide", IndexMapType::Hiding, |c| c == 1);
    grid.select_cell(0, 0);
    let clipboard = MemoryClipboard::with_payload("x\ty", None);

    let pasted = CopyPaste::new(&settings.copy_paste)
        .on_paste(&mut grid, &clipboard)
        .unwrap();

    assert_eq!(grid.value_at(0, 0), Some(CellValue::from("x")));
    assert_eq!(grid.value_at(0, 1), Some(CellValue::Empty));
    assert_eq!(grid.value_at(0, 2), Some(CellValue::from("y")));
    assert_eq!(pasted.bottom_right(), CellCoords::new(0, 2));
}

#[test]
fn test_paste_after_hook_and_cancel() {
    let mut grid = Grid::new(GridData::new(2, 2), GridSettings::default());
    grid.select_cell(0, 0);
    let clipboard = MemoryClipboard::with_payload("v", None);

    let mut copy_paste = CopyPaste::default();
    copy_paste.hooks.before_paste = Some(Box::new(|data: &[Vec<String>]| data[0][0] != "v"));
    assert!(copy_paste.on_paste(&mut grid, &clipboard).is_none());
    assert_eq!(grid.value_at(0, 0), Some(CellValue::Empty));

    let areas: Rc<RefCell<Vec<CellRange>>> = Rc::default();
    let sink = Rc::clone(&areas);
    copy_paste.hooks.before_paste = None;
    copy_paste.hooks.after_paste = Some(Box::new(move |_: &[Vec<String>], range: &CellRange| {
        sink.borrow_mut().push(*range);
    }));
    copy_paste.on_paste(&mut grid, &clipboard).unwrap();
    assert_eq!(*areas.borrow(), vec![CellRange::single(CellCoords::new(0, 0))]);
}

#[test]
fn test_paste_from_header_selection_starts_at_first_row() {
    let mut grid = Grid::new(GridData::new(3, 2), GridSettings::default());
    grid.select_range(CellCoords::new(-1, 1), CellCoords::new(2, 1));
    let clipboard = MemoryClipboard::with_payload("p", None);

    let pasted = CopyPaste::default().on_paste(&mut grid, &clipboard).unwrap();

    assert_eq!(pasted, CellRange::between(CellCoords::new(0, 1), CellCoords::new(2, 1)));
    assert_eq!(grid.value_at(2, 1), Some(CellValue::from("p")));
}

#[test]
fn test_paste_empty_clipboard() {
    let mut grid = Grid::new(GridData::new(2, 2), GridSettings::default());
    grid.select_cell(0, 0);
    assert!(CopyPaste::default()
        .on_paste(&mut grid, &MemoryClipboard::new())
        .is_none());
}
