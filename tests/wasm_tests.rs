//! Browser-side tests for the JavaScript surface.
//!
//! Run with `wasm-pack test --headless --firefox`.

#![cfg(target_arch = "wasm32")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use gridkit::GridHandle;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn handle() -> GridHandle {
    let data = serde_wasm_bindgen::to_value(&vec![vec!["A1", "B1"], vec!["A2", "B2"]]).unwrap();
    GridHandle::new(data, JsValue::UNDEFINED).unwrap()
}

#[wasm_bindgen_test]
fn test_handle_counts() {
    let grid = handle();
    assert_eq!(grid.count_rows(), 2);
    assert_eq!(grid.count_cols(), 2);
    assert_eq!(grid.value_at(1, 1).unwrap().as_string().as_deref(), Some("B2"));
    assert!(grid.value_at(5, 5).unwrap().is_undefined());
}

#[wasm_bindgen_test]
fn test_trimmed_rows_leave_visual_count() {
    let mut grid = handle();
    grid.trim_rows(vec![0]);
    assert_eq!(grid.count_rows(), 1);
    assert_eq!(grid.value_at(0, 0).unwrap().as_string().as_deref(), Some("A2"));
    grid.trim_rows(vec![]);
    assert_eq!(grid.count_rows(), 2);
}

#[wasm_bindgen_test]
fn test_invalid_settings_are_rejected() {
    let data = serde_wasm_bindgen::to_value(&vec![vec!["A1"]]).unwrap();
    let settings = js_sys::JSON::parse(r#"{"defaultRowHeight": -1}"#).unwrap();
    assert!(GridHandle::new(data, settings).is_err());
}

#[wasm_bindgen_test]
fn test_parse_clipboard_export() {
    let rows = gridkit::parse_clipboard_to_js(None, Some("a\tb".to_string())).unwrap();
    let rows: Vec<Vec<String>> = serde_wasm_bindgen::from_value(rows).unwrap();
    assert_eq!(rows, vec![vec!["a".to_string(), "b".to_string()]]);
}
