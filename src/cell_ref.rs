//! Spreadsheet-style column labels ("A", "B", ..., "Z", "AA") and cell references.

/// Convert a 0-based column index into its spreadsheet label.
///
/// `0 -> "A"`, `25 -> "Z"`, `26 -> "AA"`, `701 -> "ZZ"`, `702 -> "AAA"`.
pub fn column_label(index: usize) -> String {
    let mut label = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        // rem < 26, always fits in a u8
        label.push(b'A' + u8::try_from(rem).unwrap_or(0));
        n = (n - 1) / 26;
    }
    label.reverse();
    String::from_utf8(label).unwrap_or_default()
}

/// Build a cell reference like `"B3"` from 0-based (row, col).
pub fn cell_ref(row: usize, col: usize) -> String {
    format!("{}{}", column_label(col), row + 1)
}
