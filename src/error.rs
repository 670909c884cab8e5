//! Structured error types for gridkit.
//!
//! Only configuration, index-map mutation and HTML paste parsing return
//! errors. Viewport, selection and copy code paths run on every render tick
//! and report missing coordinates with `None` instead.

/// All errors that can occur while configuring or mutating a grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Markup error from quick-xml while reading pasted HTML.
    #[error("HTML parsing: {0}")]
    Html(#[from] quick_xml::Error),

    /// Settings or data JSON could not be decoded.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Settings decoded but contain unusable values.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// No index map registered under the given name.
    #[error("Unknown index map: {0}")]
    UnknownIndexMap(String),

    /// An index sequence is not a permutation of the physical indexes.
    #[error("Invalid index sequence: {0}")]
    InvalidSequence(String),

    /// Pasted HTML table expands past the cell budget.
    #[error("Pasted table exceeds {limit} cells")]
    PasteTooLarge { limit: usize },

    /// Index outside of the current extent.
    #[error("Index out of range: {0}")]
    OutOfRange(String),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<String> for GridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for GridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
