//! Column header labels: sources, nested (colspan) headers and the
//! per-level renderer registry.
//!
//! A header row is addressed two ways:
//! - [`HeaderLevel`]: 0 is the row nearest the data, outer rows are negative
//! - a top-down row index: 0 is the outermost row
//!
//! In cell coordinates the innermost header row is `-1`, so the row
//! coordinate of a level is `level - 1`.

mod nested;
mod renderers;

use std::fmt;

use crate::cell_ref::column_label;

pub use nested::{NestedHeader, NestedHeaders};
pub use renderers::{HeaderRenderer, HeaderRenderersRegistry};

/// A column header level; `0` is innermost, outer levels are negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HeaderLevel(pub i32);

impl HeaderLevel {
    pub const INNERMOST: HeaderLevel = HeaderLevel(0);

    /// Level of the top-down header row `index` in a stack of `levels` rows.
    pub fn from_row_index(index: usize, levels: usize) -> Option<Self> {
        if index >= levels {
            return None;
        }
        let offset = i32::try_from(levels - 1 - index).ok()?;
        Some(HeaderLevel(-offset))
    }

    /// Top-down row index of this level in a stack of `levels` rows.
    pub fn row_index(self, levels: usize) -> Option<usize> {
        let depth = usize::try_from(-i64::from(self.0)).ok()?;
        levels.checked_sub(1)?.checked_sub(depth)
    }

    /// Level addressed by a negative cell-coordinate row.
    pub fn from_coords_row(row: i32) -> Option<Self> {
        (row < 0).then_some(HeaderLevel(row + 1))
    }

    /// Cell-coordinate row of this level.
    pub fn coords_row(self) -> i32 {
        self.0 - 1
    }
}

/// A column addressed both ways.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    pub visual: usize,
    pub physical: usize,
}

/// Context handed to header value modifiers and renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderContext {
    /// Visual column the label was requested for
    pub column: usize,
    pub physical_column: usize,
    pub level: HeaderLevel,
    /// Total number of header rows
    pub levels: usize,
}

impl HeaderContext {
    /// Top-down row index of the header (0 = outermost).
    pub fn row_index(&self) -> usize {
        self.level.row_index(self.levels).unwrap_or(0)
    }
}

/// One resolved header cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub label: String,
    /// Visual column where the (possibly merged) header begins
    pub origin: usize,
    /// Number of visual columns the header covers
    pub colspan: usize,
}

impl HeaderCell {
    pub fn single(label: impl Into<String>, column: usize) -> Self {
        Self {
            label: label.into(),
            origin: column,
            colspan: 1,
        }
    }
}

/// Supplies raw header labels.
pub trait HeaderSource {
    /// Number of header rows this source defines.
    fn levels(&self) -> usize;

    /// Raw header cell covering `column` at `level`, or `None` if the source
    /// has nothing there.
    fn cell(&self, column: ColumnRef, level: HeaderLevel) -> Option<HeaderCell>;
}

/// "A", "B", ..., "AA" by physical column, repeated on every level.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpreadsheetHeaders;

impl HeaderSource for SpreadsheetHeaders {
    fn levels(&self) -> usize {
        1
    }

    fn cell(&self, column: ColumnRef, _level: HeaderLevel) -> Option<HeaderCell> {
        Some(HeaderCell::single(column_label(column.physical), column.visual))
    }
}

/// A fixed list of labels by physical column. Columns past the list fall
/// back to spreadsheet labels.
#[derive(Debug, Clone, Default)]
pub struct LabelHeaders {
    labels: Vec<String>,
}

impl LabelHeaders {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }
}

impl HeaderSource for LabelHeaders {
    fn levels(&self) -> usize {
        1
    }

    fn cell(&self, column: ColumnRef, _level: HeaderLevel) -> Option<HeaderCell> {
        let label = self
            .labels
            .get(column.physical)
            .cloned()
            .unwrap_or_else(|| column_label(column.physical));
        Some(HeaderCell::single(label, column.visual))
    }
}

/// Transform hook applied to every header label before rendering.
pub type HeaderModifier = Box<dyn Fn(&str, &HeaderContext) -> String>;

/// Column header configuration: on/off switch, label source, renderer
/// registry and value modifier.
pub struct ColumnHeaders {
    enabled: bool,
    source: Box<dyn HeaderSource>,
    renderers: HeaderRenderersRegistry,
    modifier: Option<HeaderModifier>,
}

impl fmt::Debug for ColumnHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnHeaders")
            .field("enabled", &self.enabled)
            .field("levels", &self.levels())
            .field("renderers", &self.renderers)
            .field("modifier", &self.modifier.is_some())
            .finish()
    }
}

impl Default for ColumnHeaders {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ColumnHeaders {
    /// Spreadsheet-labelled headers.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            source: Box::new(SpreadsheetHeaders),
            renderers: HeaderRenderersRegistry::new(),
            modifier: None,
        }
    }

    pub fn with_source(enabled: bool, source: impl HeaderSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            ..Self::new(enabled)
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_source(&mut self, source: impl HeaderSource + 'static) {
        self.source = Box::new(source);
    }

    pub fn set_modifier(&mut self, modifier: Option<HeaderModifier>) {
        self.modifier = modifier;
    }

    pub fn renderers(&self) -> &HeaderRenderersRegistry {
        &self.renderers
    }

    pub fn renderers_mut(&mut self) -> &mut HeaderRenderersRegistry {
        &mut self.renderers
    }

    /// Number of header rows shown; 0 when headers are disabled.
    pub fn levels(&self) -> usize {
        if !self.enabled {
            return 0;
        }
        self.source.levels().max(self.renderers.levels())
    }

    /// Fully resolved header cell: source label, then the modifier, then the
    /// last renderer registered for the row.
    pub fn cell(&self, column: ColumnRef, level: HeaderLevel) -> Option<HeaderCell> {
        let levels = self.levels();
        let row_index = level.row_index(levels)?;
        let mut cell = self
            .source
            .cell(column, level)
            .unwrap_or_else(|| HeaderCell::single(String::new(), column.visual));

        let ctx = HeaderContext {
            column: column.visual,
            physical_column: column.physical,
            level,
            levels,
        };
        if let Some(modifier) = &self.modifier {
            cell.label = modifier(&cell.label, &ctx);
        }
        if let Some(renderer) = self.renderers.resolve(row_index) {
            cell.label = renderer(&ctx, &cell.label);
        }
        Some(cell)
    }

    /// Resolved label only.
    pub fn label(&self, column: ColumnRef, level: HeaderLevel) -> Option<String> {
        self.cell(column, level).map(|cell| cell.label)
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

    fn col(index: usize) -> ColumnRef {
        ColumnRef {
            visual: index,
            physical: index,
        }
    }

    #[test]
    fn test_level_conversions() {
        assert_eq!(HeaderLevel::from_row_index(2, 3), Some(HeaderLevel(0)));
        assert_eq!(HeaderLevel::from_row_index(0, 3), Some(HeaderLevel(-2)));
        assert_eq!(HeaderLevel::from_row_index(3, 3), None);
        assert_eq!(HeaderLevel(-1).row_index(3), Some(1));
        assert_eq!(HeaderLevel(-3).row_index(3), None);
        assert_eq!(HeaderLevel::from_coords_row(-1), Some(HeaderLevel(0)));
        assert_eq!(HeaderLevel::from_coords_row(0), None);
        assert_eq!(HeaderLevel(-2).coords_row(), -3);
    }

    #[test]
    fn test_disabled_headers_have_no_levels() {
        let headers = ColumnHeaders::new(false);
        assert_eq!(headers.levels(), 0);
        assert_eq!(headers.label(col(0), HeaderLevel::INNERMOST), None);
    }

    #[test]
    fn test_modifier_sees_top_down_row() {
        let mut headers = ColumnHeaders::new(true);
        headers.renderers_mut().push(Box::new(|_: &HeaderContext, label: &str| label.to_string()));
        headers.renderers_mut().push(Box::new(|_: &HeaderContext, label: &str| label.to_string()));
        headers.set_modifier(Some(Box::new(|value: &str, ctx: &HeaderContext| {
            format!("{value}-{}-{}", ctx.column, ctx.row_index())
        })));
        assert_eq!(headers.levels(), 2);
        assert_eq!(headers.label(col(1), HeaderLevel(0)).unwrap(), "B-1-1");
        assert_eq!(headers.label(col(1), HeaderLevel(-1)).unwrap(), "B-1-0");
    }

    #[test]
    fn test_last_renderer_wins() {
        let mut headers = ColumnHeaders::new(true);
        headers
            .renderers_mut()
            .register(0, Box::new(|_: &HeaderContext, label: &str| format!("first {label}")));
        headers
            .renderers_mut()
            .register(0, Box::new(|_: &HeaderContext, label: &str| format!("second {label}")));
        assert_eq!(headers.levels(), 1);
        assert_eq!(headers.label(col(2), HeaderLevel(0)).unwrap(), "second C");
    }

    #[test]
    fn test_label_headers_fall_back_to_letters() {
        let headers = ColumnHeaders::with_source(
            true,
            LabelHeaders::new(vec!["Name".to_string(), "Age".to_string()]),
        );
        assert_eq!(headers.label(col(1), HeaderLevel(0)).unwrap(), "Age");
        assert_eq!(headers.label(col(2), HeaderLevel(0)).unwrap(), "C");
    }
}
