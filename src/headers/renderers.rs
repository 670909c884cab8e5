use std::fmt;

use super::HeaderContext;

/// Produces the displayed label for a header from its context and the
/// (already modified) source label.
pub type HeaderRenderer = Box<dyn Fn(&HeaderContext, &str) -> String>;

/// Ordered renderer chains, one per top-down header row.
///
/// Registering a renderer never removes earlier ones; the last one
/// registered for a row is the one that decides the label.
#[derive(Default)]
pub struct HeaderRenderersRegistry {
    rows: Vec<Vec<HeaderRenderer>>,
}

impl fmt::Debug for HeaderRenderersRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: Vec<usize> = self.rows.iter().map(Vec::len).collect();
        f.debug_struct("HeaderRenderersRegistry")
            .field("renderers_per_row", &counts)
            .finish()
    }
}

impl HeaderRenderersRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a renderer to the chain of header row `row_index` (top-down).
    pub fn register(&mut self, row_index: usize, renderer: HeaderRenderer) {
        if self.rows.len() <= row_index {
            self.rows.resize_with(row_index + 1, Vec::new);
        }
        if let Some(chain) = self.rows.get_mut(row_index) {
            chain.push(renderer);
        }
    }

    /// Add a new header row below the existing ones, rendered by `renderer`.
    pub fn push(&mut self, renderer: HeaderRenderer) {
        self.rows.push(vec![renderer]);
    }

    /// The authoritative renderer for a row: the last one registered.
    pub fn resolve(&self, row_index: usize) -> Option<&HeaderRenderer> {
        self.rows.get(row_index).and_then(|chain| chain.last())
    }

    /// Number of header rows implied by the registrations.
    pub fn levels(&self) -> usize {
        self.rows.len()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }
}
