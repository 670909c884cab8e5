//! Value types shared by the layout, selection and clipboard modules.

mod coords;
mod selection;

use serde::{Deserialize, Serialize};

pub use coords::{CellCoords, CellRange, RangeDirection};
pub use selection::{GridExtent, Highlight, HighlightType, Selection};

/// Horizontal layout direction of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutDirection {
    #[default]
    Ltr,
    Rtl,
}

impl LayoutDirection {
    pub fn is_rtl(self) -> bool {
        self == Self::Rtl
    }
}
