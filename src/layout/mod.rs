//! Layout engine: viewport calculation and render planning.
//!
//! This module handles:
//! - Computing the visible item range of an axis from item sizes
//! - Pre-computing item positions for hit testing
//! - Managing viewport state (scroll position, fixed items, direction)
//! - Column stretching
//! - Diffing rendered orders between frames

mod axis;
mod calculator;
mod order_view;
mod stretch;
mod viewport;

pub use axis::AxisLayout;
pub use calculator::{CalculationType, RenderOffset, ViewportCalculator, ViewportRange};
pub use order_view::{OrderView, ViewCommand};
pub use stretch::{stretch_widths, ColumnStretch};
pub use viewport::{Viewport, ViewportArea, ViewportOptions};

/// Default row height in pixels
pub const DEFAULT_ROW_HEIGHT: f32 = 23.0;

/// Default column width in pixels
pub const DEFAULT_COLUMN_WIDTH: f32 = 50.0;
