//! Viewport range calculation along one axis.
//!
//! The calculator walks item sizes from the start of the axis, accumulating
//! until the end of the viewport window is reached. It is a pure function of
//! its inputs: calling it twice with the same inputs yields the same range.

use std::ops::RangeInclusive;

/// Number of extra items to render outside the visible window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderOffset {
    /// Grows towards the end of the axis; 10 items when fixed items exist.
    #[default]
    Auto,
    Items(usize),
}

impl RenderOffset {
    /// `None` maps to [`RenderOffset::Auto`].
    pub fn from_setting(setting: Option<usize>) -> Self {
        setting.map_or(RenderOffset::Auto, RenderOffset::Items)
    }
}

/// Which items a calculation should report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalculationType {
    /// Partially visible items plus the render offset
    #[default]
    Rendered,
    /// Only items entirely inside the viewport
    FullyVisible,
    /// Every item at least partially inside the viewport
    PartiallyVisible,
}

/// Items overscanned on each side in auto mode when the axis has fixed items.
const AUTO_OFFSET_WITH_FIXED: usize = 10;

/// Scale factor for the auto render offset.
const AUTO_OFFSET_SCALE: f64 = 12.0;

/// Contiguous, inclusive range of items produced by a calculation.
///
/// Always holds at least one item; a calculation that finds nothing yields
/// `None` instead of an empty range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportRange {
    pub start: usize,
    pub end: usize,
    /// Axis position of the `start` item's leading edge
    pub start_position: f32,
    /// First visible item is cut by the leading viewport edge
    pub start_clipped: bool,
    /// Last visible item is cut by the trailing viewport edge
    pub end_clipped: bool,
}

impl ViewportRange {
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Always `false`; `start <= end` holds for every constructed range.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start..=self.end).contains(&index)
    }

    pub fn indexes(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }
}

#[derive(Debug, Default)]
struct Scan {
    partial: Option<(usize, usize)>,
    partial_start_position: f32,
    partial_end_edge: f32,
    full: Option<(usize, usize)>,
    full_start_position: f32,
    /// Accumulated size when the scan stopped
    reached: f32,
    filled: bool,
}

/// Computes the visible range of one axis.
pub struct ViewportCalculator<F>
where
    F: Fn(usize) -> f32,
{
    total: usize,
    scroll_offset: f32,
    viewport_size: f32,
    size_of: F,
    render_all: bool,
    overscan: RenderOffset,
    calculation_type: CalculationType,
    has_fixed_items: bool,
}

impl<F> ViewportCalculator<F>
where
    F: Fn(usize) -> f32,
{
    pub fn new(total: usize, scroll_offset: f32, viewport_size: f32, size_of: F) -> Self {
        Self {
            total,
            scroll_offset,
            viewport_size,
            size_of,
            render_all: false,
            overscan: RenderOffset::Auto,
            calculation_type: CalculationType::Rendered,
            has_fixed_items: false,
        }
    }

    /// Skip accumulation and return every item.
    pub fn render_all(mut self, render_all: bool) -> Self {
        self.render_all = render_all;
        self
    }

    pub fn overscan(mut self, overscan: RenderOffset) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn calculation_type(mut self, calculation_type: CalculationType) -> Self {
        self.calculation_type = calculation_type;
        self
    }

    /// Whether the axis has fixed (frozen) items before the scrolled ones.
    pub fn fixed_items(mut self, has_fixed_items: bool) -> Self {
        self.has_fixed_items = has_fixed_items;
        self
    }

    fn size(&self, index: usize) -> f32 {
        let size = (self.size_of)(index);
        if size.is_finite() && size > 0.0 {
            size
        } else {
            0.0
        }
    }

    fn scan(&self, offset: f32) -> Scan {
        let window_end = offset + self.viewport_size;
        let mut scan = Scan::default();
        let mut sum = 0.0_f32;

        for index in 0..self.total {
            let item_end = sum + self.size(index);

            if item_end > offset && sum < window_end {
                match scan.partial.as_mut() {
                    Some(range) => range.1 = index,
                    None => {
                        scan.partial = Some((index, index));
                        scan.partial_start_position = sum;
                    }
                }
                scan.partial_end_edge = item_end;
            }
            if sum >= offset && item_end <= window_end {
                match scan.full.as_mut() {
                    Some(range) => range.1 = index,
                    None => {
                        scan.full = Some((index, index));
                        scan.full_start_position = sum;
                    }
                }
            }

            sum = item_end;
            if sum >= window_end {
                scan.filled = true;
                break;
            }
        }
        scan.reached = sum;
        scan
    }

    // ratio * scale is within 0..=12, the cast cannot truncate
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn offset_items(&self, end: usize) -> usize {
        match self.overscan {
            RenderOffset::Items(n) => n,
            RenderOffset::Auto if self.has_fixed_items => AUTO_OFFSET_WITH_FIXED,
            RenderOffset::Auto => {
                let ratio = end as f64 / self.total as f64;
                (ratio * AUTO_OFFSET_SCALE).ceil() as usize
            }
        }
    }

    /// Run the calculation. `None` means nothing is visible.
    pub fn calculate(&self) -> Option<ViewportRange> {
        if self.total == 0 {
            return None;
        }
        if self.render_all {
            return Some(ViewportRange {
                start: 0,
                end: self.total - 1,
                start_position: 0.0,
                start_clipped: false,
                end_clipped: false,
            });
        }
        // Also rejects NaN
        if !(self.viewport_size > 0.0) {
            return None;
        }

        let offset = if self.scroll_offset.is_finite() {
            self.scroll_offset.max(0.0)
        } else {
            0.0
        };
        let mut scan = self.scan(offset);
        let mut window_start = offset;

        // Scrolled past the content end: anchor the window to the last item
        if !scan.filled {
            let anchored = (scan.reached - self.viewport_size).max(0.0);
            if anchored < offset {
                scan = self.scan(anchored);
                window_start = anchored;
            }
        }
        let window_end = window_start + self.viewport_size;

        let range = match self.calculation_type {
            CalculationType::FullyVisible => {
                let (start, end) = scan.full?;
                ViewportRange {
                    start,
                    end,
                    start_position: scan.full_start_position,
                    start_clipped: false,
                    end_clipped: false,
                }
            }
            CalculationType::PartiallyVisible | CalculationType::Rendered => {
                let (start, end) = scan.partial?;
                ViewportRange {
                    start,
                    end,
                    start_position: scan.partial_start_position,
                    start_clipped: scan.partial_start_position < window_start,
                    end_clipped: scan.partial_end_edge > window_end,
                }
            }
        };

        let range = if self.calculation_type == CalculationType::Rendered {
            self.with_overscan(range)
        } else {
            range
        };
        log::trace!(
            "viewport {:?}: items {}..={} of {}",
            self.calculation_type,
            range.start,
            range.end,
            self.total
        );
        Some(range)
    }

    fn with_overscan(&self, range: ViewportRange) -> ViewportRange {
        let items = self.offset_items(range.end);
        if items == 0 {
            return range;
        }
        let start = range.start.saturating_sub(items);
        let end = range.end.saturating_add(items).min(self.total - 1);
        let leading: f32 = (start..range.start).map(|index| self.size(index)).sum();
        ViewportRange {
            start,
            end,
            start_position: range.start_position - leading,
            ..range
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn rows(total: usize, offset: f32, viewport: f32) -> ViewportCalculator<impl Fn(usize) -> f32> {
        ViewportCalculator::new(total, offset, viewport, |_| 23.0)
    }

    #[test]
    fn test_empty_inputs() {
        assert!(rows(0, 0.0, 100.0).calculate().is_none());
        assert!(rows(10, 0.0, 0.0).calculate().is_none());
        assert!(rows(10, 0.0, -5.0).calculate().is_none());
        assert!(rows(10, 0.0, f32::NAN).calculate().is_none());
    }

    #[test]
    fn test_calculated_ranges_are_never_empty() {
        for calculation_type in [
            CalculationType::Rendered,
            CalculationType::FullyVisible,
            CalculationType::PartiallyVisible,
        ] {
            for offset in [0.0, 11.0, 5000.0] {
                let range = rows(10, offset, 100.0)
                    .calculation_type(calculation_type)
                    .calculate()
                    .unwrap();
                assert!(range.start <= range.end);
                assert!(!range.is_empty());
                assert_eq!(range.len(), range.indexes().count());
            }
        }
    }

    #[test]
    fn test_render_all_bypasses_accumulation() {
        let range = rows(1000, 500.0, 0.0).render_all(true).calculate().unwrap();
        assert_eq!((range.start, range.end), (0, 999));
    }

    #[test]
    fn test_partially_visible_from_top() {
        let range = rows(100, 0.0, 100.0)
            .calculation_type(CalculationType::PartiallyVisible)
            .calculate()
            .unwrap();
        // 100 / 23 = 4.35 rows
        assert_eq!((range.start, range.end), (0, 4));
        assert_eq!(range.start_position, 0.0);
        assert!(!range.start_clipped);
        assert!(range.end_clipped);
    }

    #[test]
    fn test_fully_visible_excludes_clipped_edges() {
        let range = rows(100, 30.0, 100.0)
            .calculation_type(CalculationType::FullyVisible)
            .calculate()
            .unwrap();
        // Window 30..130: row 1 (23..46) is clipped, rows 2..=4 (46..115) fit
        assert_eq!((range.start, range.end), (2, 4));
        assert_eq!(range.start_position, 46.0);
    }

    #[test]
    fn test_variable_sizes() {
        let sizes = [10.0, 50.0, 10.0, 10.0, 10.0];
        let range = ViewportCalculator::new(5, 15.0, 50.0, |i| sizes[i])
            .calculation_type(CalculationType::PartiallyVisible)
            .calculate()
            .unwrap();
        // Window 15..65: row 1 (10..60) and row 2 (60..70)
        assert_eq!((range.start, range.end), (1, 2));
        assert!(range.start_clipped);
        assert!(range.end_clipped);
    }

    #[test]
    fn test_offset_past_end_is_anchored() {
        let range = rows(10, 10_000.0, 100.0)
            .calculation_type(CalculationType::PartiallyVisible)
            .calculate()
            .unwrap();
        // Content is 230px; the window becomes 130..230
        assert_eq!(range.end, 9);
        assert_eq!(range.start, 5);
    }

    #[test]
    fn test_fixed_overscan() {
        let range = rows(100, 230.0, 100.0)
            .overscan(RenderOffset::Items(3))
            .calculate()
            .unwrap();
        // Visible 10..=14, overscanned 7..=17
        assert_eq!((range.start, range.end), (7, 17));
        assert_eq!(range.start_position, 7.0 * 23.0);
    }

    #[test]
    fn test_auto_overscan() {
        let range = rows(100, 0.0, 100.0).calculate().unwrap();
        // ceil(4 / 100 * 12) = 1
        assert_eq!((range.start, range.end), (0, 5));

        let range = rows(100, 0.0, 100.0).fixed_items(true).calculate().unwrap();
        assert_eq!((range.start, range.end), (0, 14));
    }

    #[test]
    fn test_pure_function() {
        let calc = rows(50, 123.0, 200.0);
        assert_eq!(calc.calculate(), calc.calculate());
    }
}
