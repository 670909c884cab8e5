//! Pre-computed item positions along one axis.
//!
//! Built once from item sizes, this gives O(1) position lookups and
//! O(log n) hit testing. Items are renderable indexes: hidden and trimmed
//! rows/columns are not part of the layout.

use super::calculator::ViewportCalculator;

/// Prefix sums over the renderable items of one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLayout {
    /// `positions[i]` = leading edge of item i; one extra trailing edge
    positions: Vec<f32>,
}

impl Default for AxisLayout {
    fn default() -> Self {
        Self::from_sizes(std::iter::empty())
    }
}

impl AxisLayout {
    pub fn from_sizes(sizes: impl IntoIterator<Item = f32>) -> Self {
        let mut positions = vec![0.0];
        let mut edge = 0.0_f32;
        for size in sizes {
            edge += if size.is_finite() { size.max(0.0) } else { 0.0 };
            positions.push(edge);
        }
        Self { positions }
    }

    /// `count` items of the same size.
    pub fn uniform(count: usize, size: f32) -> Self {
        Self::from_sizes(std::iter::repeat(size).take(count))
    }

    pub fn len(&self) -> usize {
        self.positions.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Leading edge of an item.
    pub fn position(&self, index: usize) -> Option<f32> {
        if index < self.len() {
            self.positions.get(index).copied()
        } else {
            None
        }
    }

    pub fn size(&self, index: usize) -> f32 {
        match (self.positions.get(index), self.positions.get(index + 1)) {
            (Some(start), Some(end)) => end - start,
            _ => 0.0,
        }
    }

    pub fn total_size(&self) -> f32 {
        self.positions.last().copied().unwrap_or(0.0)
    }

    /// Combined size of the first `count` items.
    pub fn leading_size(&self, count: usize) -> f32 {
        self.positions
            .get(count.min(self.len()))
            .copied()
            .unwrap_or(0.0)
    }

    /// Item containing `position` (binary search), `None` outside the axis.
    pub fn index_at(&self, position: f32) -> Option<usize> {
        if self.is_empty() || !(position >= 0.0) || position >= self.total_size() {
            return None;
        }
        let index = match self
            .positions
            .binary_search_by(|edge| edge.partial_cmp(&position).unwrap_or(std::cmp::Ordering::Equal))
        {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        // Skip zero-sized items sharing the same edge
        let mut index = index.min(self.len() - 1);
        while index + 1 < self.len() && self.size(index) <= 0.0 {
            index += 1;
        }
        Some(index)
    }

    /// A calculator over the items from `first` on, with positions relative to `first`.
    pub fn calculator(
        &self,
        first: usize,
        scroll_offset: f32,
        viewport_size: f32,
    ) -> ViewportCalculator<impl Fn(usize) -> f32 + '_> {
        let total = self.len().saturating_sub(first);
        ViewportCalculator::new(total, scroll_offset, viewport_size, move |i| {
            self.size(first + i)
        })
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

    #[test]
    fn test_positions() {
        let layout = AxisLayout::from_sizes([10.0, 20.0, 30.0]);
        assert_eq!(layout.len(), 3);
        assert_eq!(layout.position(1), Some(10.0));
        assert_eq!(layout.position(3), None);
        assert_eq!(layout.size(2), 30.0);
        assert_eq!(layout.total_size(), 60.0);
        assert_eq!(layout.leading_size(2), 30.0);
    }

    #[test]
    fn test_index_at() {
        let layout = AxisLayout::from_sizes([10.0, 20.0, 30.0]);
        assert_eq!(layout.index_at(0.0), Some(0));
        assert_eq!(layout.index_at(9.9), Some(0));
        assert_eq!(layout.index_at(10.0), Some(1));
        assert_eq!(layout.index_at(59.0), Some(2));
        assert_eq!(layout.index_at(60.0), None);
        assert_eq!(layout.index_at(-1.0), None);
    }

    #[test]
    fn test_empty() {
        let layout = AxisLayout::default();
        assert!(layout.is_empty());
        assert_eq!(layout.total_size(), 0.0);
        assert_eq!(layout.index_at(0.0), None);
    }
}
