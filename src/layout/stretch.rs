//! Column stretching to fill leftover viewport width.

use serde::{Deserialize, Serialize};

/// How columns grow when they do not fill the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnStretch {
    #[default]
    None,
    /// The last column takes all the leftover width
    Last,
    /// Every column grows proportionally
    All,
}

/// Stretch `widths` to fill `viewport_width`.
///
/// Widths are returned unchanged when they already fill the viewport. In
/// `All` mode every column but the last is scaled and floored; the last
/// column takes the remainder so the sum equals the viewport width exactly.
pub fn stretch_widths(widths: &[f32], viewport_width: f32, mode: ColumnStretch) -> Vec<f32> {
    let total: f32 = widths.iter().sum();
    let mut stretched = widths.to_vec();
    if mode == ColumnStretch::None || widths.is_empty() || !(total < viewport_width) {
        return stretched;
    }

    match mode {
        ColumnStretch::None => {}
        ColumnStretch::Last => {
            if let Some(last) = stretched.last_mut() {
                *last += viewport_width - total;
            }
        }
        ColumnStretch::All => {
            if total <= 0.0 {
                return stretched;
            }
            let ratio = viewport_width / total;
            let mut used = 0.0;
            let last = stretched.len() - 1;
            for (index, width) in stretched.iter_mut().enumerate() {
                if index == last {
                    *width = viewport_width - used;
                } else {
                    *width = (*width * ratio).floor();
                    used += *width;
                }
            }
        }
    }
    stretched
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
    fn test_no_stretch_when_filled() {
        let widths = [100.0, 100.0];
        assert_eq!(stretch_widths(&widths, 150.0, ColumnStretch::All), widths);
        assert_eq!(stretch_widths(&widths, 500.0, ColumnStretch::None), widths);
    }

    #[test]
    fn test_stretch_last() {
        let widths = stretch_widths(&[50.0, 50.0, 50.0], 200.0, ColumnStretch::Last);
        assert_eq!(widths, vec![50.0, 50.0, 100.0]);
    }

    #[test]
    fn test_stretch_all_sums_exactly() {
        let widths = stretch_widths(&[50.0, 50.0, 50.0], 200.0, ColumnStretch::All);
        assert_eq!(widths, vec![66.0, 66.0, 68.0]);
        assert_eq!(widths.iter().sum::<f32>(), 200.0);
    }
}
