//! Coordinate Mapper
//!
//! Pure price/index to pixel transforms. The view range is derived from the
//! bars currently on screen and is never cached.

use crate::chart::{ChartStyle, Padding};
use crate::types::{Bar, Marker, ViewRange, Viewport};

/// Denominator floor for a hand-built zero-width range
const MIN_SPAN: f64 = 1e-12;

/// Padded price bounds of the visible bars and the markers anchored to them.
///
/// `flat_pad` replaces the proportional padding when every price is equal.
pub fn compute_view_range<'a, I>(
    visible: &[Bar],
    markers: I,
    pad_ratio: f64,
    flat_pad: f64,
) -> ViewRange
where
    I: IntoIterator<Item = &'a Marker>,
{
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for bar in visible {
        min = min.min(bar.low);
        max = max.max(bar.high);
    }
    for marker in markers {
        if visible.binary_search_by_key(&marker.time, |b| b.time).is_ok() {
            min = min.min(marker.price);
            max = max.max(marker.price);
        }
    }

    if !min.is_finite() || !max.is_finite() {
        min = ViewRange::EMPTY_FALLBACK.min;
        max = ViewRange::EMPTY_FALLBACK.max;
    }

    let span = max - min;
    let pad = if span > 0.0 { span * pad_ratio } else { flat_pad };
    ViewRange {
        min: min - pad,
        max: max + pad,
    }
}

/// Linear price to y mapping inside the vertical padding
pub fn price_to_y(price: f64, range: &ViewRange, height: f64, padding: &Padding) -> f64 {
    let usable = height - padding.top - padding.bottom;
    let frac = (price - range.min) / range.span().max(MIN_SPAN);
    padding.top + (1.0 - frac) * usable
}

/// Horizontal placement of `count` right-aligned candles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandleLayout {
    pub count: usize,
    pub candle_width: f64,
    pub spacing: f64,
    pub step: f64,
    /// Right edge of the newest candle
    pub right_edge: f64,
}

impl CandleLayout {
    pub fn compute(count: usize, viewport: Viewport, style: &ChartStyle) -> Self {
        let available = (viewport.width - style.padding.left - style.padding.right).max(0.0);
        let fitted = if count > 0 {
            let n = count as f64;
            (available - style.spacing * (n - 1.0)) / n * style.body_fill_ratio
        } else {
            0.0
        };
        let candle_width = fitted.max(style.min_candle_width);

        Self {
            count,
            candle_width,
            spacing: style.spacing,
            step: candle_width + style.spacing,
            right_edge: viewport.width - style.padding.right,
        }
    }

    /// Left edge of the oldest candle
    pub fn start_x(&self) -> f64 {
        if self.count == 0 {
            return self.right_edge;
        }
        let n = self.count as f64;
        self.right_edge - (n * self.candle_width + (n - 1.0) * self.spacing)
    }

    /// Left edge of candle `index` (0 = oldest visible)
    pub fn left_x(&self, index: usize) -> f64 {
        let after = self.count.saturating_sub(index + 1) as f64;
        self.right_edge - self.candle_width - after * self.step
    }

    pub fn center_x(&self, index: usize) -> f64 {
        self.left_x(index) + self.candle_width / 2.0
    }
}
