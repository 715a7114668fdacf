//! Chart Renderer
//!
//! Stateless painter: every call re-derives the view range and candle layout
//! from the bars it is handed, so resizes and trims need no invalidation.

use chrono::{TimeZone, Utc};
use tracing::trace;

use crate::chart::{compute_view_range, price_to_y, CandleLayout, ChartStyle};
use crate::market::{InstrumentProfile, MarkerStore};
use crate::types::{Bar, Side, ViewRange, Viewport};

/// Vertical distance from the price point to the triangle tip
const MARKER_TIP: f64 = 12.0;
/// Vertical distance from the price point to the triangle base
const MARKER_BASE: f64 = 2.0;
/// Reserved width for the right-most time label
const LAST_TIME_LABEL_WIDTH: f64 = 60.0;

/// Drawing backend. Coordinates are device-independent pixels, origin top-left.
pub trait Canvas {
    fn clear(&mut self, viewport: Viewport, color: &str);
    fn line(&mut self, from: (f64, f64), to: (f64, f64), color: &str, width: f64);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str);
    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str);
    fn fill_triangle(&mut self, points: [(f64, f64); 3], color: &str);
    fn text(&mut self, text: &str, x: f64, y: f64, color: &str, size_px: f64);
}

/// Everything one frame reads
#[derive(Debug, Clone, Copy)]
pub struct ChartFrame<'a> {
    /// Visible suffix of the series, oldest first
    pub bars: &'a [Bar],
    pub markers: &'a MarkerStore,
    pub profile: &'a InstrumentProfile,
    pub viewport: Viewport,
}

/// What a frame ended up drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSummary {
    pub range: ViewRange,
    pub candles: usize,
    pub markers_drawn: usize,
    pub markers_skipped: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ChartRenderer {
    style: ChartStyle,
}

impl ChartRenderer {
    pub fn new(style: ChartStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    pub fn view_range(&self, frame: &ChartFrame<'_>) -> ViewRange {
        compute_view_range(
            frame.bars,
            frame.markers.iter(),
            self.style.range_pad_ratio,
            frame.profile.flat_range_pad,
        )
    }

    /// Paint grid, candles, markers and time axis, in that order
    pub fn render<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        frame: &ChartFrame<'_>,
    ) -> FrameSummary {
        let range = self.view_range(frame);
        let layout = CandleLayout::compute(frame.bars.len(), frame.viewport, &self.style);

        canvas.clear(frame.viewport, &self.style.background);
        self.draw_grid(canvas, frame, &range);
        self.draw_candles(canvas, frame, &range, &layout);
        let (markers_drawn, markers_skipped) = self.draw_markers(canvas, frame, &range, &layout);
        self.draw_time_axis(canvas, frame, &layout);

        trace!(
            candles = frame.bars.len(),
            markers_drawn,
            markers_skipped,
            min = range.min,
            max = range.max,
            "[CHART] Frame rendered"
        );

        FrameSummary {
            range,
            candles: frame.bars.len(),
            markers_drawn,
            markers_skipped,
        }
    }

    fn y(&self, price: f64, range: &ViewRange, viewport: Viewport) -> f64 {
        price_to_y(price, range, viewport.height, &self.style.padding)
    }

    fn draw_grid<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        frame: &ChartFrame<'_>,
        range: &ViewRange,
    ) {
        let s = &self.style;
        let rows = s.grid_rows.max(1);
        let usable = s.usable_height(frame.viewport.height);
        let right = frame.viewport.width - s.padding.right;

        for i in 0..=rows {
            let frac = i as f64 / rows as f64;
            let y = s.padding.top + frac * usable;
            canvas.line((s.padding.left, y), (right, y), &s.grid_color, 1.0);
            let label = frame.profile.format(range.price_at_fraction_from_top(frac));
            canvas.text(&label, 8.0, y + 4.0, &s.axis_text, s.axis_font_px);
        }
    }

    fn draw_candles<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        frame: &ChartFrame<'_>,
        range: &ViewRange,
        layout: &CandleLayout,
    ) {
        let s = &self.style;
        let vp = frame.viewport;
        let w = layout.candle_width;

        for (i, bar) in frame.bars.iter().enumerate() {
            let cx = layout.center_x(i);
            let open_y = self.y(bar.open, range, vp);
            let close_y = self.y(bar.close, range, vp);
            canvas.line(
                (cx, self.y(bar.high, range, vp)),
                (cx, self.y(bar.low, range, vp)),
                &s.wick_color,
                1.0,
            );

            let color = if bar.is_up() { &s.up_color } else { &s.down_color };
            let top = open_y.min(close_y);
            let height = (close_y - open_y).abs().max(1.0);
            canvas.fill_rect(cx - w / 2.0, top, w, height, color);
            canvas.stroke_rect(cx - w / 2.0, top, w, height, &s.body_outline);
        }
    }

    fn draw_markers<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        frame: &ChartFrame<'_>,
        range: &ViewRange,
        layout: &CandleLayout,
    ) -> (usize, usize) {
        let s = &self.style;
        let half = s.marker_half_width;
        let mut drawn = 0;
        let mut skipped = 0;

        for marker in frame.markers.iter() {
            let Ok(index) = frame.bars.binary_search_by_key(&marker.time, |b| b.time) else {
                skipped += 1;
                continue;
            };
            let cx = layout.center_x(index);
            let y = self.y(marker.price, range, frame.viewport);
            let (points, color, label_y) = match marker.side {
                Side::Buy => (
                    [
                        (cx, y - MARKER_TIP),
                        (cx - half, y - MARKER_BASE),
                        (cx + half, y - MARKER_BASE),
                    ],
                    &s.up_color,
                    y - 14.0,
                ),
                Side::Sell => (
                    [
                        (cx, y + MARKER_TIP),
                        (cx - half, y + MARKER_BASE),
                        (cx + half, y + MARKER_BASE),
                    ],
                    &s.down_color,
                    y + 26.0,
                ),
            };
            canvas.fill_triangle(points, color);
            canvas.text(marker.side.label(), cx - 12.0, label_y, &s.marker_text, s.marker_font_px);
            drawn += 1;
        }
        (drawn, skipped)
    }

    fn draw_time_axis<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        frame: &ChartFrame<'_>,
        layout: &CandleLayout,
    ) {
        let n = frame.bars.len();
        if n == 0 {
            return;
        }
        let s = &self.style;
        let y = frame.viewport.height - 8.0;
        let mid = n / 2;
        let start = layout.start_x();

        let labels = [
            (frame.bars[0].time, start),
            (frame.bars[mid].time, start + mid as f64 * layout.step),
            (
                frame.bars[n - 1].time,
                frame.viewport.width - s.padding.right - LAST_TIME_LABEL_WIDTH,
            ),
        ];
        for (time, x) in labels {
            canvas.text(&time_label(time), x, y, &s.axis_text, s.axis_font_px);
        }
    }
}

/// `HH:MM` in UTC
pub(crate) fn time_label(secs: i64) -> String {
    Utc.timestamp_opt(secs, 0)
        .single()
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}
