//! Chart module - Candlestick layout and rendering
//!
//! Maps prices and bar indices to pixels and paints the visible series onto
//! any [`Canvas`] implementation.

mod mapper;
mod recorder;
mod render;

pub use mapper::{compute_view_range, price_to_y, CandleLayout};
pub use recorder::{DrawCommand, FrameRecorder};
pub use render::{Canvas, ChartFrame, ChartRenderer, FrameSummary};

use serde::{Deserialize, Serialize};

/// Space reserved around the plot area for axis labels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            left: 80.0,
            right: 18.0,
            top: 16.0,
            bottom: 36.0,
        }
    }
}

/// Layout constants and palette for the candlestick chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartStyle {
    pub padding: Padding,
    /// Gap between two candles
    pub spacing: f64,
    /// Candles never get thinner than this
    pub min_candle_width: f64,
    /// Share of each candle slot filled by the body
    pub body_fill_ratio: f64,
    /// Horizontal grid rows (rows + 1 lines are drawn)
    pub grid_rows: usize,
    /// Range padding as a share of the observed span
    pub range_pad_ratio: f64,
    /// Half-width of the execution triangle
    pub marker_half_width: f64,
    pub background: String,
    pub grid_color: String,
    pub axis_text: String,
    pub wick_color: String,
    pub up_color: String,
    pub down_color: String,
    pub body_outline: String,
    pub marker_text: String,
    pub axis_font_px: f64,
    pub marker_font_px: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            padding: Padding::default(),
            spacing: 6.0,
            min_candle_width: 3.0,
            body_fill_ratio: 0.78,
            grid_rows: 6,
            range_pad_ratio: 0.12,
            marker_half_width: 8.0,
            background: "#000".to_string(),
            grid_color: "rgba(255,255,255,0.03)".to_string(),
            axis_text: "#9aa3b2".to_string(),
            wick_color: "#c8d2da".to_string(),
            up_color: "#16a34a".to_string(),
            down_color: "#ef4444".to_string(),
            body_outline: "rgba(0,0,0,0.08)".to_string(),
            marker_text: "#000".to_string(),
            axis_font_px: 12.0,
            marker_font_px: 10.0,
        }
    }
}

impl ChartStyle {
    /// Vertical pixels between the top and bottom padding
    pub fn usable_height(&self, height: f64) -> f64 {
        height - self.padding.top - self.padding.bottom
    }
}
