//! Core types used throughout FxMirror
//!
//! Defines the bar, marker, price-range and viewport structures shared by the
//! market simulation, the chart layout and the renderer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds between two consecutive bars
pub const BAR_STEP_SECS: i64 = 60;

/// Execution side of a simulated trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Upper-case label used on the chart and in toasts
    pub fn label(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// One fixed-duration OHLC bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bar open time in unix seconds
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    /// True when the bar closed at or above its open
    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }

    /// OHLC envelope holds and every price is strictly positive
    pub fn is_well_formed(&self) -> bool {
        self.low <= self.open.min(self.close)
            && self.high >= self.open.max(self.close)
            && self.low > 0.0
            && self.close > 0.0
    }
}

/// Simulated execution annotation anchored to a bar time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub time: i64,
    pub price: f64,
    pub side: Side,
}

/// Padded vertical price bounds used to scale the chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewRange {
    pub min: f64,
    pub max: f64,
}

impl ViewRange {
    /// Unpadded range used when there is nothing to measure
    pub const EMPTY_FALLBACK: ViewRange = ViewRange { min: 1.0, max: 1.1 };

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Price at a fraction of the range measured from the top (0.0 = max)
    pub fn price_at_fraction_from_top(&self, fraction: f64) -> f64 {
        self.max - self.span() * fraction
    }
}

/// Drawing surface size in device-independent pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Clamp a requested size to the minimum usable chart size
    pub fn fit(width: f64, height: f64, min_width: f64, min_height: f64) -> Self {
        let width = if width.is_finite() { width } else { min_width };
        let height = if height.is_finite() { height } else { min_height };
        Self {
            width: width.max(min_width),
            height: height.max(min_height),
        }
    }
}
