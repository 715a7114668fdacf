//! Market module - Synthetic FX price simulation
//!
//! Instrument table, random-walk bar generation, the bounded bar series,
//! execution markers and the cosmetic bid/ask quote panel.

mod generator;
mod markers;
mod quote;
mod series;

pub use generator::PriceGenerator;
pub use markers::MarkerStore;
pub use quote::Quote;
pub use series::Series;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Seed price used for instrument keys outside the table
pub const FALLBACK_SEED_PRICE: f64 = 1.0;

/// Currency pairs with a dedicated seed price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pair {
    EURUSD,
    GBPUSD,
    USDJPY,
    AUDUSD,
    USDCAD,
    USDCHF,
}

impl Pair {
    /// Parse from string (case-insensitive, "EUR/USD" accepted)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().replace('/', "").to_uppercase().as_str() {
            "EURUSD" => Some(Pair::EURUSD),
            "GBPUSD" => Some(Pair::GBPUSD),
            "USDJPY" => Some(Pair::USDJPY),
            "AUDUSD" => Some(Pair::AUDUSD),
            "USDCAD" => Some(Pair::USDCAD),
            "USDCHF" => Some(Pair::USDCHF),
            _ => None,
        }
    }

    pub fn seed_price(&self) -> f64 {
        match self {
            Pair::EURUSD => 1.07500,
            Pair::GBPUSD => 1.27000,
            Pair::USDJPY => 154.300,
            Pair::AUDUSD => 0.65000,
            Pair::USDCAD => 1.34000,
            Pair::USDCHF => 0.92000,
        }
    }

    /// Yen pairs are quoted with three decimals
    pub fn is_three_decimal(&self) -> bool {
        matches!(self, Pair::USDJPY)
    }

    /// Human title, e.g. "EUR/USD"
    pub fn title(&self) -> &'static str {
        match self {
            Pair::EURUSD => "EUR/USD",
            Pair::GBPUSD => "GBP/USD",
            Pair::USDJPY => "USD/JPY",
            Pair::AUDUSD => "AUD/USD",
            Pair::USDCAD => "USD/CAD",
            Pair::USDCHF => "USD/CHF",
        }
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Pair::EURUSD => "EURUSD",
            Pair::GBPUSD => "GBPUSD",
            Pair::USDJPY => "USDJPY",
            Pair::AUDUSD => "AUDUSD",
            Pair::USDCAD => "USDCAD",
            Pair::USDCHF => "USDCHF",
        };
        write!(f, "{}", s)
    }
}

/// Numeric behaviour of an instrument's random walk
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstrumentProfile {
    pub seed_price: f64,
    /// Decimal places prices are rounded to
    pub decimals: u32,
    /// Close-change width used when generating history
    pub history_volatility: f64,
    /// Close-change width used when a live bar completes
    pub live_volatility: f64,
    /// Fixed wick extension beyond the body
    pub wick: f64,
    /// Range padding when the observed span is zero
    pub flat_range_pad: f64,
    /// Spread sampling bounds for the quote panel
    pub spread_range: (f64, f64),
    pub spread_decimals: u32,
}

impl InstrumentProfile {
    const FIVE_DECIMAL: InstrumentProfile = InstrumentProfile {
        seed_price: FALLBACK_SEED_PRICE,
        decimals: 5,
        history_volatility: 0.0018,
        live_volatility: 0.0018,
        wick: 0.0006,
        flat_range_pad: 0.0005,
        spread_range: (0.00005, 0.0009),
        spread_decimals: 5,
    };

    const THREE_DECIMAL: InstrumentProfile = InstrumentProfile {
        seed_price: FALLBACK_SEED_PRICE,
        decimals: 3,
        history_volatility: 0.12,
        live_volatility: 0.02,
        wick: 0.02,
        flat_range_pad: 0.5,
        spread_range: (0.01, 0.12),
        spread_decimals: 2,
    };

    fn for_pair(pair: Option<Pair>) -> Self {
        match pair {
            Some(p) if p.is_three_decimal() => Self {
                seed_price: p.seed_price(),
                ..Self::THREE_DECIMAL
            },
            Some(p) => Self {
                seed_price: p.seed_price(),
                ..Self::FIVE_DECIMAL
            },
            None => Self::FIVE_DECIMAL,
        }
    }

    /// Smallest quotable positive price (one unit of the last decimal)
    pub fn min_price(&self) -> f64 {
        10f64.powi(-(self.decimals as i32))
    }

    /// Width of the sub-bar tick delta: half the bar-completion volatility
    pub fn tick_width(&self) -> f64 {
        self.live_volatility / 2.0
    }

    pub fn round(&self, price: f64) -> f64 {
        round_dp(price, self.decimals)
    }

    pub fn format(&self, price: f64) -> String {
        format_price(price, self.decimals)
    }
}

/// Instrument selected by the UI: the raw key plus its resolved profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    key: String,
    pair: Option<Pair>,
    profile: InstrumentProfile,
}

impl Instrument {
    /// Resolve a key; unknown keys keep the key but use the fallback profile
    pub fn from_key(key: &str) -> Self {
        let pair = Pair::from_str(key);
        Self {
            key: key.trim().to_uppercase(),
            pair,
            profile: InstrumentProfile::for_pair(pair),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn pair(&self) -> Option<Pair> {
        self.pair
    }

    pub fn is_known(&self) -> bool {
        self.pair.is_some()
    }

    pub fn profile(&self) -> &InstrumentProfile {
        &self.profile
    }

    pub fn title(&self) -> String {
        self.pair
            .map(|p| p.title().to_string())
            .unwrap_or_else(|| self.key.clone())
    }
}

impl Default for Instrument {
    fn default() -> Self {
        Instrument::from_key("EURUSD")
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)
    }
}

/// Round half away from zero to `dp` decimal places
pub fn round_dp(value: f64, dp: u32) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// Fixed-point price label
pub fn format_price(value: f64, dp: u32) -> String {
    format!("{:.*}", dp as usize, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_parsing() {
        assert_eq!(Pair::from_str("eurusd"), Some(Pair::EURUSD));
        assert_eq!(Pair::from_str("USD/JPY"), Some(Pair::USDJPY));
        assert_eq!(Pair::from_str("XAUUSD"), None);
    }

    #[test]
    fn test_unknown_key_falls_back() {
        let inst = Instrument::from_key("doge");
        assert!(!inst.is_known());
        assert_eq!(inst.key(), "DOGE");
        assert_eq!(inst.profile().seed_price, 1.0);
        assert_eq!(inst.profile().decimals, 5);
    }

    #[test]
    fn test_yen_profile() {
        let inst = Instrument::from_key("USDJPY");
        let p = inst.profile();
        assert_eq!(p.decimals, 3);
        assert_eq!(p.seed_price, 154.3);
        assert!((p.min_price() - 0.001).abs() < 1e-15);
        assert_eq!(p.format(154.3), "154.300");
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round_dp(1.234_567, 5), 1.23457);
        assert_eq!(round_dp(154.3004, 3), 154.3);
        assert_eq!(round_dp(-0.125, 2), -0.13);
        assert_eq!(format_price(1.075, 5), "1.07500");
    }
}
