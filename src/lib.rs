//! FxMirror Library
//!
//! Synthetic FX dashboard core: random-walk candles, chart layout and
//! rendering, a reordering trader leaderboard and the notification feed.

pub mod chart;
pub mod config;
pub mod leaderboard;
pub mod market;
pub mod notify;
pub mod random;
pub mod runner;
pub mod sim;
pub mod types;
