//! Configuration sections

use serde::{Deserialize, Serialize};

use crate::chart::ChartStyle;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Instrument key shown at startup (unknown keys use fallbacks)
    pub instrument: String,
    /// Bars on screen; also the initial history length
    pub visible_bars: usize,
    /// Extra bars retained beyond the visible window
    pub retention_slack: usize,
    /// Maximum execution markers kept
    pub marker_capacity: usize,
    /// Chance that a completed bar produces an execution
    pub marker_probability: f64,
    /// Chance that a completed bar produces an activity notice
    pub activity_probability: f64,
    /// Fixed RNG seed; random when absent
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            instrument: "EURUSD".to_string(),
            visible_bars: 140,
            retention_slack: 20,
            marker_capacity: 200,
            marker_probability: 0.22,
            activity_probability: 0.92,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Series retention cap
    pub fn retention(&self) -> usize {
        self.visible_bars + self.retention_slack
    }
}

/// Job periods on the simulation clock, in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub tick_ms: u64,
    pub candle_ms: u64,
    pub leaderboard_ms: u64,
    pub notify_ms: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            tick_ms: 220,
            candle_ms: 2200,
            leaderboard_ms: 3500,
            notify_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Requested viewport width
    pub width: f64,
    /// Requested viewport height
    pub height: f64,
    pub min_width: f64,
    pub min_height: f64,
    pub style: ChartStyle,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 420.0,
            min_width: 300.0,
            min_height: 240.0,
            style: ChartStyle::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardConfig {
    /// Number of seeded traders
    pub size: usize,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self { size: 8 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Visible notification rows, oldest evicted first
    pub max_visible: usize,
    pub toast_short_ms: u64,
    pub toast_long_ms: u64,
    /// Chance that a reward also posts a notification
    pub reward_notice_probability: f64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            max_visible: 40,
            toast_short_ms: 4200,
            toast_long_ms: 6200,
            reward_notice_probability: 0.35,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Wall-clock interval between clock advances
    pub frame_interval_ms: u64,
    /// Simulated milliseconds per wall-clock millisecond
    pub speed: f64,
    /// Stop after this many seconds (0 = until Ctrl-C)
    pub max_runtime_secs: u64,
    /// Emit JSON log lines
    pub json_logs: bool,
    /// Event fan-out channel size
    pub broadcast_capacity: usize,
    /// Log a frame summary every N rendered frames (0 = never)
    pub log_every_frames: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 50,
            speed: 1.0,
            max_runtime_secs: 0,
            json_logs: false,
            broadcast_capacity: 256,
            log_every_frames: 100,
        }
    }
}
