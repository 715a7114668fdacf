//! Configuration management for FxMirror
//!
//! Loads defaults, optional `config/default` and `config/local` files, then
//! `FXMIRROR__*` environment variables (a `.env` file is read first).

mod types;

pub use types::*;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Viewport;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub sim: SimConfig,
    pub schedule: ScheduleConfig,
    pub chart: ChartConfig,
    pub leaderboard: LeaderboardConfig,
    pub notifications: NotificationConfig,
    pub runtime: RuntimeConfig,
}

/// Semantically invalid configuration values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
    #[error("{field} must be a probability in [0, 1], got {value}")]
    Probability { field: &'static str, value: f64 },
    #[error("{field} must be a positive number, got {value}")]
    NonPositive { field: &'static str, value: f64 },
}

impl AppConfig {
    /// Load configuration from defaults, files and environment
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Config::try_from(&AppConfig::default())
            .context("Failed to encode default configuration")?;

        let config = Config::builder()
            .add_source(defaults)
            // Load config files if they exist
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (FXMIRROR__SIM__INSTRUMENT=USDJPY)
            .add_source(
                Environment::with_prefix("FXMIRROR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        app_config.validate().context("Invalid configuration")?;
        Ok(app_config)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let nonzero = [
            ("sim.visible_bars", self.sim.visible_bars as u64),
            ("sim.marker_capacity", self.sim.marker_capacity as u64),
            ("schedule.tick_ms", self.schedule.tick_ms),
            ("schedule.candle_ms", self.schedule.candle_ms),
            ("schedule.leaderboard_ms", self.schedule.leaderboard_ms),
            ("schedule.notify_ms", self.schedule.notify_ms),
            ("notifications.max_visible", self.notifications.max_visible as u64),
            ("runtime.frame_interval_ms", self.runtime.frame_interval_ms),
            ("runtime.broadcast_capacity", self.runtime.broadcast_capacity as u64),
        ];
        for (field, value) in nonzero {
            if value == 0 {
                return Err(SettingsError::Zero { field });
            }
        }

        let probabilities = [
            ("sim.marker_probability", self.sim.marker_probability),
            ("sim.activity_probability", self.sim.activity_probability),
            (
                "notifications.reward_notice_probability",
                self.notifications.reward_notice_probability,
            ),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(SettingsError::Probability { field, value });
            }
        }

        let positive = [
            ("chart.min_width", self.chart.min_width),
            ("chart.min_height", self.chart.min_height),
            ("chart.style.min_candle_width", self.chart.style.min_candle_width),
            ("runtime.speed", self.runtime.speed),
        ];
        for (field, value) in positive {
            if value <= 0.0 || !value.is_finite() {
                return Err(SettingsError::NonPositive { field, value });
            }
        }

        Ok(())
    }

    /// Requested chart size clamped to the minimum
    pub fn viewport(&self) -> Viewport {
        Viewport::fit(
            self.chart.width,
            self.chart.height,
            self.chart.min_width,
            self.chart.min_height,
        )
    }

    /// One-line summary for the startup log
    pub fn digest(&self) -> String {
        format!(
            "instrument={} visible={} retention={} tick={}ms candle={}ms traders={} seed={:?}",
            self.sim.instrument,
            self.sim.visible_bars,
            self.sim.retention(),
            self.schedule.tick_ms,
            self.schedule.candle_ms,
            self.leaderboard.size,
            self.sim.seed
        )
    }
}

impl std::fmt::Display for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.digest())
    }
}
