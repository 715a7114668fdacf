//! Dashboard sink
//!
//! Turns core events into the toasts and notification rows a user sees. Owns
//! its own random source so cosmetic draws (addresses, reward notices) never
//! shift the core's sequence.

use tracing::debug;

use crate::config::NotificationConfig;
use crate::leaderboard::RankMove;
use crate::market::{format_price, Instrument};
use crate::notify::{synthetic_address, NotificationFeed, ToastStack};
use crate::random::RandomSource;
use crate::sim::{EventSink, SimEvent, Snapshot};

const MIRROR_TOAST_TITLE: &str = "Top up now to mirror this trades";

pub struct Dashboard<R: RandomSource> {
    config: NotificationConfig,
    feed: NotificationFeed,
    toasts: ToastStack,
    decimals: u32,
    paused: bool,
    last_moves: Vec<RankMove>,
    rng: R,
}

impl<R: RandomSource> Dashboard<R> {
    pub fn new(config: &NotificationConfig, instrument: &Instrument, rng: R) -> Self {
        Self {
            feed: NotificationFeed::new(config.max_visible),
            toasts: ToastStack::default(),
            config: config.clone(),
            decimals: instrument.profile().decimals,
            paused: false,
            last_moves: Vec::new(),
            rng,
        }
    }

    pub fn feed(&self) -> &NotificationFeed {
        &self.feed
    }

    pub fn toasts(&self) -> &ToastStack {
        &self.toasts
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Rows that moved in the latest reorder, for up/down highlighting
    pub fn last_moves(&self) -> &[RankMove] {
        &self.last_moves
    }

    /// Post a row from a fresh synthetic address
    pub fn push_notification(&mut self, meta: impl Into<String>, at_ms: u64) {
        let address = synthetic_address(&mut self.rng);
        self.feed.push(address, meta, at_ms);
    }

    pub fn push_toast(&mut self, title: &str, body: &str, short: bool, at_ms: u64) {
        let lifetime = if short {
            self.config.toast_short_ms
        } else {
            self.config.toast_long_ms
        };
        self.toasts.push(title, body, at_ms, lifetime);
    }

    /// Expire toasts as sim time moves on
    pub fn prune(&mut self, now_ms: u64) -> usize {
        self.toasts.prune(now_ms)
    }

    fn fmt(&self, price: f64) -> String {
        format_price(price, self.decimals)
    }
}

impl<R: RandomSource> EventSink for Dashboard<R> {
    fn publish(&mut self, at_ms: u64, event: &SimEvent) {
        self.prune(at_ms);
        match event {
            SimEvent::Execution { side, price, .. } => {
                let price = self.fmt(*price);
                self.push_toast(
                    &format!("{} executed", side.label()),
                    &format!("Price {} • Mirrored", price),
                    true,
                    at_ms,
                );
                self.push_notification(format!("mirrored {} @ {}", side, price), at_ms);
            }
            SimEvent::Reward { handle, price, .. } => {
                if self.rng.chance(self.config.reward_notice_probability) {
                    let meta = format!("mirrored {} @ {}", handle, self.fmt(*price));
                    self.push_notification(meta, at_ms);
                }
            }
            SimEvent::ManualMirror { handle: Some(handle) } => {
                self.push_toast(
                    MIRROR_TOAST_TITLE,
                    &format!("Top up now to mirror {}'s trades", handle),
                    true,
                    at_ms,
                );
                self.push_notification(format!("mirrored {} (manual)", handle), at_ms);
            }
            SimEvent::ManualMirror { handle: None } => {
                self.push_toast(MIRROR_TOAST_TITLE, MIRROR_TOAST_TITLE, true, at_ms);
                self.push_notification("mirrored (mirror button)", at_ms);
            }
            SimEvent::Activity => self.push_notification("mirrored activity", at_ms),
            SimEvent::PauseToggled { paused } => {
                self.paused = *paused;
                let (title, body) = if *paused {
                    ("Feed paused", "Live updates paused")
                } else {
                    ("Feed resumed", "Live updates resumed")
                };
                self.push_toast(title, body, true, at_ms);
            }
            SimEvent::InstrumentChanged { key, decimals } => {
                debug!(instrument = %key, decimals, "[SIM] Dashboard switched instrument");
                self.decimals = *decimals;
            }
            SimEvent::LeaderboardReordered { moves } => {
                self.last_moves = moves.clone();
            }
        }
    }

    fn on_step(&mut self, now_ms: u64, _snapshot: &Snapshot) {
        self.prune(now_ms);
    }
}
