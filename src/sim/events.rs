//! Simulation Events
//!
//! Everything the core wants a UI to know about is published as a
//! [`SimEvent`] tagged with the sim time. Sinks decide how to show it.

use serde::{Deserialize, Serialize};

use crate::leaderboard::RankMove;
use crate::sim::Snapshot;
use crate::types::Side;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SimEvent {
    /// A completed bar produced a simulated execution
    #[serde(rename_all = "camelCase")]
    Execution { side: Side, price: f64, time: i64 },
    /// A trader was credited after an execution
    #[serde(rename_all = "camelCase")]
    Reward {
        trader_id: u32,
        handle: String,
        price: f64,
        bump: f64,
    },
    /// Mirror button pressed, with the trader's handle for leaderboard rows
    #[serde(rename_all = "camelCase")]
    ManualMirror { handle: Option<String> },
    /// Ambient "someone mirrored" notice
    Activity,
    #[serde(rename_all = "camelCase")]
    PauseToggled { paused: bool },
    #[serde(rename_all = "camelCase")]
    InstrumentChanged { key: String, decimals: u32 },
    /// Leaderboard order changed; only rows that moved are listed
    #[serde(rename_all = "camelCase")]
    LeaderboardReordered { moves: Vec<RankMove> },
}

impl SimEvent {
    /// Wire name of the event kind
    pub fn kind(&self) -> &'static str {
        match self {
            SimEvent::Execution { .. } => "execution",
            SimEvent::Reward { .. } => "reward",
            SimEvent::ManualMirror { .. } => "manualMirror",
            SimEvent::Activity => "activity",
            SimEvent::PauseToggled { .. } => "pauseToggled",
            SimEvent::InstrumentChanged { .. } => "instrumentChanged",
            SimEvent::LeaderboardReordered { .. } => "leaderboardReordered",
        }
    }
}

/// Receives core events in the order they happen
#[cfg_attr(test, mockall::automock)]
pub trait EventSink {
    fn publish(&mut self, at_ms: u64, event: &SimEvent);

    /// Called once per runner step, after the step's events
    fn on_step(&mut self, _now_ms: u64, _snapshot: &Snapshot) {}
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn publish(&mut self, at_ms: u64, event: &SimEvent) {
        (**self).publish(at_ms, event);
    }

    fn on_step(&mut self, now_ms: u64, snapshot: &Snapshot) {
        (**self).on_step(now_ms, snapshot);
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn publish(&mut self, at_ms: u64, event: &SimEvent) {
        (**self).publish(at_ms, event);
    }

    fn on_step(&mut self, now_ms: u64, snapshot: &Snapshot) {
        (**self).on_step(now_ms, snapshot);
    }
}

impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn publish(&mut self, at_ms: u64, event: &SimEvent) {
        self.0.publish(at_ms, event);
        self.1.publish(at_ms, event);
    }

    fn on_step(&mut self, now_ms: u64, snapshot: &Snapshot) {
        self.0.on_step(now_ms, snapshot);
        self.1.on_step(now_ms, snapshot);
    }
}

/// Drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&mut self, _at_ms: u64, _event: &SimEvent) {}
}

/// Keeps every event in memory
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventLog {
    entries: Vec<(u64, SimEvent)>,
}

impl EventLog {
    pub fn entries(&self) -> &[(u64, SimEvent)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(_, e)| e.kind()).collect()
    }

    pub fn count(&self, kind: &str) -> usize {
        self.entries.iter().filter(|(_, e)| e.kind() == kind).count()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl EventSink for EventLog {
    fn publish(&mut self, at_ms: u64, event: &SimEvent) {
        self.entries.push((at_ms, event.clone()));
    }
}
