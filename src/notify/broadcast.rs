//! Event Broadcaster
//!
//! Fans simulation events out as JSON to any number of subscribers. Session
//! snapshots follow as `{"kind":"snapshot",..}` messages whenever the state
//! they describe changed.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::sim::{EventSink, SimEvent, Snapshot};

const SNAPSHOT_KIND: &str = "snapshot";

/// Wire envelope: the event plus the sim time it happened at
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<'a> {
    pub at_ms: u64,
    #[serde(flatten)]
    pub event: &'a SimEvent,
}

/// Wire shape of a snapshot message
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotMessage<'a> {
    pub kind: &'static str,
    #[serde(flatten)]
    pub snapshot: &'a Snapshot,
}

#[derive(Debug, Clone)]
pub struct BroadcastSink {
    tx: broadcast::Sender<String>,
    last_snapshot: Option<Snapshot>,
}

impl BroadcastSink {
    /// Create a new broadcaster with the given channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            last_snapshot: None,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Send any serializable payload to all subscribers
    pub fn broadcast<T: Serialize>(&self, msg: &T) {
        if let Ok(json) = serde_json::to_string(msg) {
            // No receivers is fine
            let _ = self.tx.send(json);
        }
    }
}

impl EventSink for BroadcastSink {
    fn publish(&mut self, at_ms: u64, event: &SimEvent) {
        self.broadcast(&Envelope { at_ms, event });
    }

    fn on_step(&mut self, _now_ms: u64, snapshot: &Snapshot) {
        if let Some(last) = &self.last_snapshot {
            if last.same_state(snapshot) {
                return;
            }
        }
        self.broadcast(&SnapshotMessage {
            kind: SNAPSHOT_KIND,
            snapshot,
        });
        self.last_snapshot = Some(snapshot.clone());
    }
}
