//! Notification/Toast UI
//!
//! Implements:
//! - Masked synthetic email addresses
//! - Bounded notification feed and expiring toasts
//! - Dashboard sink mapping core events to user-facing texts
//! - JSON broadcast of raw events for external UIs

mod broadcast;
mod dashboard;
mod email;
mod feed;

pub use broadcast::{BroadcastSink, Envelope, SnapshotMessage};
pub use dashboard::Dashboard;
pub use email::{mask_local_part, synthetic_address, DOMAINS, FIRST_NAMES};
pub use feed::{Notification, NotificationFeed, Toast, ToastStack};
