//! Notification feed and toast stack

use serde::Serialize;
use std::collections::VecDeque;

/// One row in the notification carousel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub address: String,
    pub meta: String,
    pub at_ms: u64,
}

/// Bounded notification list, oldest evicted first
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationFeed {
    items: VecDeque<Notification>,
    max_visible: usize,
    /// Every notification ever pushed, including evicted ones
    total: u64,
    last_at_ms: Option<u64>,
}

impl NotificationFeed {
    pub fn new(max_visible: usize) -> Self {
        let max_visible = max_visible.max(1);
        Self {
            items: VecDeque::with_capacity(max_visible),
            max_visible,
            total: 0,
            last_at_ms: None,
        }
    }

    pub fn push(&mut self, address: String, meta: impl Into<String>, at_ms: u64) {
        self.items.push_back(Notification {
            address,
            meta: meta.into(),
            at_ms,
        });
        while self.items.len() > self.max_visible {
            self.items.pop_front();
        }
        self.total += 1;
        self.last_at_ms = Some(at_ms);
    }

    /// Visible rows, oldest first
    pub fn items(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.items.back()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn last_at_ms(&self) -> Option<u64> {
        self.last_at_ms
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub title: String,
    pub body: String,
    pub shown_at_ms: u64,
    pub expires_at_ms: u64,
}

/// Transient toasts, newest first
#[derive(Debug, Clone, Default, Serialize)]
pub struct ToastStack {
    toasts: VecDeque<Toast>,
}

impl ToastStack {
    pub fn push(
        &mut self,
        title: impl Into<String>,
        body: impl Into<String>,
        at_ms: u64,
        lifetime_ms: u64,
    ) {
        self.toasts.push_front(Toast {
            title: title.into(),
            body: body.into(),
            shown_at_ms: at_ms,
            expires_at_ms: at_ms.saturating_add(lifetime_ms),
        });
    }

    /// Drop toasts whose lifetime ended at or before `now_ms`
    pub fn prune(&mut self, now_ms: u64) -> usize {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.expires_at_ms > now_ms);
        before - self.toasts.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn newest(&self) -> Option<&Toast> {
        self.toasts.front()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_evicts_oldest_and_counts_total() {
        let mut feed = NotificationFeed::new(3);
        for i in 0..5 {
            feed.push(format!("user{i}@gmail.com"), "mirrored activity", i * 100);
        }
        assert_eq!(feed.len(), 3);
        assert_eq!(feed.total(), 5);
        assert_eq!(feed.items().next().unwrap().address, "user2@gmail.com");
        assert_eq!(feed.latest().unwrap().at_ms, 400);
        assert_eq!(feed.last_at_ms(), Some(400));
    }

    #[test]
    fn test_toasts_newest_first_and_expire() {
        let mut toasts = ToastStack::default();
        toasts.push("BUY executed", "Price 1.07500 • Mirrored", 0, 4200);
        toasts.push("Feed paused", "Live updates paused", 1000, 6200);
        assert_eq!(toasts.newest().unwrap().title, "Feed paused");

        assert_eq!(toasts.prune(4199), 0);
        assert_eq!(toasts.prune(4200), 1);
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts.prune(7200), 1);
        assert!(toasts.is_empty());
    }
}
