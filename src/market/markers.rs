//! Trade Marker Store
//!
//! Bounded FIFO of simulated executions drawn over the chart.

use std::collections::VecDeque;

use crate::random::RandomSource;
use crate::types::{Bar, Marker, Side};

/// Execution markers, oldest evicted first once `capacity` is exceeded
#[derive(Debug, Clone)]
pub struct MarkerStore {
    markers: VecDeque<Marker>,
    capacity: usize,
}

impl MarkerStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            markers: VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
        }
    }

    /// With `probability`, mark an execution at the bar's time and close
    pub fn maybe_emit<R: RandomSource>(
        &mut self,
        bar: &Bar,
        probability: f64,
        rng: &mut R,
    ) -> Option<Marker> {
        if !rng.chance(probability) {
            return None;
        }
        let side = if rng.next_unit() > 0.5 { Side::Buy } else { Side::Sell };
        let marker = Marker {
            time: bar.time,
            price: bar.close,
            side,
        };
        self.push(marker);
        Some(marker)
    }

    pub fn push(&mut self, marker: Marker) {
        self.markers.push_back(marker);
        while self.markers.len() > self.capacity {
            self.markers.pop_front();
        }
    }

    /// Drop every marker (their timestamps go stale on instrument switch)
    pub fn clear(&mut self) {
        self.markers.clear();
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;

    fn bar(time: i64, close: f64) -> Bar {
        Bar {
            time,
            open: close,
            high: close,
            low: close,
            close,
        }
    }

    #[test]
    fn test_emit_respects_probability() {
        let mut store = MarkerStore::new(10);
        // 0.5 >= 0.22: rejected
        let mut rng = ScriptedRandom::constant(0.5);
        assert!(store.maybe_emit(&bar(60, 1.1), 0.22, &mut rng).is_none());
        assert!(store.is_empty());

        // accept, then 0.9 > 0.5 picks buy
        let mut rng = ScriptedRandom::new(vec![0.1, 0.9]);
        let marker = store.maybe_emit(&bar(120, 1.2), 0.22, &mut rng).unwrap();
        assert_eq!(marker.side, Side::Buy);
        assert_eq!(marker.time, 120);
        assert_eq!(marker.price, 1.2);

        let mut rng = ScriptedRandom::new(vec![0.1, 0.2]);
        let marker = store.maybe_emit(&bar(180, 1.3), 0.22, &mut rng).unwrap();
        assert_eq!(marker.side, Side::Sell);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_fifo_eviction_keeps_last_cap() {
        let cap = 200;
        let extra = 37;
        let mut store = MarkerStore::new(cap);
        for i in 0..(cap + extra) {
            store.push(Marker {
                time: i as i64,
                price: 1.0,
                side: Side::Buy,
            });
            assert!(store.len() <= cap);
        }
        let times: Vec<i64> = store.iter().map(|m| m.time).collect();
        let expected: Vec<i64> = (extra..cap + extra).map(|i| i as i64).collect();
        assert_eq!(times, expected);
    }

    #[test]
    fn test_clear() {
        let mut store = MarkerStore::new(4);
        store.push(Marker {
            time: 1,
            price: 1.0,
            side: Side::Sell,
        });
        store.clear();
        assert!(store.is_empty());
    }
}
