//! Bounded bar series
//!
//! Append-only history with a retention cap; only the last bar is mutable.

use serde::Serialize;

use crate::types::Bar;

/// Ordered bars, oldest first, trimmed from the front past `capacity`
#[derive(Debug, Clone, Serialize)]
pub struct Series {
    bars: Vec<Bar>,
    capacity: usize,
}

impl Series {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            bars: Vec::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Append a sealed bar and trim the oldest ones past capacity
    pub fn push(&mut self, bar: Bar) {
        self.bars.push(bar);
        if self.bars.len() > self.capacity {
            let excess = self.bars.len() - self.capacity;
            self.bars.drain(..excess);
        }
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// The live (still forming) bar
    pub(crate) fn last_mut(&mut self) -> Option<&mut Bar> {
        self.bars.last_mut()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Suffix view of at most `n` bars
    pub fn visible(&self, n: usize) -> &[Bar] {
        let start = self.bars.len().saturating_sub(n);
        &self.bars[start..]
    }
}
