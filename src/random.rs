//! Injectable randomness
//!
//! Every random draw in the simulation goes through [`RandomSource`], so a
//! seeded `StdRng` (or a scripted sequence in tests) reproduces a session
//! exactly.

use rand::{Rng, RngCore};

/// Uniform random source over `[0, 1)`
pub trait RandomSource {
    /// Next uniform sample in `[0, 1)`
    fn next_unit(&mut self) -> f64;

    /// Uniform sample in `[lo, hi)`
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_unit() * (hi - lo)
    }

    /// Symmetric sample in `[-width/2, width/2)`
    fn centered(&mut self, width: f64) -> f64 {
        (self.next_unit() - 0.5) * width
    }

    /// True with probability `p`
    fn chance(&mut self, p: f64) -> bool {
        self.next_unit() < p
    }

    /// Uniform index into a collection of `len` items (`len` must be non-zero)
    fn index(&mut self, len: usize) -> usize {
        ((self.next_unit() * len as f64) as usize).min(len.saturating_sub(1))
    }
}

impl<R: RngCore> RandomSource for R {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Replays a fixed list of samples, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: Vec<f64>) -> Self {
        let values = if values.is_empty() { vec![0.5] } else { values };
        Self { values, cursor: 0 }
    }

    /// Always returns the same sample
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Number of samples drawn so far
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f64 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
