//! Value sources for new input facts.
//!
//! The evolver never draws randomness itself; it asks a `ValueSource`. Runs
//! are reproducible from a seed, and tests replay fixed sequences.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait ValueSource {
    fn next_value(&mut self) -> bool;
}

/// Fair coin backed by a seeded `StdRng`.
#[derive(Debug, Clone)]
pub struct SeededSource {
    rng: StdRng,
    seed: u64,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed drawn from the thread RNG. The chosen seed is available via
    /// `seed()` so the run can be replayed.
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().gen())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl ValueSource for SeededSource {
    fn next_value(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }
}

/// Replays a fixed sequence, wrapping around when exhausted.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<bool>,
    cursor: usize,
}

impl SequenceSource {
    /// An empty sequence yields `false` forever.
    pub fn new(values: impl Into<Vec<bool>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// Build from 0/1 digits; any non-zero value counts as `true`.
    pub fn from_bits(bits: &[u8]) -> Self {
        Self::new(bits.iter().map(|b| *b != 0).collect::<Vec<_>>())
    }

    /// Number of values drawn so far.
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl ValueSource for SequenceSource {
    fn next_value(&mut self) -> bool {
        if self.values.is_empty() {
            return false;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
