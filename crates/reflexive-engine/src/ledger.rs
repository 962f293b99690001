//! Trust ledger: bounded bias per ordered value pair.
//!
//! Keys are self-initializing: the first lookup registers the key at the
//! default weight, so a lookup can never fail.

use reflexive_core::TrustKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_TRUST: f64 = 1.0;
pub const MIN_TRUST: f64 = 0.0;
pub const MAX_TRUST: f64 = 1.0;

/// One registered key, as reported in run summaries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrustEntry {
    pub key: TrustKey,
    pub weight: f64,
}

#[derive(Debug, Clone, Default)]
pub struct TrustLedger {
    weights: BTreeMap<TrustKey, f64>,
}

impl TrustLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current bias for `key`, registering it at the default on first access.
    pub fn bias(&mut self, key: TrustKey) -> f64 {
        *self.weights.entry(key).or_insert(DEFAULT_TRUST)
    }

    /// Read a bias without registering the key.
    pub fn peek(&self, key: TrustKey) -> f64 {
        self.weights.get(&key).copied().unwrap_or(DEFAULT_TRUST)
    }

    /// Add `delta` to the bias for `key` and clamp into `[0.0, 1.0]`.
    pub fn adjust(&mut self, key: TrustKey, delta: f64) -> f64 {
        let weight = self.weights.entry(key).or_insert(DEFAULT_TRUST);
        *weight = (*weight + delta).clamp(MIN_TRUST, MAX_TRUST);
        *weight
    }

    pub fn contains(&self, key: TrustKey) -> bool {
        self.weights.contains_key(&key)
    }

    /// Registered keys and their weights, in key order.
    pub fn entries(&self) -> impl Iterator<Item = (TrustKey, f64)> + '_ {
        self.weights.iter().map(|(k, w)| (*k, *w))
    }

    pub fn snapshot(&self) -> Vec<TrustEntry> {
        self.entries()
            .map(|(key, weight)| TrustEntry { key, weight })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_lookup_registers_default() {
        let mut ledger = TrustLedger::new();
        let key = TrustKey(true, false);
        assert!(!ledger.contains(key));
        assert_eq!(ledger.bias(key), 1.0);
        assert!(ledger.contains(key));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn peek_does_not_register() {
        let ledger = TrustLedger::new();
        assert_eq!(ledger.peek(TrustKey(false, false)), 1.0);
        assert!(ledger.is_empty());
    }

    #[test]
    fn adjust_clamps_both_ends() {
        let mut ledger = TrustLedger::new();
        let key = TrustKey(false, true);
        assert_eq!(ledger.adjust(key, 0.3), 1.0);
        assert_eq!(ledger.adjust(key, -5.0), 0.0);
        assert!((ledger.adjust(key, 0.05) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn any_adjustment_sequence_stays_in_bounds() {
        let mut ledger = TrustLedger::new();
        let keys = [
            TrustKey(true, true),
            TrustKey(true, false),
            TrustKey(false, true),
            TrustKey(false, false),
        ];
        let deltas = [0.05, -0.05, -0.7, 0.33, -1.2, 2.5, -0.05, 0.0, -0.49];
        for (i, delta) in deltas.iter().cycle().take(200).enumerate() {
            let key = keys[i % keys.len()];
            let w = ledger.adjust(key, *delta * (1.0 + (i % 7) as f64));
            assert!((0.0..=1.0).contains(&w), "weight {w} escaped bounds");
        }
        for (_, w) in ledger.entries() {
            assert!((0.0..=1.0).contains(&w));
        }
    }
}
