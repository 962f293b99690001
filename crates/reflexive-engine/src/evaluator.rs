//! Consistency evaluator: raw equality, possibly inverted by trust bias.

use reflexive_core::{ContradictionEntry, TrustKey};
use tracing::debug;

/// Bias below which the naive equality verdict is inverted.
pub const DEFAULT_MIDPOINT: f64 = 0.5;

#[derive(Debug, Clone, Copy)]
pub struct Evaluator {
    pub midpoint: f64,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self {
            midpoint: DEFAULT_MIDPOINT,
        }
    }
}

impl Evaluator {
    pub fn new(midpoint: f64) -> Self {
        Self { midpoint }
    }

    /// Judge whether `a` and `b` are consistent under `bias`.
    ///
    /// A bias at or above the midpoint keeps the raw verdict; below it the
    /// verdict is flipped and a contradiction is pushed onto `buffer`. The
    /// ledger itself is not touched.
    pub fn evaluate(
        &self,
        a: bool,
        b: bool,
        bias: f64,
        buffer: &mut Vec<ContradictionEntry>,
    ) -> bool {
        let pair = TrustKey(a, b);
        let raw = pair.raw_consistency();
        let verdict = if bias >= self.midpoint { raw } else { !raw };
        if verdict != raw {
            debug!(a, b, bias, "bias inverted consistency verdict");
            buffer.push(ContradictionEntry {
                pair,
                expected: raw,
                evaluated: verdict,
            });
        }
        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trusted_bias_keeps_raw_verdict() {
        let eval = Evaluator::default();
        let mut buffer = Vec::new();
        assert!(eval.evaluate(true, true, 1.0, &mut buffer));
        assert!(!eval.evaluate(true, false, 0.5, &mut buffer));
        assert!(buffer.is_empty());
    }

    #[test]
    fn low_bias_inverts_and_records() {
        let eval = Evaluator::default();
        let mut buffer = Vec::new();
        assert!(!eval.evaluate(false, false, 0.45, &mut buffer));
        assert!(eval.evaluate(true, false, 0.0, &mut buffer));
        assert_eq!(
            buffer,
            vec![
                ContradictionEntry {
                    pair: TrustKey(false, false),
                    expected: true,
                    evaluated: false,
                },
                ContradictionEntry {
                    pair: TrustKey(true, false),
                    expected: false,
                    evaluated: true,
                },
            ]
        );
    }
}
