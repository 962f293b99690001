//! Graph evolver: appends input facts and judges each against its
//! predecessor, growing one meta node per step.

use crate::evaluator::Evaluator;
use crate::graph::GraphStore;
use crate::journal::AuditLog;
use crate::ledger::TrustLedger;
use crate::source::ValueSource;
use reflexive_core::{ContradictionEntry, MemoryEntry, NodeId, NodeKind, Result, TrustKey};
use tracing::debug;

/// Trust delta applied after every judgment.
pub const DEFAULT_TRUST_STEP: f64 = 0.05;

#[derive(Debug, Clone, Copy)]
pub struct Evolver {
    pub evaluator: Evaluator,
    pub trust_step: f64,
}

impl Default for Evolver {
    fn default() -> Self {
        Self {
            evaluator: Evaluator::default(),
            trust_step: DEFAULT_TRUST_STEP,
        }
    }
}

/// Nodes created by one `evolve` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Growth {
    pub inputs: Vec<NodeId>,
    pub metas: Vec<NodeId>,
}

impl Evolver {
    pub fn new(evaluator: Evaluator, trust_step: f64) -> Self {
        Self {
            evaluator,
            trust_step,
        }
    }

    /// Run `steps` evolution steps, continuing after the highest existing
    /// input index.
    pub fn evolve(
        &self,
        graph: &mut GraphStore,
        ledger: &mut TrustLedger,
        contradictions: &mut Vec<ContradictionEntry>,
        memory: &mut AuditLog<MemoryEntry>,
        source: &mut dyn ValueSource,
        steps: usize,
    ) -> Result<Growth> {
        let mut growth = Growth::default();
        let start = graph.next_index(NodeKind::Input);

        for index in start..start + steps as u64 {
            let prev = NodeId::input(index.saturating_sub(1));
            let prev_value = graph.require_value(prev)?;

            let next = NodeId::input(index);
            let next_value = source.next_value();
            graph.add_node(next, NodeKind::Input, next_value)?;

            let key = TrustKey(prev_value, next_value);
            let bias = ledger.bias(key);
            let verdict = self
                .evaluator
                .evaluate(prev_value, next_value, bias, contradictions);
            memory.push(MemoryEntry {
                first: prev,
                second: next,
                key,
                verdict,
            });

            let delta = if verdict {
                self.trust_step
            } else {
                -self.trust_step
            };
            let weight = ledger.adjust(key, delta);

            let meta = NodeId::meta(graph.next_index(NodeKind::Meta));
            graph.add_node(meta, NodeKind::Meta, verdict)?;
            graph.add_edge(prev, meta, weight)?;
            graph.add_edge(next, meta, weight)?;
            debug!(%prev, %next, %meta, %key, verdict, weight, "judged pair");

            growth.inputs.push(next);
            growth.metas.push(meta);
        }

        Ok(growth)
    }
}
