//! Contradiction restructurer: decays edges matching the value pattern of
//! each contradiction, pruning those that fall below the floor.
//!
//! Matching is by endpoint values, not identity: a contradiction on
//! `(true, false)` erodes every `true -> false` edge in the graph.

use crate::graph::GraphStore;
use crate::journal::AuditLog;
use reflexive_core::{ContradictionEntry, NodeId};
use tracing::debug;

pub const DEFAULT_DECAY: f64 = 0.8;
pub const DEFAULT_PRUNE_BELOW: f64 = 0.2;

#[derive(Debug, Clone, Copy)]
pub struct Restructurer {
    pub decay: f64,
    pub prune_below: f64,
}

impl Default for Restructurer {
    fn default() -> Self {
        Self {
            decay: DEFAULT_DECAY,
            prune_below: DEFAULT_PRUNE_BELOW,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestructureStats {
    pub contradictions: usize,
    pub edges_decayed: usize,
    pub edges_pruned: usize,
}

impl Restructurer {
    /// Apply every buffered contradiction, then drain the buffer into
    /// `history`. An empty buffer leaves the graph untouched.
    pub fn restructure(
        &self,
        graph: &mut GraphStore,
        buffer: &mut Vec<ContradictionEntry>,
        history: &mut AuditLog<ContradictionEntry>,
    ) -> RestructureStats {
        let mut stats = RestructureStats::default();

        for entry in buffer.iter() {
            let (u_val, v_val) = (entry.pair.0, entry.pair.1);
            let matching: Vec<(NodeId, NodeId, f64)> = graph
                .edges()
                .filter(|e| {
                    graph.value(e.source) == Some(u_val) && graph.value(e.target) == Some(v_val)
                })
                .map(|e| (e.source, e.target, e.weight))
                .collect();

            for (source, target, weight) in matching {
                let decayed = weight * self.decay;
                if decayed < self.prune_below {
                    graph.remove_edge(source, target);
                    stats.edges_pruned += 1;
                } else {
                    graph.set_weight(source, target, decayed);
                    stats.edges_decayed += 1;
                }
            }
            stats.contradictions += 1;
            debug!(pair = %entry.pair, "contradiction applied");
        }

        history.extend(buffer.drain(..));
        stats
    }
}
