//! Mutable state threaded through every cycle.
//!
//! The driver owns one `ReflexiveState` and lends its parts to each component
//! by `&mut`; nothing here is global.

use crate::graph::GraphStore;
use crate::journal::{AuditConfig, Journal};
use crate::ledger::TrustLedger;
use crate::source::ValueSource;
use reflexive_core::{ContradictionEntry, NodeId, NodeKind, Result, DEFAULT_EDGE_WEIGHT};
use std::collections::HashSet;
use tracing::info;

/// Index of the first seed input. The seed meta node is `M0`.
pub const FIRST_INPUT_INDEX: u64 = 1;

#[derive(Debug, Clone, Default)]
pub struct ReflexiveState {
    pub graph: GraphStore,
    pub ledger: TrustLedger,
    /// Contradictions raised this cycle, drained by the restructurer.
    pub contradictions: Vec<ContradictionEntry>,
    pub journal: Journal,
    /// Meta nodes already folded into a meta-meta node.
    pub consumed: HashSet<NodeId>,
}

impl ReflexiveState {
    /// Two seed inputs `I1`, `I2` and a seed meta `M0` holding their raw
    /// equality. No bias is applied at seeding.
    pub fn seed(first: bool, second: bool, audit: &AuditConfig) -> Result<Self> {
        let mut graph = GraphStore::new();
        let i1 = NodeId::input(FIRST_INPUT_INDEX);
        let i2 = NodeId::input(FIRST_INPUT_INDEX + 1);
        let m0 = NodeId::meta(0);

        graph.add_node(i1, NodeKind::Input, first)?;
        graph.add_node(i2, NodeKind::Input, second)?;
        graph.add_node(m0, NodeKind::Meta, first == second)?;
        graph.add_edge(i1, m0, DEFAULT_EDGE_WEIGHT)?;
        graph.add_edge(i2, m0, DEFAULT_EDGE_WEIGHT)?;

        Ok(Self {
            graph,
            journal: Journal::new(audit),
            ..Self::default()
        })
    }

    /// Seed with input values drawn from `source`.
    pub fn seed_from(source: &mut dyn ValueSource, audit: &AuditConfig) -> Result<Self> {
        let first = source.next_value();
        let second = source.next_value();
        Self::seed(first, second, audit)
    }

    /// Resume from a previously exported graph.
    ///
    /// The ledger restarts at defaults (it is not part of the tables). Meta
    /// nodes with an edge into a meta-meta node count as consumed; a cluster
    /// whose edges were all pruned before export cannot be recovered and
    /// becomes eligible again.
    pub fn resume(graph: GraphStore, audit: &AuditConfig) -> Self {
        let consumed: HashSet<NodeId> = graph
            .nodes_of_kind(NodeKind::Meta)
            .map(|n| n.id)
            .filter(|id| graph.successors(*id).any(|s| s.kind == NodeKind::MetaMeta))
            .collect();
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            consumed = consumed.len(),
            "Resuming from existing graph"
        );
        Self {
            graph,
            ledger: TrustLedger::new(),
            contradictions: Vec::new(),
            journal: Journal::new(audit),
            consumed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_builds_two_inputs_and_one_meta() {
        let state = ReflexiveState::seed(true, false, &AuditConfig::default()).unwrap();
        let g = &state.graph;
        assert_eq!(g.count(NodeKind::Input), 2);
        assert_eq!(g.count(NodeKind::Meta), 1);
        assert_eq!(g.value(NodeId::meta(0)), Some(false));
        assert_eq!(g.weight(NodeId::input(1), NodeId::meta(0)), Some(1.0));
        assert_eq!(g.weight(NodeId::input(2), NodeId::meta(0)), Some(1.0));
        assert!(state.ledger.is_empty());
        assert!(state.consumed.is_empty());
    }

    #[test]
    fn seed_meta_is_raw_equality() {
        let state = ReflexiveState::seed(false, false, &AuditConfig::default()).unwrap();
        assert_eq!(state.graph.value(NodeId::meta(0)), Some(true));
    }

    #[test]
    fn resume_marks_clustered_metas_consumed() {
        let mut state = ReflexiveState::seed(true, true, &AuditConfig::default()).unwrap();
        let g = &mut state.graph;
        g.add_node(NodeId::meta(1), NodeKind::Meta, true).unwrap();
        g.add_node(NodeId::meta_meta(0), NodeKind::MetaMeta, true).unwrap();
        g.add_edge(NodeId::meta(0), NodeId::meta_meta(0), 1.0).unwrap();

        let resumed = ReflexiveState::resume(state.graph, &AuditConfig::default());
        assert!(resumed.consumed.contains(&NodeId::meta(0)));
        assert!(!resumed.consumed.contains(&NodeId::meta(1)));
    }
}
