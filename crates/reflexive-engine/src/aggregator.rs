//! Meta aggregator: folds fixed-size clusters of meta verdicts into
//! meta-meta consensus nodes.
//!
//! Only unconsumed meta nodes are clustered. A trailing partial group waits
//! for later cycles instead of being padded, and a meta node is never folded
//! into more than one consensus.

use crate::graph::GraphStore;
use reflexive_core::{Error, NodeId, NodeKind, Result, DEFAULT_EDGE_WEIGHT};
use std::collections::HashSet;
use tracing::debug;

pub const DEFAULT_CLUSTER_SIZE: usize = 3;

#[derive(Debug, Clone, Copy)]
pub struct Aggregator {
    pub cluster_size: usize,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self {
            cluster_size: DEFAULT_CLUSTER_SIZE,
        }
    }
}

/// Strict majority: more than half of `values` are `true`.
pub fn majority(values: &[bool]) -> bool {
    let trues = values.iter().filter(|v| **v).count();
    trues * 2 > values.len()
}

impl Aggregator {
    pub fn new(cluster_size: usize) -> Self {
        Self { cluster_size }
    }

    /// Create one meta-meta node per complete group of unconsumed meta nodes.
    ///
    /// Returns `Error::EmptyCluster` when not a single group is complete;
    /// callers treat that as "nothing to do yet".
    pub fn aggregate(
        &self,
        graph: &mut GraphStore,
        consumed: &mut HashSet<NodeId>,
    ) -> Result<Vec<NodeId>> {
        if self.cluster_size == 0 {
            return Err(Error::config("cluster_size must be at least 1"));
        }

        let mut pending: Vec<NodeId> = graph
            .nodes_of_kind(NodeKind::Meta)
            .map(|n| n.id)
            .filter(|id| !consumed.contains(id))
            .collect();
        pending.sort_by_key(|id| id.index);

        let groups = pending.len() / self.cluster_size;
        if groups == 0 {
            return Err(Error::empty_cluster(pending.len(), self.cluster_size));
        }

        let mut created = Vec::with_capacity(groups);
        for group in pending.chunks_exact(self.cluster_size) {
            let values = group
                .iter()
                .map(|id| graph.require_value(*id))
                .collect::<Result<Vec<_>>>()?;
            let consensus = majority(&values);

            let node = NodeId::meta_meta(graph.next_index(NodeKind::MetaMeta));
            graph.add_node(node, NodeKind::MetaMeta, consensus)?;
            for member in group {
                graph.add_edge(*member, node, DEFAULT_EDGE_WEIGHT)?;
                consumed.insert(*member);
            }
            debug!(%node, consensus, members = group.len(), "consensus formed");
            created.push(node);
        }

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with_metas(values: &[bool]) -> GraphStore {
        let mut g = GraphStore::new();
        for (i, v) in values.iter().enumerate() {
            g.add_node(NodeId::meta(i as u64), NodeKind::Meta, *v).unwrap();
        }
        g
    }

    #[test]
    fn majority_of_three() {
        assert!(majority(&[true, true, false]));
        assert!(!majority(&[true, false, false]));
        assert!(majority(&[true, true, true]));
        assert!(!majority(&[false, false, false]));
    }

    #[test]
    fn even_split_is_not_a_majority() {
        assert!(!majority(&[true, false]));
        assert!(!majority(&[true, true, false, false]));
        assert!(majority(&[true, true, true, false]));
    }

    #[test]
    fn two_of_three_true_yields_true_consensus() {
        let mut g = graph_with_metas(&[true, true, false]);
        let mut consumed = HashSet::new();
        let created = Aggregator::new(3).aggregate(&mut g, &mut consumed).unwrap();
        assert_eq!(created, vec![NodeId::meta_meta(0)]);
        assert_eq!(g.value(NodeId::meta_meta(0)), Some(true));
        for i in 0..3 {
            assert_eq!(g.weight(NodeId::meta(i), NodeId::meta_meta(0)), Some(1.0));
        }
    }

    #[test]
    fn one_of_three_true_yields_false_consensus() {
        let mut g = graph_with_metas(&[true, false, false]);
        let mut consumed = HashSet::new();
        Aggregator::new(3).aggregate(&mut g, &mut consumed).unwrap();
        assert_eq!(g.value(NodeId::meta_meta(0)), Some(false));
    }

    #[test]
    fn partial_group_waits_and_is_not_padded() {
        let mut g = graph_with_metas(&[true, true, true, false, false]);
        let mut consumed = HashSet::new();
        let agg = Aggregator::new(3);
        let created = agg.aggregate(&mut g, &mut consumed).unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(consumed.len(), 3);

        // M3, M4 pending; nothing complete yet
        let err = agg.aggregate(&mut g, &mut consumed).unwrap_err();
        assert!(matches!(
            err,
            Error::EmptyCluster {
                pending: 2,
                cluster_size: 3
            }
        ));

        // One more meta completes the second group
        g.add_node(NodeId::meta(5), NodeKind::Meta, false).unwrap();
        let created = agg.aggregate(&mut g, &mut consumed).unwrap();
        assert_eq!(created, vec![NodeId::meta_meta(1)]);
        let members: Vec<_> = g.predecessors(NodeId::meta_meta(1)).collect();
        assert_eq!(members, vec![NodeId::meta(3), NodeId::meta(4), NodeId::meta(5)]);
        assert_eq!(g.count(NodeKind::MetaMeta), 2);
    }

    #[test]
    fn zero_cluster_size_is_a_config_error() {
        let mut g = graph_with_metas(&[true]);
        let err = Aggregator::new(0)
            .aggregate(&mut g, &mut HashSet::new())
            .unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }
}
