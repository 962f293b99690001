//! Graph store: typed, valued nodes joined by weighted directed edges.
//!
//! Nodes and edges iterate in insertion order so audits and table exports are
//! reproducible. At most one edge exists per ordered pair; re-adding an edge
//! overwrites its weight in place.

use reflexive_core::{Edge, Error, Node, NodeId, NodeKind, Result};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

#[derive(Debug, Default, Clone)]
pub struct GraphStore {
    nodes: Vec<Node>,
    positions: HashMap<NodeId, usize>,
    /// Edges keyed by insertion sequence number.
    edges: BTreeMap<u64, Edge>,
    edge_seq: HashMap<(NodeId, NodeId), u64>,
    incoming: HashMap<NodeId, Vec<NodeId>>,
    outgoing: HashMap<NodeId, Vec<NodeId>>,
    next_seq: u64,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Nodes
    // -----------------------------------------------------------------------

    pub fn add_node(&mut self, id: NodeId, kind: NodeKind, value: bool) -> Result<()> {
        if id.kind != kind {
            return Err(Error::KindMismatch {
                id,
                declared: kind,
                actual: id.kind,
            });
        }
        if self.positions.contains_key(&id) {
            return Err(Error::DuplicateId(id));
        }
        self.positions.insert(id, self.nodes.len());
        self.nodes.push(Node { id, value });
        debug!(node = %id, value, "node added");
        Ok(())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.positions.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.positions.get(&id).map(|&pos| &self.nodes[pos])
    }

    pub fn value(&self, id: NodeId) -> Option<bool> {
        self.node(id).map(|n| n.value)
    }

    /// Value of a node that must exist.
    pub fn require_value(&self, id: NodeId) -> Result<bool> {
        self.value(id).ok_or(Error::UnknownNode(id))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter()
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter().filter(move |n| n.kind() == kind)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn count(&self, kind: NodeKind) -> usize {
        self.nodes_of_kind(kind).count()
    }

    pub fn max_index(&self, kind: NodeKind) -> Option<u64> {
        self.nodes_of_kind(kind).map(|n| n.id.index).max()
    }

    /// First unused index for `kind`: one past the highest existing index.
    pub fn next_index(&self, kind: NodeKind) -> u64 {
        self.max_index(kind).map_or(0, |max| max + 1)
    }

    // -----------------------------------------------------------------------
    // Edges
    // -----------------------------------------------------------------------

    pub fn add_edge(&mut self, source: NodeId, target: NodeId, weight: f64) -> Result<()> {
        for endpoint in [source, target] {
            if !self.contains(endpoint) {
                return Err(Error::UnknownNode(endpoint));
            }
        }

        if let Some(seq) = self.edge_seq.get(&(source, target)) {
            if let Some(edge) = self.edges.get_mut(seq) {
                edge.weight = weight;
            }
            return Ok(());
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.edges.insert(
            seq,
            Edge {
                source,
                target,
                weight,
            },
        );
        self.edge_seq.insert((source, target), seq);
        self.outgoing.entry(source).or_default().push(target);
        self.incoming.entry(target).or_default().push(source);
        Ok(())
    }

    /// Remove the edge `source -> target`. Absent edges are ignored.
    pub fn remove_edge(&mut self, source: NodeId, target: NodeId) -> Option<Edge> {
        let seq = self.edge_seq.remove(&(source, target))?;
        let edge = self.edges.remove(&seq);
        if let Some(targets) = self.outgoing.get_mut(&source) {
            targets.retain(|t| *t != target);
        }
        if let Some(sources) = self.incoming.get_mut(&target) {
            sources.retain(|s| *s != source);
        }
        debug!(%source, %target, "edge removed");
        edge
    }

    pub fn has_edge(&self, source: NodeId, target: NodeId) -> bool {
        self.edge_seq.contains_key(&(source, target))
    }

    pub fn edge(&self, source: NodeId, target: NodeId) -> Option<&Edge> {
        self.edge_seq
            .get(&(source, target))
            .and_then(|seq| self.edges.get(seq))
    }

    pub fn weight(&self, source: NodeId, target: NodeId) -> Option<f64> {
        self.edge(source, target).map(|e| e.weight)
    }

    /// Overwrite the weight of an existing edge. Returns false if there is no
    /// such edge.
    pub fn set_weight(&mut self, source: NodeId, target: NodeId, weight: f64) -> bool {
        let Some(seq) = self.edge_seq.get(&(source, target)) else {
            return false;
        };
        match self.edges.get_mut(seq) {
            Some(edge) => {
                edge.weight = weight;
                true
            }
            None => false,
        }
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.values()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Direct in-neighbours of `target`, in edge insertion order.
    pub fn predecessors(&self, target: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.incoming.get(&target).into_iter().flatten().copied()
    }

    /// Direct out-neighbours of `source`, in edge insertion order.
    pub fn successors(&self, source: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.outgoing.get(&source).into_iter().flatten().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_inputs() -> GraphStore {
        let mut g = GraphStore::new();
        g.add_node(NodeId::input(1), NodeKind::Input, true).unwrap();
        g.add_node(NodeId::input(2), NodeKind::Input, false).unwrap();
        g
    }

    #[test]
    fn duplicate_node_is_rejected() {
        let mut g = two_inputs();
        let err = g.add_node(NodeId::input(1), NodeKind::Input, false).unwrap_err();
        assert!(matches!(err, Error::DuplicateId(id) if id == NodeId::input(1)));
        // Original value untouched
        assert_eq!(g.value(NodeId::input(1)), Some(true));
    }

    #[test]
    fn kind_must_match_id() {
        let mut g = GraphStore::new();
        let err = g.add_node(NodeId::meta(0), NodeKind::Input, true).unwrap_err();
        assert!(matches!(err, Error::KindMismatch { .. }));
        assert_eq!(g.node_count(), 0);
    }

    #[test]
    fn edge_to_missing_node_is_rejected() {
        let mut g = two_inputs();
        let err = g.add_edge(NodeId::input(1), NodeId::meta(0), 1.0).unwrap_err();
        assert!(matches!(err, Error::UnknownNode(id) if id == NodeId::meta(0)));
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn re_adding_edge_overwrites_in_place() {
        let mut g = two_inputs();
        g.add_node(NodeId::meta(0), NodeKind::Meta, false).unwrap();
        g.add_edge(NodeId::input(1), NodeId::meta(0), 1.0).unwrap();
        g.add_edge(NodeId::input(2), NodeId::meta(0), 1.0).unwrap();
        g.add_edge(NodeId::input(1), NodeId::meta(0), 0.4).unwrap();

        assert_eq!(g.edge_count(), 2);
        let order: Vec<_> = g.edges().map(|e| (e.source, e.weight)).collect();
        assert_eq!(order, vec![(NodeId::input(1), 0.4), (NodeId::input(2), 1.0)]);
        assert_eq!(g.predecessors(NodeId::meta(0)).count(), 2);
    }

    #[test]
    fn remove_edge_is_noop_when_absent() {
        let mut g = two_inputs();
        assert!(g.remove_edge(NodeId::input(1), NodeId::input(2)).is_none());
        g.add_edge(NodeId::input(1), NodeId::input(2), 0.5).unwrap();
        assert!(g.remove_edge(NodeId::input(1), NodeId::input(2)).is_some());
        assert!(!g.has_edge(NodeId::input(1), NodeId::input(2)));
        assert_eq!(g.predecessors(NodeId::input(2)).count(), 0);
        assert_eq!(g.successors(NodeId::input(1)).count(), 0);
    }

    #[test]
    fn predecessors_are_restartable() {
        let mut g = two_inputs();
        g.add_node(NodeId::meta(0), NodeKind::Meta, false).unwrap();
        g.add_edge(NodeId::input(2), NodeId::meta(0), 1.0).unwrap();
        g.add_edge(NodeId::input(1), NodeId::meta(0), 1.0).unwrap();

        let first: Vec<_> = g.predecessors(NodeId::meta(0)).collect();
        let second: Vec<_> = g.predecessors(NodeId::meta(0)).collect();
        assert_eq!(first, vec![NodeId::input(2), NodeId::input(1)]);
        assert_eq!(first, second);
    }

    #[test]
    fn next_index_starts_at_zero_and_follows_max() {
        let g = two_inputs();
        assert_eq!(g.next_index(NodeKind::Input), 3);
        assert_eq!(g.next_index(NodeKind::Meta), 0);
        assert_eq!(g.max_index(NodeKind::MetaMeta), None);
    }
}
