use reflexive_core::NodeKind;
use reflexive_engine::GraphStore;
use serde::Serialize;
use std::fmt;

/// Shape of a graph snapshot at a glance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub inputs: usize,
    pub metas: usize,
    pub meta_metas: usize,
    /// Meta-meta nodes whose consensus is `true`.
    pub true_consensus: usize,
    pub edges: usize,
    pub mean_weight: Option<f64>,
}

impl Summary {
    pub fn of(graph: &GraphStore) -> Self {
        let edges = graph.edge_count();
        let total: f64 = graph.edges().map(|e| e.weight).sum();
        Self {
            inputs: graph.count(NodeKind::Input),
            metas: graph.count(NodeKind::Meta),
            meta_metas: graph.count(NodeKind::MetaMeta),
            true_consensus: graph
                .nodes_of_kind(NodeKind::MetaMeta)
                .filter(|n| n.value)
                .count(),
            edges,
            mean_weight: (edges > 0).then(|| total / edges as f64),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "inputs:      {}", self.inputs)?;
        writeln!(f, "meta:        {}", self.metas)?;
        writeln!(
            f,
            "meta-meta:   {} ({} true)",
            self.meta_metas, self.true_consensus
        )?;
        write!(f, "edges:       {}", self.edges)?;
        if let Some(mean) = self.mean_weight {
            write!(f, " (mean weight {mean:.3})")?;
        }
        Ok(())
    }
}
