//! Graphviz rendering: node kind picks the fill color, edge weight the
//! stroke width.

use reflexive_core::NodeKind;
use reflexive_engine::GraphStore;
use std::fmt::Write;

pub fn fill_color(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Input => "skyblue",
        NodeKind::Meta => "lightcoral",
        NodeKind::MetaMeta => "gold",
    }
}

pub fn render_dot(graph: &GraphStore) -> String {
    let mut out = String::from("digraph reflexive {\n");
    out.push_str("  node [shape=circle, style=filled, fontsize=10];\n");
    for node in graph.nodes() {
        let _ = writeln!(
            out,
            "  \"{}\" [fillcolor={}, tooltip=\"{}\"];",
            node.id,
            fill_color(node.kind()),
            node.value
        );
    }
    for edge in graph.edges() {
        let _ = writeln!(
            out,
            "  \"{}\" -> \"{}\" [penwidth={:.2}];",
            edge.source,
            edge.target,
            edge.weight * 2.0
        );
    }
    out.push_str("}\n");
    out
}
