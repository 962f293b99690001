//! CSV node and edge tables.
//!
//! Values are written as `true`/`false`. On read, `1`/`0` and `True`/`False`
//! are accepted as well, since older snapshots mixed integer input values
//! with boolean meta values. A blank edge weight reads as the default edge
//! weight.

use reflexive_core::{Error, NodeId, NodeKind, Result, DEFAULT_EDGE_WEIGHT};
use reflexive_engine::GraphStore;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRow {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(deserialize_with = "flexible_bool")]
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRow {
    pub source: NodeId,
    pub target: NodeId,
    #[serde(deserialize_with = "weight_or_default")]
    pub weight: f64,
}

fn flexible_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim() {
        "true" | "True" | "TRUE" | "1" => Ok(true),
        "false" | "False" | "FALSE" | "0" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "expected a boolean value, got {other:?}"
        ))),
    }
}

fn weight_or_default<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(DEFAULT_EDGE_WEIGHT);
    }
    raw.parse().map_err(|_| {
        serde::de::Error::custom(format!("expected an edge weight, got {raw:?}"))
    })
}

fn csv_error(e: csv::Error) -> Error {
    Error::table(e.to_string())
}

pub fn write_nodes<W: Write>(graph: &GraphStore, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for node in graph.nodes() {
        wtr.serialize(NodeRow {
            id: node.id,
            kind: node.kind(),
            value: node.value,
        })
        .map_err(csv_error)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_edges<W: Write>(graph: &GraphStore, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for edge in graph.edges() {
        wtr.serialize(EdgeRow {
            source: edge.source,
            target: edge.target,
            weight: edge.weight,
        })
        .map_err(csv_error)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write both tables to disk.
pub fn export(graph: &GraphStore, nodes_path: &Path, edges_path: &Path) -> Result<()> {
    write_nodes(graph, File::create(nodes_path)?)?;
    write_edges(graph, File::create(edges_path)?)?;
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Exported tables to {} and {}",
        nodes_path.display(),
        edges_path.display()
    );
    Ok(())
}

/// Rebuild a graph from a node table and an edge table.
///
/// Nodes are added before edges, so an edge may reference any node in the
/// node table regardless of row order.
pub fn read_graph<N: Read, E: Read>(nodes: N, edges: E) -> Result<GraphStore> {
    let mut graph = GraphStore::new();

    let mut rdr = csv::Reader::from_reader(nodes);
    for row in rdr.deserialize::<NodeRow>() {
        let row = row.map_err(csv_error)?;
        graph.add_node(row.id, row.kind, row.value)?;
    }

    let mut rdr = csv::Reader::from_reader(edges);
    for row in rdr.deserialize::<EdgeRow>() {
        let row = row.map_err(csv_error)?;
        graph.add_edge(row.source, row.target, row.weight)?;
    }

    Ok(graph)
}

pub fn load(nodes_path: &Path, edges_path: &Path) -> Result<GraphStore> {
    let graph = read_graph(File::open(nodes_path)?, File::open(edges_path)?)?;
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Loaded tables from {} and {}",
        nodes_path.display(),
        edges_path.display()
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_table_has_expected_header_and_labels() {
        let mut g = GraphStore::new();
        g.add_node(NodeId::input(1), NodeKind::Input, true).unwrap();
        g.add_node(NodeId::meta_meta(0), NodeKind::MetaMeta, false).unwrap();

        let mut out = Vec::new();
        write_nodes(&g, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "id,type,value\nI1,input,true\nMM0,meta-meta,false\n");
    }

    #[test]
    fn reads_integer_and_capitalized_values() {
        let nodes = "id,type,value\nI1,input,1\nI2,input,0\nM1,meta,True\n";
        let edges = "source,target,weight\nI1,M1,0.95\nI2,M1,0.95\n";
        let g = read_graph(nodes.as_bytes(), edges.as_bytes()).unwrap();
        assert_eq!(g.value(NodeId::input(1)), Some(true));
        assert_eq!(g.value(NodeId::input(2)), Some(false));
        assert_eq!(g.value(NodeId::meta(1)), Some(true));
        assert_eq!(g.weight(NodeId::input(2), NodeId::meta(1)), Some(0.95));
    }

    #[test]
    fn blank_weight_reads_as_default() {
        let nodes = "id,type,value\nI1,input,1\nI2,input,0\nM1,meta,False\n";
        let edges = "source,target,weight\nI1,M1,\nI2,M1,0.95\n";
        let g = read_graph(nodes.as_bytes(), edges.as_bytes()).unwrap();
        assert_eq!(g.weight(NodeId::input(1), NodeId::meta(1)), Some(DEFAULT_EDGE_WEIGHT));
        assert_eq!(g.weight(NodeId::input(2), NodeId::meta(1)), Some(0.95));
    }

    #[test]
    fn rejects_malformed_weight() {
        let nodes = "id,type,value\nI1,input,1\nM1,meta,true\n";
        let edges = "source,target,weight\nI1,M1,heavy\n";
        let err = read_graph(nodes.as_bytes(), edges.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::TableError(_)));
    }

    #[test]
    fn rejects_non_boolean_value() {
        let nodes = "id,type,value\nI1,input,maybe\n";
        let err = read_graph(nodes.as_bytes(), "source,target,weight\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::TableError(_)));
    }

    #[test]
    fn edge_to_unknown_node_surfaces_core_error() {
        let nodes = "id,type,value\nI1,input,1\n";
        let edges = "source,target,weight\nI1,M7,1.0\n";
        let err = read_graph(nodes.as_bytes(), edges.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::UnknownNode(id) if id == NodeId::meta(7)));
    }

    #[test]
    fn type_column_must_agree_with_id() {
        let nodes = "id,type,value\nM1,input,1\n";
        let err = read_graph(nodes.as_bytes(), "source,target,weight\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::KindMismatch { .. }));
    }

    #[test]
    fn duplicate_row_is_rejected() {
        let nodes = "id,type,value\nI1,input,1\nI1,input,0\n";
        let err = read_graph(nodes.as_bytes(), "source,target,weight\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::DuplicateId(_)));
    }
}
