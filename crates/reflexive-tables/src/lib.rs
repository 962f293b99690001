//! Reflexive Tables - flat node/edge snapshots and graph rendering
//!
//! The node table (`id,type,value`) and edge table (`source,target,weight`)
//! are the only persisted form of a belief graph.

pub mod dot;
pub mod summary;
pub mod table;

pub use dot::render_dot;
pub use summary::Summary;
pub use table::{export, load, read_graph, write_edges, write_nodes, EdgeRow, NodeRow};
