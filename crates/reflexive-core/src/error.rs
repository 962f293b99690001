//! Error types for the reflexive belief graph

use crate::types::{NodeId, NodeKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("duplicate node id: {0}")]
    DuplicateId(NodeId),

    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("no complete cluster: {pending} pending meta nodes, cluster size {cluster_size}")]
    EmptyCluster { pending: usize, cluster_size: usize },

    #[error("invalid node id: {0}")]
    InvalidNodeId(String),

    #[error("node {id} is declared as {declared} but its id says {actual}")]
    KindMismatch {
        id: NodeId,
        declared: NodeKind,
        actual: NodeKind,
    },

    #[error("config error: {0}")]
    ConfigError(String),

    #[error("table error: {0}")]
    TableError(String),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn empty_cluster(pending: usize, cluster_size: usize) -> Self {
        Self::EmptyCluster {
            pending,
            cluster_size,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    pub fn table(message: impl Into<String>) -> Self {
        Self::TableError(message.into())
    }

    /// Contract violations that should abort a run. `EmptyCluster` is the
    /// only recoverable variant raised by the engine itself.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::EmptyCluster { .. })
    }
}
