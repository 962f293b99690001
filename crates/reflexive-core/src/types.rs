//! Core types for the reflexive belief graph

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Node layer in the belief graph
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Input,
    Meta,
    MetaMeta,
}

impl NodeKind {
    /// Label prefix used when an id is written to a table.
    pub fn prefix(self) -> &'static str {
        match self {
            NodeKind::Input => "I",
            NodeKind::Meta => "M",
            NodeKind::MetaMeta => "MM",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Input => "input",
            NodeKind::Meta => "meta",
            NodeKind::MetaMeta => "meta-meta",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured node identity: a kind tag plus a per-kind monotonic index.
///
/// The textual form (`I3`, `M0`, `MM2`) exists only at the table boundary.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct NodeId {
    pub kind: NodeKind,
    pub index: u64,
}

impl NodeId {
    pub const fn new(kind: NodeKind, index: u64) -> Self {
        Self { kind, index }
    }

    pub const fn input(index: u64) -> Self {
        Self::new(NodeKind::Input, index)
    }

    pub const fn meta(index: u64) -> Self {
        Self::new(NodeKind::Meta, index)
    }

    pub const fn meta_meta(index: u64) -> Self {
        Self::new(NodeKind::MetaMeta, index)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.index)
    }
}

impl FromStr for NodeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // "MM" must be tried before "M"
        let (kind, digits) = if let Some(rest) = s.strip_prefix("MM") {
            (NodeKind::MetaMeta, rest)
        } else if let Some(rest) = s.strip_prefix('M') {
            (NodeKind::Meta, rest)
        } else if let Some(rest) = s.strip_prefix('I') {
            (NodeKind::Input, rest)
        } else {
            return Err(Error::InvalidNodeId(s.to_string()));
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidNodeId(s.to_string()));
        }
        let index = digits
            .parse::<u64>()
            .map_err(|_| Error::InvalidNodeId(s.to_string()))?;
        Ok(Self::new(kind, index))
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for NodeId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// A node in the belief graph. The value never changes after creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub value: bool,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        self.id.kind
    }
}

/// Weighted directed edge
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: f64,
}

/// Weight given to edges created without an explicit weight.
pub const DEFAULT_EDGE_WEIGHT: f64 = 1.0;

/// Ordered pair of values used to look up a trust bias.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrustKey(pub bool, pub bool);

impl TrustKey {
    /// Naive equality judgment for this pair.
    pub fn raw_consistency(self) -> bool {
        self.0 == self.1
    }
}

impl fmt::Display for TrustKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

/// One evaluated pair, recorded by the evolver.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub first: NodeId,
    pub second: NodeId,
    pub key: TrustKey,
    pub verdict: bool,
}

/// A verdict the trust bias flipped away from raw equality.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContradictionEntry {
    pub pair: TrustKey,
    pub expected: bool,
    pub evaluated: bool,
}

/// Sign of a goal reward
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Reward {
    Reward,
    Penalty,
}

impl Reward {
    pub fn for_alignment(aligned: bool) -> Self {
        if aligned {
            Reward::Reward
        } else {
            Reward::Penalty
        }
    }

    pub fn sign(self) -> i8 {
        match self {
            Reward::Reward => 1,
            Reward::Penalty => -1,
        }
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.sign())
    }
}

impl From<Reward> for i8 {
    fn from(r: Reward) -> Self {
        r.sign()
    }
}

impl TryFrom<i8> for Reward {
    type Error = String;

    fn try_from(v: i8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(Reward::Reward),
            -1 => Ok(Reward::Penalty),
            other => Err(format!("reward must be +1 or -1, got {other}")),
        }
    }
}

/// Goal signal issued to one meta-meta node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardEntry {
    pub node: NodeId,
    pub reward: Reward,
}
