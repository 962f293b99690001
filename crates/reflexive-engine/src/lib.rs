//! Reflexive Engine - the belief graph evolution loop
//!
//! Each cycle:
//! - Evolver: appends input facts, judges each against its predecessor under
//!   the trust ledger's bias, and records a meta node per judgment
//! - Aggregator: folds complete clusters of meta nodes into meta-meta consensus
//! - Reinforcer: rewards or penalizes the edges that fed each consensus
//! - Restructurer: decays edges matching this cycle's contradictions

pub mod aggregator;
pub mod config;
pub mod driver;
pub mod evaluator;
pub mod evolver;
pub mod graph;
pub mod journal;
pub mod ledger;
pub mod reinforcer;
pub mod restructurer;
pub mod source;
pub mod state;

pub use aggregator::{majority, Aggregator};
pub use config::EngineConfig;
pub use driver::{CycleDriver, CycleReport};
pub use evaluator::Evaluator;
pub use evolver::{Evolver, Growth};
pub use graph::GraphStore;
pub use journal::{AuditConfig, AuditLog, Journal, Retention};
pub use ledger::{TrustEntry, TrustLedger};
pub use reinforcer::{ReinforceStats, Reinforcer};
pub use restructurer::{RestructureStats, Restructurer};
pub use source::{SeededSource, SequenceSource, ValueSource};
pub use state::ReflexiveState;
