//! Engine configuration
//!
//! All tunable parameters in one place. Loaded from TOML at startup,
//! falls back to defaults if no config file exists.

use crate::aggregator::{Aggregator, DEFAULT_CLUSTER_SIZE};
use crate::evaluator::{Evaluator, DEFAULT_MIDPOINT};
use crate::evolver::{Evolver, DEFAULT_TRUST_STEP};
use crate::journal::AuditConfig;
use crate::reinforcer::{Reinforcer, DEFAULT_MAX_WEIGHT, DEFAULT_MIN_WEIGHT, DEFAULT_REWARD_STEP};
use crate::restructurer::{Restructurer, DEFAULT_DECAY, DEFAULT_PRUNE_BELOW};
use reflexive_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Cycle count, growth rate, clustering, goal.
    pub run: RunConfig,
    /// Trust ledger step and inversion midpoint.
    pub trust: TrustConfig,
    /// Goal reward propagation.
    pub reinforce: ReinforceConfig,
    /// Contradiction decay and pruning.
    pub restructure: RestructureConfig,
    /// Retention of the audit logs.
    pub audit: AuditConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Number of driver iterations.
    pub cycles: usize,
    /// New input facts per cycle.
    pub steps_per_cycle: usize,
    /// Meta nodes per consensus group.
    pub cluster_size: usize,
    /// Boolean target that decides the reward sign.
    pub goal_state: bool,
    /// Seed for the value source. Unset means a fresh seed per run.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustConfig {
    /// Added on a consistent verdict, subtracted otherwise.
    pub step: f64,
    /// Bias below which naive equality is inverted.
    pub midpoint: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReinforceConfig {
    /// Weight change per unit of reward.
    pub step: f64,
    pub min_weight: f64,
    pub max_weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RestructureConfig {
    /// Multiplier applied to each matching edge.
    pub decay: f64,
    /// Edges whose decayed weight falls below this are removed.
    pub prune_below: f64,
}

// ============================================================
// Defaults
// ============================================================

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            cycles: 111,
            steps_per_cycle: 3,
            cluster_size: DEFAULT_CLUSTER_SIZE,
            goal_state: true,
            seed: None,
        }
    }
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self { step: DEFAULT_TRUST_STEP, midpoint: DEFAULT_MIDPOINT }
    }
}

impl Default for ReinforceConfig {
    fn default() -> Self {
        Self {
            step: DEFAULT_REWARD_STEP,
            min_weight: DEFAULT_MIN_WEIGHT,
            max_weight: DEFAULT_MAX_WEIGHT,
        }
    }
}

impl Default for RestructureConfig {
    fn default() -> Self {
        Self { decay: DEFAULT_DECAY, prune_below: DEFAULT_PRUNE_BELOW }
    }
}

// ============================================================
// Loading
// ============================================================

impl EngineConfig {
    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_toml(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                tracing::info!("No config at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(e.to_string()))
    }

    /// Write the current config as TOML (for generating a default config file).
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Reject parameter combinations the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.run.cluster_size == 0 {
            return Err(Error::config("run.cluster_size must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.trust.midpoint) {
            return Err(Error::config("trust.midpoint must lie in [0, 1]"));
        }
        if self.trust.step < 0.0 || self.reinforce.step < 0.0 {
            return Err(Error::config("step sizes must not be negative"));
        }
        if self.reinforce.min_weight > self.reinforce.max_weight {
            return Err(Error::config(format!(
                "reinforce.min_weight ({}) exceeds reinforce.max_weight ({})",
                self.reinforce.min_weight, self.reinforce.max_weight
            )));
        }
        if self.restructure.decay <= 0.0 || self.restructure.decay > 1.0 {
            return Err(Error::config("restructure.decay must lie in (0, 1]"));
        }
        Ok(())
    }

    pub fn evolver(&self) -> Evolver {
        Evolver::new(Evaluator::new(self.trust.midpoint), self.trust.step)
    }

    pub fn aggregator(&self) -> Aggregator {
        Aggregator::new(self.run.cluster_size)
    }

    pub fn reinforcer(&self) -> Reinforcer {
        Reinforcer {
            goal_state: self.run.goal_state,
            step: self.reinforce.step,
            min_weight: self.reinforce.min_weight,
            max_weight: self.reinforce.max_weight,
        }
    }

    pub fn restructurer(&self) -> Restructurer {
        Restructurer {
            decay: self.restructure.decay,
            prune_below: self.restructure.prune_below,
        }
    }
}
