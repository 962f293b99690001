//! Goal reinforcer: two-hop credit assignment from consensus to the
//! judgments that fed it.

use crate::graph::GraphStore;
use crate::journal::AuditLog;
use reflexive_core::{NodeId, NodeKind, Reward, RewardEntry};
use tracing::debug;

pub const DEFAULT_REWARD_STEP: f64 = 0.1;
pub const DEFAULT_MIN_WEIGHT: f64 = 0.1;
pub const DEFAULT_MAX_WEIGHT: f64 = 2.0;

#[derive(Debug, Clone, Copy)]
pub struct Reinforcer {
    pub goal_state: bool,
    pub step: f64,
    pub min_weight: f64,
    pub max_weight: f64,
}

impl Default for Reinforcer {
    fn default() -> Self {
        Self {
            goal_state: true,
            step: DEFAULT_REWARD_STEP,
            min_weight: DEFAULT_MIN_WEIGHT,
            max_weight: DEFAULT_MAX_WEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReinforceStats {
    pub rewarded: usize,
    pub penalized: usize,
    pub edges_touched: usize,
}

impl Reinforcer {
    pub fn with_goal(goal_state: bool) -> Self {
        Self {
            goal_state,
            ..Self::default()
        }
    }

    /// Reward every meta-meta node against the goal and push the signal two
    /// hops back: onto each edge `g -> p` where `p` feeds the consensus.
    pub fn reinforce(
        &self,
        graph: &mut GraphStore,
        rewards: &mut AuditLog<RewardEntry>,
    ) -> ReinforceStats {
        let mut stats = ReinforceStats::default();
        let consensus: Vec<(NodeId, bool)> = graph
            .nodes_of_kind(NodeKind::MetaMeta)
            .map(|n| (n.id, n.value))
            .collect();

        for (node, value) in consensus {
            let reward = Reward::for_alignment(value == self.goal_state);
            rewards.push(RewardEntry { node, reward });
            match reward {
                Reward::Reward => stats.rewarded += 1,
                Reward::Penalty => stats.penalized += 1,
            }

            let delta = self.step * reward.as_f64();
            let parents: Vec<NodeId> = graph.predecessors(node).collect();
            for parent in parents {
                let grandparents: Vec<NodeId> = graph.predecessors(parent).collect();
                for grandparent in grandparents {
                    let Some(weight) = graph.weight(grandparent, parent) else {
                        continue;
                    };
                    let updated = (weight + delta).clamp(self.min_weight, self.max_weight);
                    graph.set_weight(grandparent, parent, updated);
                    stats.edges_touched += 1;
                }
            }
            debug!(%node, reward = reward.sign(), "goal signal applied");
        }

        stats
    }
}
