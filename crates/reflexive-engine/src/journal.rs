//! Append-only audit logs for judgments, drained contradictions, and rewards.
//!
//! Each log has an explicit retention policy. A capped log rotates out its
//! oldest entries but still counts them in `total_recorded`.

use reflexive_core::{ContradictionEntry, MemoryEntry, RewardEntry};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Retention {
    #[default]
    Unbounded,
    /// Keep at most this many of the most recent entries.
    Capped(usize),
}

#[derive(Debug, Clone)]
pub struct AuditLog<T> {
    entries: VecDeque<T>,
    retention: Retention,
    recorded: u64,
}

impl<T> AuditLog<T> {
    pub fn new(retention: Retention) -> Self {
        Self {
            entries: VecDeque::new(),
            retention,
            recorded: 0,
        }
    }

    pub fn push(&mut self, entry: T) {
        self.recorded += 1;
        if let Retention::Capped(cap) = self.retention {
            if cap == 0 {
                return;
            }
            while self.entries.len() >= cap {
                self.entries.pop_front();
            }
        }
        self.entries.push_back(entry);
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = T>) {
        for entry in entries {
            self.push(entry);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&T> {
        self.entries.back()
    }

    /// Entries currently retained.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every entry ever pushed, including rotated-out ones.
    pub fn total_recorded(&self) -> u64 {
        self.recorded
    }
}

impl<T> Default for AuditLog<T> {
    fn default() -> Self {
        Self::new(Retention::Unbounded)
    }
}

/// Retention per log, as configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub memory: Retention,
    pub contradictions: Retention,
    pub rewards: Retention,
}

#[derive(Debug, Clone, Default)]
pub struct Journal {
    pub memory: AuditLog<MemoryEntry>,
    /// Contradictions drained from the working buffer by the restructurer.
    pub contradictions: AuditLog<ContradictionEntry>,
    pub rewards: AuditLog<RewardEntry>,
}

impl Journal {
    pub fn new(config: &AuditConfig) -> Self {
        Self {
            memory: AuditLog::new(config.memory),
            contradictions: AuditLog::new(config.contradictions),
            rewards: AuditLog::new(config.rewards),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_keeps_everything() {
        let mut log = AuditLog::new(Retention::Unbounded);
        log.extend(0..100);
        assert_eq!(log.len(), 100);
        assert_eq!(log.total_recorded(), 100);
        assert_eq!(log.iter().next(), Some(&0));
    }

    #[test]
    fn capped_rotates_oldest_out() {
        let mut log = AuditLog::new(Retention::Capped(3));
        log.extend(1..=5);
        let kept: Vec<_> = log.iter().copied().collect();
        assert_eq!(kept, vec![3, 4, 5]);
        assert_eq!(log.total_recorded(), 5);
        assert_eq!(log.last(), Some(&5));
    }

    #[test]
    fn zero_cap_counts_but_retains_nothing() {
        let mut log = AuditLog::new(Retention::Capped(0));
        log.push("x");
        assert!(log.is_empty());
        assert_eq!(log.total_recorded(), 1);
    }
}
