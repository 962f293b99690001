//! Cycle driver: evolve, aggregate, reinforce, restructure, repeat.
//!
//! One `ReflexiveState` threads through every cycle. Cycles depend on each
//! other through the ledger and graph, so they always run in order on one
//! thread.

use crate::aggregator::Aggregator;
use crate::config::EngineConfig;
use crate::evolver::Evolver;
use crate::reinforcer::Reinforcer;
use crate::restructurer::Restructurer;
use crate::source::ValueSource;
use crate::state::ReflexiveState;
use reflexive_core::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// What one cycle changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    pub cycle: usize,
    pub inputs_added: usize,
    pub metas_added: usize,
    pub meta_metas_added: usize,
    pub rewarded: usize,
    pub penalized: usize,
    pub contradictions: usize,
    pub edges_decayed: usize,
    pub edges_pruned: usize,
}

pub struct CycleDriver<S: ValueSource> {
    pub state: ReflexiveState,
    source: S,
    evolver: Evolver,
    aggregator: Aggregator,
    reinforcer: Reinforcer,
    restructurer: Restructurer,
    steps_per_cycle: usize,
    cycles_run: usize,
}

impl<S: ValueSource> CycleDriver<S> {
    pub fn new(config: &EngineConfig, state: ReflexiveState, source: S) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            state,
            source,
            evolver: config.evolver(),
            aggregator: config.aggregator(),
            reinforcer: config.reinforcer(),
            restructurer: config.restructurer(),
            steps_per_cycle: config.run.steps_per_cycle,
            cycles_run: 0,
        })
    }

    /// Seed a fresh graph from `source` and wrap it in a driver.
    pub fn seeded(config: &EngineConfig, mut source: S) -> Result<Self> {
        let state = ReflexiveState::seed_from(&mut source, &config.audit)?;
        Self::new(config, state, source)
    }

    pub fn cycles_run(&self) -> usize {
        self.cycles_run
    }

    pub fn into_state(self) -> ReflexiveState {
        self.state
    }

    /// Run one full cycle.
    pub fn run_cycle(&mut self) -> Result<CycleReport> {
        let state = &mut self.state;
        let cycle = self.cycles_run;

        let growth = self.evolver.evolve(
            &mut state.graph,
            &mut state.ledger,
            &mut state.contradictions,
            &mut state.journal.memory,
            &mut self.source,
            self.steps_per_cycle,
        )?;

        let meta_metas = match self
            .aggregator
            .aggregate(&mut state.graph, &mut state.consumed)
        {
            Ok(created) => created,
            Err(e) if !e.is_fatal() => {
                debug!(cycle, "{e}, skipping aggregation");
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        let reinforced = self
            .reinforcer
            .reinforce(&mut state.graph, &mut state.journal.rewards);

        let restructured = self.restructurer.restructure(
            &mut state.graph,
            &mut state.contradictions,
            &mut state.journal.contradictions,
        );

        self.cycles_run += 1;
        let report = CycleReport {
            cycle,
            inputs_added: growth.inputs.len(),
            metas_added: growth.metas.len(),
            meta_metas_added: meta_metas.len(),
            rewarded: reinforced.rewarded,
            penalized: reinforced.penalized,
            contradictions: restructured.contradictions,
            edges_decayed: restructured.edges_decayed,
            edges_pruned: restructured.edges_pruned,
        };
        debug!(?report, "cycle complete");
        Ok(report)
    }

    /// Run `cycles` cycles in order. No convergence check.
    pub fn run(&mut self, cycles: usize) -> Result<Vec<CycleReport>> {
        let mut reports = Vec::with_capacity(cycles);
        for _ in 0..cycles {
            reports.push(self.run_cycle()?);
        }

        let graph = &self.state.graph;
        info!(
            cycles,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            contradictions = self.state.journal.contradictions.total_recorded(),
            rewards = self.state.journal.rewards.total_recorded(),
            "Simulation finished"
        );
        Ok(reports)
    }
}
