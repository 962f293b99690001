//! Command-line surface: run a simulation, inspect a snapshot, dump config.

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use reflexive_engine::{
    CycleDriver, CycleReport, EngineConfig, ReflexiveState, SeededSource, TrustEntry,
};
use reflexive_tables::Summary;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "reflexive",
    about = "Reflexive belief graph: evolve, aggregate, reinforce, restructure",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Write logs to a file (in addition to stderr)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the simulation and export node/edge tables
    Run(RunArgs),
    /// Summarize (or render) a saved snapshot
    Show(ShowArgs),
    /// Print the default configuration as TOML
    Config,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Path to config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of cycles (overrides config)
    #[arg(long)]
    pub cycles: Option<usize>,

    /// New inputs per cycle (overrides config)
    #[arg(long)]
    pub steps: Option<usize>,

    /// Meta nodes per consensus group (overrides config)
    #[arg(long)]
    pub cluster_size: Option<usize>,

    /// Goal state that earns a positive reward (overrides config)
    #[arg(long)]
    pub goal: Option<bool>,

    /// Seed for input values (overrides config)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Node table output
    #[arg(long, default_value = "nodes.csv")]
    pub nodes: PathBuf,

    /// Edge table output
    #[arg(long, default_value = "edges.csv")]
    pub edges: PathBuf,

    /// Resume from this node table instead of seeding a fresh graph
    #[arg(long, requires = "resume_edges")]
    pub resume_nodes: Option<PathBuf>,

    /// Edge table to resume from
    #[arg(long, requires = "resume_nodes")]
    pub resume_edges: Option<PathBuf>,

    /// Also write a Graphviz rendering
    #[arg(long)]
    pub dot: Option<PathBuf>,

    /// Also write a JSON run report
    #[arg(long)]
    pub report: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    #[arg(long, default_value = "nodes.csv")]
    pub nodes: PathBuf,

    #[arg(long, default_value = "edges.csv")]
    pub edges: PathBuf,

    /// Print Graphviz DOT instead of a summary
    #[arg(long, default_value_t = false)]
    pub dot: bool,
}

/// Number of audit entries ever recorded, per log.
#[derive(Debug, Serialize)]
pub struct Recorded {
    pub memory: u64,
    pub contradictions: u64,
    pub rewards: u64,
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub seed: u64,
    pub cycles: usize,
    pub summary: Summary,
    pub trust: Vec<TrustEntry>,
    pub recorded: Recorded,
    pub per_cycle: Vec<CycleReport>,
    pub finished_at: DateTime<Utc>,
}

impl RunArgs {
    /// Config file values, then command-line overrides.
    pub fn resolve_config(&self) -> EngineConfig {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load(path),
            None => EngineConfig::default(),
        };
        if let Some(cycles) = self.cycles {
            config.run.cycles = cycles;
        }
        if let Some(steps) = self.steps {
            config.run.steps_per_cycle = steps;
        }
        if let Some(size) = self.cluster_size {
            config.run.cluster_size = size;
        }
        if let Some(goal) = self.goal {
            config.run.goal_state = goal;
        }
        if self.seed.is_some() {
            config.run.seed = self.seed;
        }
        config
    }
}

pub fn run(args: &RunArgs) -> anyhow::Result<RunReport> {
    let config = args.resolve_config();
    config.validate()?;

    let source = match config.run.seed {
        Some(seed) => SeededSource::new(seed),
        None => SeededSource::from_entropy(),
    };
    let seed = source.seed();
    info!(seed, cycles = config.run.cycles, "Starting simulation");

    let mut driver = match (&args.resume_nodes, &args.resume_edges) {
        (Some(nodes), Some(edges)) => {
            let graph = reflexive_tables::load(nodes, edges)
                .with_context(|| format!("loading snapshot {}", nodes.display()))?;
            let state = ReflexiveState::resume(graph, &config.audit);
            CycleDriver::new(&config, state, source)?
        }
        _ => CycleDriver::seeded(&config, source)?,
    };

    let per_cycle = driver.run(config.run.cycles)?;
    let cycles = driver.cycles_run();
    let state = driver.into_state();

    reflexive_tables::export(&state.graph, &args.nodes, &args.edges)
        .context("exporting tables")?;

    if let Some(path) = &args.dot {
        write_file(path, &reflexive_tables::render_dot(&state.graph))?;
    }

    let report = RunReport {
        seed,
        cycles,
        summary: Summary::of(&state.graph),
        trust: state.ledger.snapshot(),
        recorded: Recorded {
            memory: state.journal.memory.total_recorded(),
            contradictions: state.journal.contradictions.total_recorded(),
            rewards: state.journal.rewards.total_recorded(),
        },
        per_cycle,
        finished_at: Utc::now(),
    };

    if let Some(path) = &args.report {
        write_file(path, &serde_json::to_string_pretty(&report)?)?;
    }

    Ok(report)
}

pub fn show(args: &ShowArgs) -> anyhow::Result<String> {
    let graph = reflexive_tables::load(&args.nodes, &args.edges)
        .with_context(|| format!("loading snapshot {}", args.nodes.display()))?;
    if args.dot {
        Ok(reflexive_tables::render_dot(&graph))
    } else {
        Ok(Summary::of(&graph).to_string())
    }
}

fn write_file(path: &Path, content: &str) -> anyhow::Result<()> {
    std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}
