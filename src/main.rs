//! reflexive: grow a self-judging belief graph and export it as tables
//!
//! Usage:
//!   reflexive run --cycles 111 --seed 7           → simulate, write nodes.csv/edges.csv
//!   reflexive run --resume-nodes n.csv --resume-edges e.csv
//!   reflexive show --nodes nodes.csv --dot        → render a snapshot
//!   reflexive config > reflexive.toml             → dump default config

use clap::Parser;
use reflexive::cli::{self, Cli, Commands};
use reflexive::logging::init_tracing;
use reflexive_engine::EngineConfig;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Config => {
            println!("{}", EngineConfig::default().to_toml());
        }
        Commands::Show(args) => {
            let _guard = init_tracing(cli.log_file.as_deref());
            println!("{}", cli::show(&args)?);
        }
        Commands::Run(args) => {
            let _guard = init_tracing(cli.log_file.as_deref());
            let report = cli::run(&args)?;
            println!("seed {} · {} cycles", report.seed, report.cycles);
            println!("{}", report.summary);
            println!(
                "tables: {} {}",
                args.nodes.display(),
                args.edges.display()
            );
        }
    }

    Ok(())
}
