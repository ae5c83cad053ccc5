//! Majority balance-simulation CLI.
//!
//! Runs one game per seed with a fixed agent lineup (seats rotating between
//! games) and reports scores, winners, and balance metrics as JSON or CSV.

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use majority_core::ExpansionsConfig;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod agents;
mod export;
mod runner;
mod tournament;

use agents::agent_by_name;
use tournament::run_tournament;

/// Output format for the tournament report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(name = "majority-sim", about = "Balance simulator for the Majority engine")]
struct Args {
    /// Seeds to run, one game each.
    #[arg(long, value_delimiter = ',', default_value = "42")]
    seeds: Vec<u64>,

    /// Rounds per game.
    #[arg(long, default_value_t = 5)]
    rounds: u32,

    /// Agent lineup by name (lowest-aid, random, institution, network,
    /// production); one seat per entry.
    #[arg(long, value_delimiter = ',', default_value = "random,random,random")]
    agents: Vec<String>,

    /// Enable the economy expansion.
    #[arg(long)]
    economy: bool,

    /// Enable the order expansion.
    #[arg(long)]
    order: bool,

    /// Write the report to this file instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Report format.
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut lineup = Vec::with_capacity(args.agents.len());
    for name in &args.agents {
        match agent_by_name(name) {
            Some(agent) => lineup.push(agent),
            None => bail!("unknown agent: {name}"),
        }
    }
    if !(2..=8).contains(&lineup.len()) {
        bail!("need between 2 and 8 agents, got {}", lineup.len());
    }

    let expansions = ExpansionsConfig {
        economy: args.economy,
        order: args.order,
    };
    info!(
        seeds = args.seeds.len(),
        rounds = args.rounds,
        ?expansions,
        "starting tournament"
    );

    let report = run_tournament(expansions, &lineup, &args.seeds, args.rounds)?;

    match (&args.out, args.format) {
        (Some(path), OutputFormat::Json) => export::write_json(path, &report)?,
        (Some(path), OutputFormat::Csv) => export::write_csv(path, &report.games)?,
        (None, _) => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}
