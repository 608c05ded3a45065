//! Headless runner for the ecosystem simulation.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use evovision::simulation::census::Census;
use evovision::simulation::ecosystem::Ecosystem;
use evovision::simulation::params::SimConfig;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "evovision")]
#[command(version)]
#[command(about = "Predator/prey ecosystem with evolving neural controllers")]
struct Cli {
    /// Configuration file (JSON). Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to simulate
    #[arg(short, long, default_value = "10000")]
    ticks: u64,

    /// Log a census every this many ticks
    #[arg(short, long, default_value = "1000")]
    report_every: u64,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_ref())?;
    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let mut ecosystem = Ecosystem::new(config).context("invalid simulation configuration")?;
    info!(ticks = cli.ticks, "starting simulation");

    let report_every = cli.report_every.max(1);
    let mut last = ecosystem.census();
    for _ in 0..cli.ticks {
        last = ecosystem.advance_one_tick();
        if last.tick % report_every == 0 {
            report(&last);
            ecosystem.retire_dead();
        }
        if ecosystem.is_collapsed() {
            info!(tick = last.tick, "ecosystem collapsed, stopping");
            break;
        }
    }

    report(&last);
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<SimConfig> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(config)
}

fn report(census: &Census) {
    info!(
        tick = census.tick,
        plants = census.plants,
        herbivores = census.herbivores,
        carnivores = census.carnivores,
        herbivores_starved = census.herbivore_deaths.starvation,
        herbivores_eaten = census.herbivore_deaths.eaten,
        herbivores_old_age = census.herbivore_deaths.old_age,
        carnivores_starved = census.carnivore_deaths.starvation,
        carnivores_old_age = census.carnivore_deaths.old_age,
        "census"
    );
}
