//! generate-data - synthetic pNode history
//!
//! Writes hourly telemetry for a set of simulated nodes to the CSV file the
//! analytics server loads at startup.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use pnode_analytics_core::constants::{
    DEFAULT_ANOMALY_RATE, DEFAULT_DATA_PATH, DEFAULT_HISTORY_DAYS, DEFAULT_NODE_COUNT,
};
use pnode_analytics_core::logic::dataset::write_csv;
use pnode_analytics_core::logic::generator::{generate, GeneratorConfig};

/// Generate synthetic pNode telemetry
#[derive(Parser)]
#[command(name = "generate-data")]
#[command(about = "Generate a synthetic pNode metric history CSV")]
#[command(version)]
struct Cli {
    /// Number of simulated nodes
    #[arg(short, long, default_value_t = DEFAULT_NODE_COUNT)]
    nodes: usize,

    /// Days of hourly history ending now
    #[arg(short, long, default_value_t = DEFAULT_HISTORY_DAYS)]
    days: i64,

    /// Output CSV path
    #[arg(short, long, default_value = DEFAULT_DATA_PATH)]
    output: PathBuf,

    /// Probability that a sample is an anomaly
    #[arg(long, default_value_t = DEFAULT_ANOMALY_RATE)]
    anomaly_rate: f64,

    /// RNG seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if cli.days < 0 {
        anyhow::bail!("--days must not be negative");
    }

    let config = GeneratorConfig::new(cli.nodes, cli.days).with_anomaly_rate(cli.anomaly_rate);
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    log::info!(
        "Generating {} days of history for {} nodes...",
        config.days,
        config.nodes
    );
    let records = generate(&config, &mut rng);

    write_csv(&cli.output, &records)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    println!("Generated {} records in {}", records.len(), cli.output.display());
    Ok(())
}
