//! SismoDash - Earthquake Catalog Analytics
//!
//! Loads the historical seismic catalog for Mexico (1925-2025), evaluates
//! the aggregation pipeline and prints the dashboard report.

mod config;
mod data;
mod format;
mod report;
mod stats;

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use config::DashboardConfig;
use stats::DashboardSummary;

#[derive(Parser, Debug)]
#[command(name = "sismodash", version, about = "Earthquake catalog dashboard report")]
struct Args {
    /// Path of the catalog CSV (overrides the config file)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Path of a JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut config = match &args.config {
        Some(path) => DashboardConfig::from_file(path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    if let Some(data) = args.data {
        config.data_path = data;
    }

    let catalog = data::shared_cache()
        .get_or_load(&config.data_path)
        .with_context(|| format!("failed to load catalog {}", config.data_path.display()))?;

    let summary = DashboardSummary::build(&catalog, &config)?;
    let records = catalog.records()?;
    log::debug!("pipeline evaluated: {} records", summary.total);

    print!("{}", report::render(&summary, &records, &config));
    Ok(())
}
