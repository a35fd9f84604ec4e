#![doc = include_str!("../README.md")]

mod config;
mod scenario;
mod telemetry;

use clap::Parser;
use config::{CliArgs, DriverConfig};
use telemetry::init_logging;

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = DriverConfig::try_from(args)?;

    init_logging(config.json)?;
    log_startup_info(&config);

    let stats = scenario::run(&config)?;

    tracing::info!(
        jobs_submitted = stats.jobs_submitted,
        jobs_completed = stats.jobs_completed,
        jobs_panicked = stats.jobs_panicked,
        workers_spawned = stats.workers_spawned,
        workers_removed = stats.workers_removed,
        "Scenario finished"
    );
    Ok(())
}

fn log_startup_info(config: &DriverConfig) {
    if cfg!(debug_assertions) {
        tracing::info!("Starting worker pool scenario with full config: {config:#?}");
    } else {
        tracing::info!(
            "Starting worker pool scenario with {} workers, {} jobs per batch",
            config.workers,
            config.jobs_per_batch
        );
    }
}
