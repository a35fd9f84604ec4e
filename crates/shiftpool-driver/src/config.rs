use anyhow::bail;
use clap::Parser;
use core::time::Duration;
use shiftpool::DEFAULT_THREAD_PREFIX;

/// Runtime configuration for the `shiftpool-driver` binary.
///
/// All values are parsed from CLI arguments or environment variables (a `.env`
/// file is loaded first), with defaults matching the reference scenario: three
/// workers, batches of ten jobs, half a second of simulated work per job.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "shiftpool-driver",
    version,
    about = "Drives a resizable worker pool through a grow/shrink/stop scenario"
)]
pub struct CliArgs {
    /// Number of workers the pool starts with.
    ///
    /// Environment variable: `NUM_WORKERS`
    #[arg(long, env = "NUM_WORKERS", default_value_t = 3)]
    pub workers: usize,

    /// Number of jobs submitted in each of the three batches.
    ///
    /// Environment variable: `JOBS_PER_BATCH`
    #[arg(long, env = "JOBS_PER_BATCH", default_value_t = 10)]
    pub jobs_per_batch: usize,

    /// Simulated processing time of a single job, in milliseconds.
    ///
    /// Environment variable: `JOB_DELAY_MS`
    #[arg(long, env = "JOB_DELAY_MS", default_value_t = 500)]
    pub job_delay_ms: u64,

    /// Number of workers removed before the last batch.
    ///
    /// At least one worker must survive, otherwise the last batch could never
    /// be handed off.
    ///
    /// Environment variable: `SCALE_DOWN`
    #[arg(long, env = "SCALE_DOWN", default_value_t = 3)]
    pub scale_down: usize,

    /// Prefix of worker thread names.
    ///
    /// Environment variable: `THREAD_PREFIX`
    #[arg(long, env = "THREAD_PREFIX", default_value_t = String::from(DEFAULT_THREAD_PREFIX))]
    pub thread_prefix: String,

    /// Emit logs as JSON lines instead of human-readable text.
    ///
    /// Environment variable: `LOG_JSON`
    #[arg(long, env = "LOG_JSON", default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Clone)]
pub struct DriverConfig {
    pub workers: usize,
    pub jobs_per_batch: usize,
    pub job_delay: Duration,
    pub scale_down: usize,
    pub thread_prefix: String,
    pub json: bool,
}

impl TryFrom<CliArgs> for DriverConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        // The scenario adds one worker before scaling down.
        let peak_workers = args.workers + 1;

        if args.scale_down >= peak_workers && args.jobs_per_batch > 0 {
            bail!(
                "SCALE_DOWN ({}) must leave at least one of the {} workers alive for the last batch",
                args.scale_down,
                peak_workers
            );
        }

        if args.scale_down > peak_workers {
            bail!(
                "SCALE_DOWN ({}) exceeds the number of workers ({})",
                args.scale_down,
                peak_workers
            );
        }

        if args.thread_prefix.is_empty() {
            bail!("THREAD_PREFIX must not be empty");
        }

        Ok(Self {
            workers: args.workers,
            jobs_per_batch: args.jobs_per_batch,
            job_delay: Duration::from_millis(args.job_delay_ms),
            scale_down: args.scale_down,
            thread_prefix: args.thread_prefix,
            json: args.json,
        })
    }
}
