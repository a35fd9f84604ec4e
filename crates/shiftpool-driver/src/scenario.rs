use crate::config::DriverConfig;
use anyhow::Context;
use shiftpool::{LogObserver, Pool, PoolBuilder, PoolStats};
use std::thread;

/// Runs the grow/shrink/stop scenario and returns the pool's final counters.
///
/// 1. submit a batch to the initial workers,
/// 2. add a worker and submit a second batch,
/// 3. remove `scale_down` workers and submit a third batch,
/// 4. stop the pool.
pub fn run(config: &DriverConfig) -> anyhow::Result<PoolStats> {
    let delay = config.job_delay;

    let pool = PoolBuilder::new()
        .initial_workers(config.workers)
        .thread_name_prefix(config.thread_prefix.as_str())
        .observer(LogObserver)
        .build(move |worker, job: String| {
            // Simulated work.
            thread::sleep(delay);
            tracing::info!(worker = worker.get(), "Worker {worker} processing job: {job}");
        })
        .context("failed to start worker pool")?;

    let mut next_job = 0;

    submit_batch(&pool, config.jobs_per_batch, &mut next_job)?;

    pool.add_worker().context("failed to add worker")?;

    submit_batch(&pool, config.jobs_per_batch, &mut next_job)?;

    for _ in 0..config.scale_down {
        if let Err(e) = pool.remove_worker() {
            tracing::warn!("Error removing worker: {e}");
        }
    }

    submit_batch(&pool, config.jobs_per_batch, &mut next_job)?;

    pool.stop().context("failed to stop worker pool")?;

    Ok(pool.stats())
}

fn submit_batch(pool: &Pool<String>, count: usize, next_job: &mut usize) -> anyhow::Result<()> {
    for _ in 0..count {
        pool.add_job(format!("Job #{next_job}"))
            .with_context(|| format!("failed to add job #{next_job}"))?;
        *next_job += 1;
    }

    tracing::debug!(submitted = *next_job, workers = pool.worker_count(), "Batch handed off");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::time::Duration;
    use shiftpool::DEFAULT_THREAD_PREFIX;

    fn config(workers: usize, jobs_per_batch: usize, scale_down: usize) -> DriverConfig {
        DriverConfig {
            workers,
            jobs_per_batch,
            job_delay: Duration::from_millis(1),
            scale_down,
            thread_prefix: DEFAULT_THREAD_PREFIX.to_string(),
            json: false,
        }
    }

    #[test]
    fn reference_scenario_completes_every_job() {
        let stats = run(&config(3, 10, 3)).unwrap();

        assert_eq!(stats.jobs_submitted, 30);
        assert_eq!(stats.jobs_completed, 30);
        assert_eq!(stats.workers_spawned, 4);
        assert_eq!(stats.workers_removed, 3);
        assert_eq!(stats.workers, 0);
    }

    #[test]
    fn excess_removals_are_tolerated_without_jobs() {
        let stats = run(&config(1, 0, 5)).unwrap();

        assert_eq!(stats.workers_removed, 2);
        assert_eq!(stats.jobs_submitted, 0);
    }
}
