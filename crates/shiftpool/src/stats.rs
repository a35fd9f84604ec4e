use portable_atomic::{AtomicU64, Ordering};

/// Monotonic counters shared between a pool and its workers.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    job_seq: AtomicU64,
    jobs_submitted: AtomicU64,
    jobs_completed: AtomicU64,
    jobs_panicked: AtomicU64,
    worker_seq: AtomicU64,
    workers_spawned: AtomicU64,
    workers_removed: AtomicU64,
}

impl Counters {
    /// Reserves the next job sequence number (1-based). Numbers reserved for
    /// rejected jobs are skipped, never handed out again.
    pub(crate) fn next_job(&self) -> u64 {
        self.job_seq.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub(crate) fn job_accepted(&self) {
        self.jobs_submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn job_completed(&self) {
        self.jobs_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn job_panicked(&self) {
        self.jobs_panicked.fetch_add(1, Ordering::Relaxed);
    }

    /// Reserves the next worker id (1-based). An id reserved for a thread that
    /// failed to spawn is skipped.
    pub(crate) fn next_worker(&self) -> u64 {
        self.worker_seq.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub(crate) fn worker_spawned(&self) {
        self.workers_spawned.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn worker_removed(&self) {
        self.workers_removed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, workers: usize) -> PoolStats {
        PoolStats {
            workers,
            jobs_submitted: self.jobs_submitted.load(Ordering::Relaxed),
            jobs_completed: self.jobs_completed.load(Ordering::Relaxed),
            jobs_panicked: self.jobs_panicked.load(Ordering::Relaxed),
            workers_spawned: self.workers_spawned.load(Ordering::Relaxed),
            workers_removed: self.workers_removed.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of a pool's counters.
///
/// Counters are read independently, so a snapshot taken while jobs are in
/// flight may be momentarily inconsistent (for example `jobs_completed` may
/// already include a job that `jobs_submitted` has not been read for yet).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Workers currently registered in the pool.
    pub workers: usize,
    /// Jobs accepted by a worker.
    pub jobs_submitted: u64,
    /// Jobs whose execution returned or unwound.
    pub jobs_completed: u64,
    /// Completed jobs whose handler panicked.
    pub jobs_panicked: u64,
    /// Worker threads successfully started, including removed ones.
    pub workers_spawned: u64,
    /// Workers removed through `remove_worker`.
    pub workers_removed: u64,
}

impl PoolStats {
    /// Jobs accepted but not finished yet.
    pub const fn in_flight(&self) -> u64 {
        self.jobs_submitted.saturating_sub(self.jobs_completed)
    }
}
