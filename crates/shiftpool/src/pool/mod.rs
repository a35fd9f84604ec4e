//! Resizable worker pool.
//!
//! A [`Pool`] owns a rendezvous job queue, a LIFO collection of workers and a
//! completion [`WaitGroup`]. Resizing and submission can happen from any
//! number of threads; [`Pool::stop`] closes the queue, waits until every
//! accepted job has finished, then stops and joins every worker.
//!
//! ## Lifecycle
//!
//! - **Running**: workers may be added or removed, jobs may be submitted.
//! - **Draining**: `stop` closed the queue and waits for accepted jobs.
//!   Submissions and a second `stop` fail with [`Error::PoolStopped`]; workers
//!   can still be added or removed, so a drain waiting on a job that no worker
//!   is left to take can be unblocked.
//! - **Stopped**: terminal. Every operation fails with
//!   [`Error::PoolStopped`]. The `stopped` flag is set only after the drain and
//!   the worker joins completed.
//!
//! A submission that cloned the queue sender just before `stop` took it is
//! still delivered and delays the drain; a submission after that point is
//! rejected. A send can never hit a closed queue.

mod builder;

pub use builder::{DEFAULT_THREAD_PREFIX, PoolBuilder};

use crate::{
    Error, Event, JobId, Observer, PoolStats, Result, WorkerId,
    channel::{Envelope, JobSender, job_channel},
    stats::Counters,
    worker::{Handler, Shared, SpawnConfig, Worker},
};
use core::time::Duration;
use crossbeam_channel::{SendTimeoutError, TrySendError};
use crossbeam_utils::sync::WaitGroup;
use parking_lot::Mutex;
use portable_atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A dynamically resizable pool of worker threads processing jobs of type `J`.
///
/// The pool is `Sync`; share it across threads with an [`Arc`] to resize and
/// submit concurrently.
pub struct Pool<J: Send + 'static> {
    shared: Arc<Shared<J>>,
    state: Mutex<State<J>>,
    stopped: AtomicBool,
    spawn: SpawnConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Running,
    Draining,
    Stopped,
}

/// Everything `stop` must observe atomically with respect to resizes and
/// submissions.
struct State<J> {
    phase: Phase,
    /// `None` once `stop` has closed the queue.
    jobs: Option<JobSender<J>>,
    /// Completion join handle; `None` once `stop` is draining.
    pending: Option<WaitGroup>,
    /// Live workers in spawn order. The last entry is the next one removed.
    workers: Vec<Worker>,
    /// Removed workers that may still be finishing a job.
    retired: Vec<Worker>,
}

impl<J: Send + 'static> Pool<J> {
    /// Creates a pool with `initial_workers` workers running `handler` for
    /// every job.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Spawn`] if the operating system refuses to start a
    /// worker thread.
    pub fn new<F>(initial_workers: usize, handler: F) -> Result<Self>
    where
        F: Fn(WorkerId, J) + Send + Sync + 'static,
    {
        PoolBuilder::new()
            .initial_workers(initial_workers)
            .build(handler)
    }

    pub(crate) fn with_parts(
        handler: Handler<J>,
        observer: Box<dyn Observer>,
        spawn: SpawnConfig,
    ) -> Self {
        let (tx, rx) = job_channel();
        let shared = Shared {
            jobs: rx,
            handler,
            observer,
            counters: Counters::default(),
        };

        Self {
            shared: Arc::new(shared),
            state: Mutex::new(State {
                phase: Phase::Running,
                jobs: Some(tx),
                pending: Some(WaitGroup::new()),
                workers: Vec::new(),
                retired: Vec::new(),
            }),
            stopped: AtomicBool::new(false),
            spawn,
        }
    }

    /// Spawns one more worker and returns its id.
    ///
    /// # Errors
    ///
    /// - [`Error::PoolStopped`] if the pool is stopped.
    /// - [`Error::Spawn`] if the worker thread cannot be started.
    pub fn add_worker(&self) -> Result<WorkerId> {
        if self.is_stopped() {
            return Err(Error::PoolStopped);
        }

        let mut state = self.state.lock();
        if state.phase == Phase::Stopped {
            return Err(Error::PoolStopped);
        }

        let id = WorkerId::new(self.shared.counters.next_worker());
        let worker = Worker::spawn(id, Arc::clone(&self.shared), &self.spawn)?;
        state.workers.push(worker);
        self.shared.counters.worker_spawned();

        #[cfg(feature = "tracing")]
        tracing::debug!(workers = state.workers.len(), "Spawned worker {id}");
        drop(state);

        self.shared.emit(Event::WorkerAdded { worker: id });

        Ok(id)
    }

    /// Removes the most recently added worker and tells it to stop.
    ///
    /// Does not wait for the worker: if it is running a job, the job finishes
    /// in the background and is still accounted for by [`Pool::stop`].
    ///
    /// # Errors
    ///
    /// - [`Error::PoolStopped`] if the pool is stopped.
    /// - [`Error::NoWorkersLeft`] if the pool has no worker.
    pub fn remove_worker(&self) -> Result<WorkerId> {
        if self.is_stopped() {
            return Err(Error::PoolStopped);
        }

        let mut state = self.state.lock();
        if state.phase == Phase::Stopped {
            return Err(Error::PoolStopped);
        }

        let mut worker = state.workers.pop().ok_or(Error::NoWorkersLeft)?;
        worker.stop();
        let id = worker.id();

        // Only removed workers still finishing a job are kept for `stop`.
        let (exited, running) = core::mem::take(&mut state.retired)
            .into_iter()
            .partition::<Vec<_>, _>(Worker::is_finished);
        state.retired = running;
        state.retired.push(worker);
        self.shared.counters.worker_removed();

        #[cfg(feature = "tracing")]
        tracing::debug!(workers = state.workers.len(), "Removed worker {id}");
        drop(state);

        exited.into_iter().for_each(Worker::join);
        self.shared.emit(Event::WorkerRemoved { worker: id });

        Ok(id)
    }

    /// Hands `payload` to a worker, blocking until one accepts it.
    ///
    /// Returns the sequence number assigned to the job. The call returns once
    /// a worker dequeued the job, not once the job finished.
    ///
    /// With no worker in the pool this blocks until one is added.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PoolStopped`] if the pool is stopped or draining.
    pub fn add_job(&self, payload: J) -> Result<JobId> {
        let (jobs, envelope) = self.prepare(payload)?;
        let id = envelope.id;

        match jobs.send(envelope) {
            Ok(()) => Ok(self.accepted(id)),
            Err(_) => Err(Error::PoolStopped),
        }
    }

    /// Hands `payload` to a worker only if one is waiting for work right now.
    ///
    /// # Errors
    ///
    /// - [`Error::PoolStopped`] if the pool is stopped or draining.
    /// - [`Error::NoIdleWorker`] if every worker is busy (or there is none).
    pub fn try_add_job(&self, payload: J) -> Result<JobId> {
        let (jobs, envelope) = self.prepare(payload)?;
        let id = envelope.id;

        match jobs.try_send(envelope) {
            Ok(()) => Ok(self.accepted(id)),
            Err(TrySendError::Full(_)) => Err(Error::NoIdleWorker),
            Err(TrySendError::Disconnected(_)) => Err(Error::PoolStopped),
        }
    }

    /// Like [`Pool::add_job`], but gives up after `timeout`.
    ///
    /// # Errors
    ///
    /// - [`Error::PoolStopped`] if the pool is stopped or draining.
    /// - [`Error::Timeout`] if no worker accepted the job in time.
    pub fn add_job_timeout(&self, payload: J, timeout: Duration) -> Result<JobId> {
        let (jobs, envelope) = self.prepare(payload)?;
        let id = envelope.id;

        match jobs.send_timeout(envelope, timeout) {
            Ok(()) => Ok(self.accepted(id)),
            Err(SendTimeoutError::Timeout(_)) => Err(Error::Timeout),
            Err(SendTimeoutError::Disconnected(_)) => Err(Error::PoolStopped),
        }
    }

    /// Takes a completion count and a queue sender for one submission.
    ///
    /// Both are cloned under the state lock, which is what orders a
    /// submission strictly before or strictly after `stop` closing the queue.
    /// A rejected envelope releases its count when dropped.
    fn prepare(&self, payload: J) -> Result<(JobSender<J>, Envelope<J>)> {
        if self.is_stopped() {
            return Err(Error::PoolStopped);
        }

        let state = self.state.lock();
        let (Some(jobs), Some(pending)) = (state.jobs.as_ref(), state.pending.as_ref()) else {
            return Err(Error::PoolStopped);
        };

        let id = JobId::new(self.shared.counters.next_job());
        Ok((jobs.clone(), Envelope::new(id, payload, pending.clone())))
    }

    fn accepted(&self, id: JobId) -> JobId {
        self.shared.counters.job_accepted();
        id
    }

    /// Stops the pool.
    ///
    /// Closes the job queue, blocks until every accepted job has finished,
    /// stops every remaining worker and joins all worker threads, including
    /// the ones removed earlier.
    ///
    /// A panicking job does not take its worker down: the panic is caught,
    /// reported as [`Event::JobPanicked`] and the job counts as finished.
    ///
    /// If an accepted submission is still waiting for a worker (the pool has
    /// none left), the drain lasts until [`Pool::add_worker`] is called.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PoolStopped`] if the pool is already stopped or
    /// another `stop` is in progress. This never blocks.
    pub fn stop(&self) -> Result<()> {
        if self.is_stopped() {
            return Err(Error::PoolStopped);
        }

        // === Phase 1: Close the queue ===
        let pending = {
            let mut state = self.state.lock();
            if state.phase != Phase::Running {
                return Err(Error::PoolStopped);
            }
            state.phase = Phase::Draining;
            state.jobs = None;
            state.pending.take()
        };

        // === Phase 2: Drain accepted jobs ===
        #[cfg(feature = "tracing")]
        tracing::debug!("Job queue closed, waiting for accepted jobs");
        if let Some(pending) = pending {
            pending.wait();
        }

        // === Phase 3: Stop and join every worker ===
        let mut workers = {
            let mut state = self.state.lock();
            state.phase = Phase::Stopped;
            let mut workers = core::mem::take(&mut state.workers);
            workers.append(&mut state.retired);
            workers
        };

        #[cfg(feature = "tracing")]
        tracing::debug!("Stopping {} workers", workers.len());
        workers.iter_mut().for_each(Worker::stop);
        workers.into_iter().for_each(Worker::join);

        self.stopped.store(true, Ordering::Release);

        #[cfg(feature = "tracing")]
        tracing::debug!("Worker pool shutdown complete");
        self.shared.emit(Event::PoolStopped);

        Ok(())
    }

    /// Whether [`Pool::stop`] has completed.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Number of workers currently in the pool.
    pub fn worker_count(&self) -> usize {
        self.state.lock().workers.len()
    }

    /// Ids of the workers currently in the pool, oldest first.
    pub fn worker_ids(&self) -> Vec<WorkerId> {
        self.state.lock().workers.iter().map(Worker::id).collect()
    }

    pub fn stats(&self) -> PoolStats {
        let workers = self.worker_count();
        self.shared.counters.snapshot(workers)
    }
}

impl<J: Send + 'static> Drop for Pool<J> {
    /// A pool dropped without [`Pool::stop`] closes its queue and signals every
    /// worker, then detaches the threads instead of waiting for them.
    fn drop(&mut self) {
        let state = self.state.get_mut();
        if state.phase == Phase::Stopped {
            return;
        }
        state.phase = Phase::Stopped;
        state.jobs = None;

        for worker in state.workers.iter_mut().chain(state.retired.iter_mut()) {
            worker.stop();
        }
    }
}
