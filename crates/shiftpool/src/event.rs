//! Observability side channel.
//!
//! The pool reports what it does through an [`Observer`]. Observers have no
//! way to influence control flow; a slow observer only slows down the thread
//! that emitted the event.

use crate::{JobId, WorkerId};
use core::fmt;

/// Why a worker left its execution loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The job queue was closed and empty.
    ChannelClosed,
    /// The worker's own stop signal fired.
    Signalled,
}

/// A single observable pool event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// A worker was spawned and registered.
    WorkerAdded { worker: WorkerId },
    /// A worker was taken out of the pool and told to stop.
    WorkerRemoved { worker: WorkerId },
    /// A worker dequeued a job and is about to run it.
    JobStarted { worker: WorkerId, job: JobId },
    /// A worker finished running a job.
    JobFinished { worker: WorkerId, job: JobId },
    /// A job's handler panicked. The worker survives and keeps pulling jobs.
    JobPanicked { worker: WorkerId, job: JobId },
    /// A worker thread is exiting.
    WorkerStopped { worker: WorkerId, reason: StopReason },
    /// `stop` completed: every accepted job ran and every worker was joined.
    PoolStopped,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WorkerAdded { worker } => write!(f, "New worker started: id {worker}"),
            Self::WorkerRemoved { worker } => write!(f, "Worker removed: id {worker}"),
            Self::JobStarted { worker, job } => write!(f, "Worker {worker} accepted job {job}"),
            Self::JobFinished { worker, job } => write!(f, "Worker {worker} finished job {job}"),
            Self::JobPanicked { worker, job } => write!(f, "Worker {worker}: job {job} panicked"),
            Self::WorkerStopped {
                worker,
                reason: StopReason::ChannelClosed,
            } => write!(f, "Worker {worker}: job channel closed"),
            Self::WorkerStopped {
                worker,
                reason: StopReason::Signalled,
            } => write!(f, "Worker {worker} stopping"),
            Self::PoolStopped => write!(f, "Worker pool stopped"),
        }
    }
}

/// Receives every [`Event`] emitted by a pool and its workers.
///
/// Called from worker threads as well as from the threads driving the pool, so
/// implementations must be thread safe.
pub trait Observer: Send + Sync + 'static {
    fn on_event(&self, event: &Event);
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn on_event(&self, _event: &Event) {}
}

/// Writes every event as a `tracing` record.
///
/// Worker and pool lifecycle events are logged at `INFO`, job events at
/// `DEBUG`, panicked jobs at `WARN`.
#[cfg(feature = "tracing")]
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

#[cfg(feature = "tracing")]
impl Observer for LogObserver {
    fn on_event(&self, event: &Event) {
        match event {
            Event::JobStarted { worker, job } | Event::JobFinished { worker, job } => {
                tracing::debug!(worker = worker.get(), job = job.get(), "{event}");
            }
            Event::JobPanicked { worker, job } => {
                tracing::warn!(worker = worker.get(), job = job.get(), "{event}");
            }
            Event::WorkerAdded { worker }
            | Event::WorkerRemoved { worker }
            | Event::WorkerStopped { worker, .. } => {
                tracing::info!(worker = worker.get(), "{event}");
            }
            Event::PoolStopped => tracing::info!("{event}"),
        }
    }
}

impl<O: Observer> Observer for std::sync::Arc<O> {
    fn on_event(&self, event: &Event) {
        (**self).on_event(event);
    }
}
