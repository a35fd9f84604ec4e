//! Error types for the worker pool.
//!
//! Every fallible pool operation returns [`Error`] as a value; none of them
//! panic. Retrying is left to the caller.
//!
//! ## Error Cases
//! - `PoolStopped`: the pool was stopped (or is being stopped).
//! - `NoWorkersLeft`: a worker removal was requested on an empty pool.
//! - `NoIdleWorker`: a non-blocking submission found no worker waiting.
//! - `Timeout`: a bounded submission was not accepted in time.
//! - `Spawn`: the operating system refused to start a worker thread.

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Unified error type for pool operations.
#[derive(Clone, thiserror::Error, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The pool no longer accepts work or resizes.
    ///
    /// Recoverable only by building a new pool.
    #[error("worker pool stopped")]
    PoolStopped,

    /// There is no worker left to remove.
    #[error("no more workers left to remove")]
    NoWorkersLeft,

    /// No worker was parked on the job queue at the time of submission.
    #[error("no idle worker to accept the job")]
    NoIdleWorker,

    /// No worker accepted the job before the deadline.
    #[error("timed out waiting for a worker to accept the job")]
    Timeout,

    /// Spawning a worker thread failed.
    #[error("failed to spawn worker thread: {context}")]
    Spawn { context: String },
}
