use crate::{
    NoopObserver, Observer, Pool, Result, WorkerId,
    worker::{Handler, SpawnConfig},
};

/// Default prefix for worker thread names.
pub const DEFAULT_THREAD_PREFIX: &str = "shiftpool-worker";

/// Configures and builds a [`Pool`].
///
/// ```
/// use shiftpool::{NoopObserver, PoolBuilder};
///
/// let pool = PoolBuilder::new()
///     .initial_workers(4)
///     .thread_name_prefix("resize-demo")
///     .observer(NoopObserver)
///     .build(|_worker, job: String| drop(job))?;
///
/// assert_eq!(pool.worker_count(), 4);
/// pool.stop()?;
/// # Ok::<(), shiftpool::Error>(())
/// ```
pub struct PoolBuilder {
    initial_workers: usize,
    spawn: SpawnConfig,
    observer: Box<dyn Observer>,
}

impl Default for PoolBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PoolBuilder {
    pub fn new() -> Self {
        Self {
            initial_workers: 0,
            spawn: SpawnConfig {
                name_prefix: DEFAULT_THREAD_PREFIX.to_string(),
                stack_size: None,
            },
            observer: Box::new(NoopObserver),
        }
    }

    /// Number of workers spawned by [`PoolBuilder::build`]. Zero is allowed;
    /// such a pool can grow later through [`Pool::add_worker`].
    #[must_use]
    pub fn initial_workers(mut self, count: usize) -> Self {
        self.initial_workers = count;
        self
    }

    /// Worker threads are named `<prefix>-<worker id>`.
    #[must_use]
    pub fn thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.spawn.name_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn stack_size(mut self, bytes: usize) -> Self {
        self.spawn.stack_size = Some(bytes);
        self
    }

    /// Sink for every [`crate::Event`] the pool and its workers emit.
    #[must_use]
    pub fn observer(mut self, observer: impl Observer) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Builds the pool and synchronously spawns the initial workers.
    ///
    /// `handler` is the processing logic run for every job, on the thread of
    /// the worker that accepted it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Spawn`] if a worker thread cannot be started. The
    /// workers spawned before the failure are told to stop.
    pub fn build<J, F>(self, handler: F) -> Result<Pool<J>>
    where
        J: Send + 'static,
        F: Fn(WorkerId, J) + Send + Sync + 'static,
    {
        let handler: Handler<J> = Box::new(handler);
        let pool = Pool::with_parts(handler, self.observer, self.spawn);

        for _ in 0..self.initial_workers {
            pool.add_worker()?;
        }

        Ok(pool)
    }
}
