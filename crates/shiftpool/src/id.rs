use core::fmt;

/// Identifier of a worker, unique for the lifetime of its pool.
///
/// Ids are handed out from a spawn counter starting at `1`. Removing a worker
/// never frees its id for reuse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkerId(u64);

impl WorkerId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sequence number of a job, starting at `1`.
///
/// Reserved when a submission is prepared, before any worker accepts it: a
/// submission rejected with [`crate::Error::NoIdleWorker`] or
/// [`crate::Error::Timeout`] still consumes its number, and concurrent
/// submissions may be accepted in a different order than their ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(u64);

impl JobId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
