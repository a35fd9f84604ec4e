//! Job transport between submitters and workers.
//!
//! Jobs travel over a zero-capacity (rendezvous) channel: a send completes only
//! when a worker receives. Each job is wrapped in an [`Envelope`] that carries
//! one count of the pool's completion [`WaitGroup`]; the count is released when
//! the envelope is dropped, which happens after the job ran, or immediately if
//! no worker ever accepted it.

use crate::JobId;
use crossbeam_channel::{Receiver, Sender};
use crossbeam_utils::sync::WaitGroup;

pub(crate) type JobSender<J> = Sender<Envelope<J>>;
pub(crate) type JobReceiver<J> = Receiver<Envelope<J>>;

/// Creates the rendezvous job queue.
pub(crate) fn job_channel<J>() -> (JobSender<J>, JobReceiver<J>) {
    crossbeam_channel::bounded(0)
}

pub(crate) struct Envelope<J> {
    pub(crate) id: JobId,
    pub(crate) payload: J,
    pub(crate) pending: WaitGroup,
}

impl<J> Envelope<J> {
    pub(crate) const fn new(id: JobId, payload: J, pending: WaitGroup) -> Self {
        Self {
            id,
            payload,
            pending,
        }
    }
}
