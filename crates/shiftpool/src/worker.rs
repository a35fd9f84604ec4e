use crate::{
    Error, Event, JobId, Observer, Result, StopReason, WorkerId,
    channel::{Envelope, JobReceiver},
    stats::Counters,
};
use crossbeam_channel::{Receiver, Sender, TryRecvError, select};
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

/// Processing logic run by workers for every job.
pub(crate) type Handler<J> = Box<dyn Fn(WorkerId, J) + Send + Sync + 'static>;

/// State shared by a pool and every worker it spawned.
pub(crate) struct Shared<J> {
    pub(crate) jobs: JobReceiver<J>,
    pub(crate) handler: Handler<J>,
    pub(crate) observer: Box<dyn Observer>,
    pub(crate) counters: Counters,
}

impl<J> Shared<J> {
    pub(crate) fn emit(&self, event: Event) {
        self.observer.on_event(&event);
    }
}

/// Thread settings applied to every spawned worker.
#[derive(Clone, Debug)]
pub(crate) struct SpawnConfig {
    pub(crate) name_prefix: String,
    pub(crate) stack_size: Option<usize>,
}

/// One-shot cancellation for a single worker.
///
/// The worker holds the receiving end of a zero-capacity channel that nobody
/// ever sends on; dropping the sender disconnects it, which wakes the worker
/// out of `select!`. Firing more than once is a no-op.
struct StopSignal(Option<Sender<()>>);

impl StopSignal {
    fn new() -> (Self, Receiver<()>) {
        let (tx, rx) = crossbeam_channel::bounded(0);
        (Self(Some(tx)), rx)
    }

    fn fire(&mut self) {
        self.0.take();
    }
}

/// Pool-side handle to a running worker thread.
pub(crate) struct Worker {
    id: WorkerId,
    stop: StopSignal,
    thread: JoinHandle<()>,
}

impl Worker {
    /// Spawns a worker thread named `<prefix>-<id>` that immediately starts
    /// pulling jobs.
    pub(crate) fn spawn<J: Send + 'static>(
        id: WorkerId,
        shared: std::sync::Arc<Shared<J>>,
        config: &SpawnConfig,
    ) -> Result<Self> {
        let (stop, stop_rx) = StopSignal::new();

        let mut builder = thread::Builder::new().name(format!("{}-{id}", config.name_prefix));
        if let Some(size) = config.stack_size {
            builder = builder.stack_size(size);
        }

        let thread = builder
            .spawn(move || worker_loop(id, &shared, &stop_rx))
            .map_err(|e| Error::Spawn {
                context: format!("worker {id}: {e}"),
            })?;

        Ok(Self { id, stop, thread })
    }

    pub(crate) const fn id(&self) -> WorkerId {
        self.id
    }

    /// Signals the worker to leave its loop. A job it already dequeued still
    /// runs to completion.
    pub(crate) fn stop(&mut self) {
        self.stop.fire();
    }

    /// Whether the worker thread has already exited.
    pub(crate) fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Waits for the worker thread to exit.
    ///
    /// Job panics are caught inside the loop, so a join error can only come
    /// from a panicking observer.
    pub(crate) fn join(self) {
        let _id = self.id;
        if let Err(_panic) = self.thread.join() {
            #[cfg(feature = "tracing")]
            tracing::warn!("Worker {_id} thread panicked");
        }
    }
}

/// Execution loop of a single worker.
///
/// Runs until either the job queue is closed and drained, or the worker's stop
/// signal fires. The stop signal is checked before every pull so that a
/// removed worker does not race for another job, but it never interrupts a
/// job that was already dequeued.
fn worker_loop<J>(id: WorkerId, shared: &Shared<J>, stop: &Receiver<()>) {
    #[cfg(feature = "tracing")]
    tracing::trace!("Worker {id} started");

    let reason = loop {
        if let Err(TryRecvError::Disconnected) = stop.try_recv() {
            break StopReason::Signalled;
        }

        select! {
            recv(shared.jobs) -> msg => match msg {
                Ok(envelope) => run_job(id, shared, envelope),
                Err(_) => break StopReason::ChannelClosed,
            },
            recv(stop) -> _ => break StopReason::Signalled,
        }
    };

    shared.emit(Event::WorkerStopped { worker: id, reason });

    #[cfg(feature = "tracing")]
    tracing::trace!("Worker {id} stopped: {reason:?}");
}

fn run_job<J>(worker: WorkerId, shared: &Shared<J>, envelope: Envelope<J>) {
    let Envelope {
        id: job,
        payload,
        pending,
    } = envelope;

    shared.emit(Event::JobStarted { worker, job });
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| (shared.handler)(worker, payload)));
    finish_job(worker, shared, job, outcome.is_err());

    // Released last: `stop` must not observe a drained queue before the
    // completion above has been recorded.
    drop(pending);
}

fn finish_job<J>(worker: WorkerId, shared: &Shared<J>, job: JobId, panicked: bool) {
    shared.counters.job_completed();
    if panicked {
        shared.counters.job_panicked();
        shared.emit(Event::JobPanicked { worker, job });
    } else {
        shared.emit(Event::JobFinished { worker, job });
    }
}
