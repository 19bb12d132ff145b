//! Serialized mutation pipeline.
//!
//! All document rewrites funnel through one bounded FIFO queue drained by a
//! single worker thread, so two mutations never interleave their
//! read-modify-write cycles, whether or not they target the same note.

use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, bounded, select};

use super::errors::{MutationError, MutationKind, VaultError};

/// Maximum pending jobs; a full queue blocks the submitter.
pub(crate) const PIPELINE_CAPACITY: usize = 100;

/// Handler invoked with failures of asynchronously submitted mutations.
pub type ErrorHandler = Arc<dyn Fn(MutationError) + Send + Sync>;

pub(crate) struct QueuedJob {
    pub(crate) kind: MutationKind,
    pub(crate) item: String,
    pub(crate) run: Box<dyn FnOnce() -> Result<(), VaultError> + Send>,
}

pub(crate) struct Pipeline {
    jobs: Sender<QueuedJob>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Pipeline {
    /// Spawn the worker. It drains jobs strictly in submission order and
    /// exits when `stop` fires, abandoning whatever is still queued.
    pub(crate) fn start(stop: Receiver<()>, handler: ErrorHandler) -> Self {
        let (jobs_tx, jobs_rx) = bounded::<QueuedJob>(PIPELINE_CAPACITY);

        let worker = thread::spawn(move || {
            loop {
                select! {
                    recv(jobs_rx) -> msg => {
                        let Ok(job) = msg else { return };
                        if let Err(source) = (job.run)() {
                            let err = MutationError { kind: job.kind, item: job.item, source };
                            tracing::error!(error = %err, "pipeline job failed");
                            // Handler runs off the worker so a slow handler
                            // cannot stall the queue.
                            let handler = Arc::clone(&handler);
                            thread::spawn(move || handler(err));
                        }
                    }
                    recv(stop) -> _ => return,
                }
            }
        });

        Pipeline { jobs: jobs_tx, worker: Mutex::new(Some(worker)) }
    }

    /// Enqueue a job; blocks while the queue is at capacity.
    pub(crate) fn submit(&self, job: QueuedJob) -> Result<(), VaultError> {
        self.jobs.send(job).map_err(|_| VaultError::Cancelled)
    }

    /// Wait for the worker to exit. Call after the stop channel fired.
    pub(crate) fn join(&self) {
        let handle = self.worker.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(handle) = handle {
            let _ = handle.join();
        }
    }
}
