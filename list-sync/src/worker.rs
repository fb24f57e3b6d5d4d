//! Background load worker
//!
//! `request_load` hands a job to this thread and returns immediately. The
//! worker performs the fetch off the owner thread and reports completion
//! through the controller's listeners.
//!
//! The job channel holds a single slot. Requests made while a job is
//! already waiting merge into it; a request made while a fetch runs fills
//! the slot again and causes exactly one more fetch.

use std::sync::mpsc::{self, TrySendError};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::controller::Inner;
use crate::error::{Result, SyncError};

pub(crate) enum LoadJob {
    Load,
}

struct WorkerHandle {
    tx: mpsc::SyncSender<LoadJob>,
    thread: JoinHandle<()>,
}

/// Lazily spawned worker owning the receiving end of the job channel
///
/// The worker only holds a weak reference to the controller state, so
/// dropping the controller drops the sender and ends the thread.
pub(crate) struct LoadWorker {
    thread_name: String,
    handle: Mutex<Option<WorkerHandle>>,
}

impl LoadWorker {
    pub(crate) fn new(thread_name: impl Into<String>) -> Self {
        Self {
            thread_name: thread_name.into(),
            handle: Mutex::new(None),
        }
    }

    /// Queue a load, spawning the worker if it is not running
    pub(crate) fn dispatch(&self, inner: &Arc<Inner>) -> Result<()> {
        let mut handle = self.handle.lock();

        if let Some(worker) = handle.as_ref() {
            match worker.tx.try_send(LoadJob::Load) {
                Ok(()) => return Ok(()),
                Err(TrySendError::Full(_)) => {
                    trace!("Load already pending, request merged");
                    return Ok(());
                }
                Err(TrySendError::Disconnected(_)) => {
                    warn!("Load worker '{}' exited, respawning", self.thread_name);
                }
            }
        }

        let worker = spawn_load_worker(&self.thread_name, Arc::downgrade(inner))?;
        worker
            .tx
            .try_send(LoadJob::Load)
            .map_err(|_| SyncError::WorkerUnavailable)?;
        *handle = Some(worker);
        Ok(())
    }

    /// Whether a worker thread exists and has not exited
    pub(crate) fn is_running(&self) -> bool {
        self.handle
            .lock()
            .as_ref()
            .is_some_and(|worker| !worker.thread.is_finished())
    }
}

fn spawn_load_worker(name: &str, inner: Weak<Inner>) -> Result<WorkerHandle> {
    let (tx, rx) = mpsc::sync_channel::<LoadJob>(1);

    let thread = thread::Builder::new()
        .name(name.to_string())
        .spawn(move || {
            debug!("Load worker started");

            // Receiving frees the slot before the fetch starts
            for job in rx {
                match job {
                    LoadJob::Load => {
                        let Some(inner) = inner.upgrade() else {
                            break;
                        };
                        inner.load();
                    }
                }
            }

            debug!("Load worker stopped");
        })
        .map_err(|e| {
            warn!("Failed to spawn load worker '{}': {}", name, e);
            SyncError::WorkerUnavailable
        })?;

    Ok(WorkerHandle { tx, thread })
}
