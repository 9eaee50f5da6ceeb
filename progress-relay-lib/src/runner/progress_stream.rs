use super::{RunError, RunOptions};
use crate::monitor::{BoxError, ProgressMonitor, ProgressSnapshot, Status, WorkerError};
use crate::registry;
use core::fmt::{Debug, Formatter};
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::time::Duration;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use serde::Serialize;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Log target for the runner
const LOG_TARGET: &str = "    runner";

/// Name given to worker threads.
const WORKER_THREAD_NAME: &str = "progress-worker";

/// One element of a [`ProgressStream`].
///
/// Serializes as a flat mapping of the snapshot fields, plus `result` on the
/// terminal record only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressRecord<T> {
    #[serde(flatten)]
    pub snapshot: ProgressSnapshot,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
}

impl<T> ProgressRecord<T> {
    /// Returns `true` for the terminal record carrying the worker's result.
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.snapshot.status == Status::Completed
    }
}

/// Run `work` on a new thread and observe it through `monitor`.
///
/// The monitor is reset, then `work` starts on a dedicated worker thread. The
/// returned stream yields a snapshot every poll interval while the worker runs,
/// and then either a final `completed` record carrying the result or the
/// worker's error. A panic in `work` is reported as a
/// [`WorkerPanic`](crate::monitor::WorkerPanic) error.
///
/// Dropping the stream early does not stop the worker. The monitor stays busy
/// until the worker has finished and the stream has either yielded its terminal
/// item or been dropped.
///
/// # Errors
///
/// Returns [`RunError::Busy`] if an earlier run on the same monitor is still in
/// progress or its outcome has not been read by its stream yet, and
/// [`RunError::Spawn`] if the thread cannot be created.
pub fn run_with_progress<F, T, E>(monitor: &Arc<ProgressMonitor>, options: RunOptions, work: F) -> Result<ProgressStream<T>, RunError>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<BoxError>,
{
    if !monitor.try_begin_run() {
        return Err(RunError::Busy);
    }

    let claim = Arc::new(RunClaim(Arc::clone(monitor)));
    let worker_claim = Arc::clone(&claim);
    let (done_tx, done_rx) = crossbeam_channel::bounded(1);

    let spawned = thread::Builder::new().name(WORKER_THREAD_NAME.to_string()).spawn(move || {
        let monitor = &worker_claim.0;
        match catch_unwind(AssertUnwindSafe(work)) {
            Ok(Ok(value)) => monitor.set_result(value),
            Ok(Err(e)) => monitor.set_error(WorkerError::from_boxed(e)),
            Err(payload) => monitor.set_error(WorkerError::from_panic(&*payload)),
        }

        // the stream's claim keeps the outcome in place until it has been read
        drop(worker_claim);

        // the receiver may already be gone if the caller stopped listening
        let _ = done_tx.send(());
    });

    let worker = match spawned {
        Ok(handle) => handle,
        Err(e) => return Err(RunError::Spawn(e)),
    };

    log::debug!(target: LOG_TARGET, "Started worker, polling every {:?}", options.poll_interval());

    Ok(ProgressStream {
        monitor: Arc::clone(monitor),
        claim: Some(claim),
        done: done_rx,
        worker: Some(worker),
        poll_interval: options.poll_interval(),
        finished: false,
        result_type: PhantomData,
    })
}

/// Like [`run_with_progress`], using the process-wide monitor from the [`registry`].
///
/// # Errors
///
/// Returns [`RunError::Uninitialized`] before spawning anything if
/// [`registry::patch`] has never run, otherwise the errors of [`run_with_progress`].
pub fn run_with_global_progress<F, T, E>(options: RunOptions, work: F) -> Result<ProgressStream<T>, RunError>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<BoxError>,
{
    let monitor = registry::get_monitor().ok_or(RunError::Uninitialized)?;
    run_with_progress(&monitor, options, work)
}

/// Keeps a monitor busy for one run.
///
/// Shared by the worker and its stream. The monitor is released once both have
/// let go: the worker after storing its outcome, the stream after reading it or
/// when it is dropped or abandoned. A new run therefore cannot reset an outcome
/// that has not reached its own stream yet.
struct RunClaim(Arc<ProgressMonitor>);

impl Drop for RunClaim {
    fn drop(&mut self) {
        self.0.finish_run();
    }
}

/// Lazy, finite sequence of progress records for one run.
///
/// Each call to `next` waits up to one poll interval for the worker to finish.
/// If it is still running, the current snapshot is yielded. Once it has
/// finished, the terminal item is yielded: the final record, or the worker's
/// error. After that the stream is exhausted.
pub struct ProgressStream<T> {
    monitor: Arc<ProgressMonitor>,
    claim: Option<Arc<RunClaim>>,
    done: Receiver<()>,
    worker: Option<JoinHandle<()>>,
    poll_interval: Duration,
    finished: bool,
    result_type: PhantomData<fn() -> T>,
}

impl<T: 'static> ProgressStream<T> {
    /// The monitor this run reports into.
    #[must_use]
    pub const fn monitor(&self) -> &Arc<ProgressMonitor> {
        &self.monitor
    }

    /// Returns `true` once the terminal item has been yielded.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Stop observing the run, giving the worker up to `timeout` to finish.
    ///
    /// The worker cannot be cancelled; this is only a bounded wait.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Abandoned`] if the worker is still running after `timeout`.
    /// The thread keeps running and the monitor stays busy until it ends.
    pub fn abandon(mut self, timeout: Duration) -> Result<(), RunError> {
        if self.finished {
            return Ok(());
        }

        self.finished = true;
        match self.done.recv_timeout(timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                self.join_worker();
                Ok(())
            }
            Err(RecvTimeoutError::Timeout) => {
                log::warn!(target: LOG_TARGET, "Worker did not finish within {timeout:?}, leaving it running");
                drop(self.worker.take());
                Err(RunError::Abandoned { waited: timeout })
            }
        }
    }

    fn join_worker(&mut self) {
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            log::error!(target: LOG_TARGET, "Worker thread terminated abnormally");
        }
    }

    fn conclude(&self) -> Result<ProgressRecord<T>, RunError> {
        if let Some(error) = self.monitor.get_exception() {
            log::debug!(target: LOG_TARGET, "Worker failed: {error}");
            return Err(RunError::Worker(error));
        }

        let result = self.monitor.take_result::<T>().ok_or(RunError::ResultUnavailable)?;
        log::debug!(target: LOG_TARGET, "Worker completed");

        Ok(ProgressRecord {
            snapshot: self.monitor.get_progress().with_status(Status::Completed),
            result: Some(result),
        })
    }
}

impl<T: 'static> Iterator for ProgressStream<T> {
    type Item = Result<ProgressRecord<T>, RunError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.done.recv_timeout(self.poll_interval) {
            Err(RecvTimeoutError::Timeout) => Some(Ok(ProgressRecord {
                snapshot: self.monitor.get_progress(),
                result: None,
            })),
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                self.finished = true;
                self.join_worker();
                let outcome = self.conclude();
                self.claim = None;
                Some(outcome)
            }
        }
    }
}

impl<T: 'static> FusedIterator for ProgressStream<T> {}

impl<T> Debug for ProgressStream<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProgressStream")
            .field("monitor", &self.monitor)
            .field("worker", &self.worker)
            .field("poll_interval", &self.poll_interval)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}
