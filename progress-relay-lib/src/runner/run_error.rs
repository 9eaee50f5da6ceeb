use crate::monitor::WorkerError;
use core::time::Duration;
use std::io;

/// Errors produced while starting, observing, or abandoning a monitored run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// No process-wide monitor exists yet.
    #[error("progress monitor not initialized, call registry::patch() first")]
    Uninitialized,

    /// The poll interval was zero, negative, or not a number.
    #[error("poll interval must be a positive number of seconds, got {0}")]
    InvalidPollInterval(f64),

    /// The monitor is still attached to the worker of an earlier run.
    #[error("a previous run on this monitor has not finished yet")]
    Busy,

    /// The worker thread could not be started.
    #[error("could not spawn worker thread")]
    Spawn(#[source] io::Error),

    /// The worker failed. The original error is kept as is.
    #[error(transparent)]
    Worker(WorkerError),

    /// The caller stopped waiting while the worker was still running.
    ///
    /// The worker is not stopped and may still finish later.
    #[error("worker still running after waiting {waited:?}, abandoning it")]
    Abandoned { waited: Duration },

    /// The worker finished but its result was missing or of another type.
    #[error("worker result is missing or not of the expected type")]
    ResultUnavailable,
}

impl RunError {
    /// The worker's original error, if this is a worker failure.
    #[must_use]
    pub const fn worker_error(&self) -> Option<&WorkerError> {
        match self {
            Self::Worker(e) => Some(e),
            _ => None,
        }
    }
}
