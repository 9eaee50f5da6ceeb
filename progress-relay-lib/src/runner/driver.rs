use super::{ProgressStream, RunError, RunOptions, run_with_global_progress, run_with_progress};
use crate::monitor::{BoxError, ProgressMonitor, ProgressSnapshot};
use std::sync::Arc;

/// Drain a stream, returning the final snapshot and the worker's result.
///
/// # Errors
///
/// Returns the first error the stream yields.
pub fn drain<T: 'static>(stream: ProgressStream<T>) -> Result<(ProgressSnapshot, T), RunError> {
    let mut last = None;
    for record in stream {
        last = Some(record?);
    }

    let record = last.ok_or(RunError::ResultUnavailable)?;
    let result = record.result.ok_or(RunError::ResultUnavailable)?;
    Ok((record.snapshot, result))
}

/// Run `work` with progress monitoring and block until it finishes.
///
/// # Errors
///
/// Returns the errors of [`run_with_progress`] and the worker's own error.
pub fn run_and_wait<F, T, E>(monitor: &Arc<ProgressMonitor>, options: RunOptions, work: F) -> Result<(ProgressSnapshot, T), RunError>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<BoxError>,
{
    drain(run_with_progress(monitor, options, work)?)
}

/// [`run_and_wait`] against the process-wide monitor.
///
/// # Errors
///
/// Returns [`RunError::Uninitialized`] if no process-wide monitor exists.
pub fn run_and_wait_global<F, T, E>(options: RunOptions, work: F) -> Result<(ProgressSnapshot, T), RunError>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<BoxError>,
{
    drain(run_with_global_progress(options, work)?)
}
