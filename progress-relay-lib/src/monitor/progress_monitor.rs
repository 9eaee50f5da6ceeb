use super::{ProgressSnapshot, Status, WorkerError};
use core::any::Any;
use core::fmt::{Debug, Formatter};
use std::sync::{Mutex, MutexGuard};

/// Log target for the monitor
const LOG_TARGET: &str = "   monitor";

#[derive(Default)]
struct MonitorState {
    snapshot: ProgressSnapshot,
    error: Option<WorkerError>,
    result: Option<Box<dyn Any + Send>>,
    busy: bool,
}

/// Shared, lock-protected holder of a run's progress, result, and error.
///
/// Every method takes the same lock for the duration of a single field update
/// or copy, so a reader never observes a half-written update. No method runs
/// caller code while holding the lock.
///
/// The stored result is type-erased so one monitor, including the process-wide
/// one owned by the [`registry`](crate::registry), can serve runs returning
/// different types.
pub struct ProgressMonitor {
    state: Mutex<MonitorState>,
}

impl ProgressMonitor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MonitorState {
                snapshot: ProgressSnapshot::ready(),
                ..MonitorState::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MonitorState> {
        self.state.lock().expect("lock poisoned")
    }

    /// Record progress and mark the monitor as running.
    pub fn update(&self, current: u64, total: u64, description: &str) {
        let snapshot = ProgressSnapshot::new(current, total, description, Status::Running);
        self.lock().snapshot = snapshot;
    }

    /// Returns a copy of the current progress.
    #[must_use]
    pub fn get_progress(&self) -> ProgressSnapshot {
        self.lock().snapshot.clone()
    }

    /// Store an error and mark the monitor as failed.
    pub fn set_error(&self, error: WorkerError) {
        log::debug!(target: LOG_TARGET, "Recording worker error: {error}");

        let mut state = self.lock();
        state.error = Some(error);
        state.snapshot.status = Status::Error;
    }

    /// Returns the stored error, if any.
    #[must_use]
    pub fn get_exception(&self) -> Option<WorkerError> {
        self.lock().error.clone()
    }

    /// Store the worker's return value. The status is left untouched.
    pub fn set_result<T: Any + Send>(&self, value: T) {
        self.lock().result = Some(Box::new(value));
    }

    /// Returns a copy of the stored result if it is of type `T`.
    #[must_use]
    pub fn get_result<T: Any + Clone>(&self) -> Option<T> {
        self.lock().result.as_ref().and_then(|value| value.downcast_ref::<T>()).cloned()
    }

    /// Removes and returns the stored result if it is of type `T`.
    ///
    /// A result of any other type stays in place.
    #[must_use]
    pub fn take_result<T: Any>(&self) -> Option<T> {
        let mut state = self.lock();
        match state.result.take()?.downcast::<T>() {
            Ok(value) => Some(*value),
            Err(other) => {
                state.result = Some(other);
                None
            }
        }
    }

    /// Returns `true` if a result is stored, whatever its type.
    #[must_use]
    pub fn has_result(&self) -> bool {
        self.lock().result.is_some()
    }

    /// Return to the `ready` state and clear any error and result.
    pub fn reset(&self) {
        let mut state = self.lock();
        Self::reset_locked(&mut state);
    }

    fn reset_locked(state: &mut MonitorState) {
        state.snapshot = ProgressSnapshot::ready();
        state.error = None;
        state.result = None;
    }

    /// Claim the monitor for a new run and reset it.
    ///
    /// Returns `false` without touching any state when the worker of a previous
    /// run has not finished yet.
    pub(crate) fn try_begin_run(&self) -> bool {
        let mut state = self.lock();
        if state.busy {
            return false;
        }

        state.busy = true;
        Self::reset_locked(&mut state);
        true
    }

    /// Release the claim taken by [`Self::try_begin_run`].
    pub(crate) fn finish_run(&self) {
        self.lock().busy = false;
    }

    /// Returns `true` while a worker is associated with this monitor.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.lock().busy
    }
}

impl Default for ProgressMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for ProgressMonitor {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let state = self.lock();
        f.debug_struct("ProgressMonitor")
            .field("snapshot", &state.snapshot)
            .field("error", &state.error)
            .field("result", &state.result.as_ref().map(|_| "<result>"))
            .field("busy", &state.busy)
            .finish()
    }
}
