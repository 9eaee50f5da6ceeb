//! Shared progress state
//!
//! A [`ProgressMonitor`] is the single point of contact between a worker thread
//! and whoever observes it. The worker side (usually through an interceptor bar)
//! writes progress, a result, or an error; the observer side reads
//! [`ProgressSnapshot`] copies. All access is serialized by one mutex.

mod progress_monitor;
mod progress_snapshot;
mod worker_error;

pub use progress_monitor::ProgressMonitor;
pub use progress_snapshot::{ProgressSnapshot, Status, percentage};
pub use worker_error::{BoxError, CapturedError, WorkerError, WorkerPanic};
