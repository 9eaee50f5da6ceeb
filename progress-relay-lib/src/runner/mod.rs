//! Running blocking work on a worker thread while observing its progress
//!
//! [`run_with_progress`] resets a monitor, starts the work on a dedicated
//! thread, and hands back a [`ProgressStream`]. Iterating the stream yields
//! a snapshot per poll interval until the worker ends, then the worker's result
//! or its error. The worker never hands its outcome to the caller directly: it
//! stores it in the monitor and signals completion over a channel, which also
//! lets the stream wake up as soon as the worker is done.
//!
//! [`run_and_wait`] drains a stream when only the outcome matters.

mod driver;
mod progress_stream;
mod run_error;
mod run_options;

pub use driver::{drain, run_and_wait, run_and_wait_global};
pub use progress_stream::{ProgressRecord, ProgressStream, run_with_global_progress, run_with_progress};
pub use run_error::RunError;
pub use run_options::{DEFAULT_POLL_INTERVAL, RunOptions};
