use super::{BarOptions, ProgressReport};
use crate::monitor::{ProgressMonitor, WorkerError};
use core::sync::atomic::{AtomicBool, Ordering};
use indicatif::{ProgressBar, ProgressDrawTarget};
use std::sync::{Arc, Mutex, MutexGuard};

/// Log target for intercepted bars
const LOG_TARGET: &str = " intercept";

/// A progress bar that feeds a [`ProgressMonitor`] instead of a terminal.
///
/// Position, length, and description live in an [`indicatif::ProgressBar`] bound to a
/// hidden draw target, so the bar behaves like a regular one but never writes a
/// byte. Every state change is forwarded to the monitor, whether or not the bar
/// was created disabled.
///
/// A bar may be driven from several threads at once. Each state change and its
/// forward happen under one per-bar lock, so the `current` values a single bar
/// forwards never go backwards.
#[derive(Debug)]
pub struct MonitoredBar {
    bar: ProgressBar,
    monitor: Arc<ProgressMonitor>,
    disabled: bool,
    closed: AtomicBool,
    forwarding: Mutex<()>,
}

impl MonitoredBar {
    #[must_use]
    pub fn new(monitor: Arc<ProgressMonitor>, options: BarOptions) -> Self {
        let bar = ProgressBar::with_draw_target(options.total, ProgressDrawTarget::hidden());
        bar.set_message(options.description);

        let this = Self {
            bar,
            monitor,
            disabled: options.disable,
            closed: AtomicBool::new(false),
            forwarding: Mutex::new(()),
        };

        if !this.disabled {
            this.monitor.update(0, this.total(), &this.description());
        }

        this
    }

    /// Current position.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Total amount of work, 0 when unknown.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.bar.length().unwrap_or(0)
    }

    #[must_use]
    pub fn description(&self) -> String {
        self.bar.message()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn serialize(&self) -> MutexGuard<'_, ()> {
        self.forwarding.lock().expect("lock poisoned")
    }

    fn forward(&self) {
        self.monitor.update(self.position(), self.total(), &self.description());
    }
}

impl ProgressReport for MonitoredBar {
    fn advance(&self, n: u64) {
        let _serial = self.serialize();
        self.bar.inc(n);
        self.forward();
    }

    fn set_total(&self, total: u64) {
        let _serial = self.serialize();
        self.bar.set_length(total);
        self.forward();
    }

    fn set_description(&self, description: &str) {
        let _serial = self.serialize();
        self.bar.set_message(description.to_string());
        self.forward();
    }

    fn refresh(&self) {
        let _serial = self.serialize();
        self.forward();
    }

    fn close(&self) {
        let _serial = self.serialize();
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        let total = self.total();
        if !self.disabled && total > 0 {
            // never report less than what was already forwarded
            self.monitor.update(self.position().max(total), total, &self.description());
        }

        log::trace!(target: LOG_TARGET, "Closed bar '{}' at {}/{total}", self.description(), self.position());
        self.bar.abandon();
    }

    fn fail(&self, error: WorkerError) {
        self.monitor.set_error(error);
    }
}

impl Drop for MonitoredBar {
    fn drop(&mut self) {
        self.close();
    }
}
