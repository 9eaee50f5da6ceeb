//! Process-wide progress bar interception
//!
//! Code that constructs its own progress bars cannot be handed a monitored one.
//! Such code asks this registry for a bar ([`new_bar`], [`wrap_iter`],
//! [`wrap_try_iter`]) and gets whatever the active [`BarFactory`] produces:
//! ordinary terminal bars by default, or bars feeding the process-wide
//! [`ProgressMonitor`] once [`patch`] has run.
//!
//! # Ordering
//!
//! [`patch`] must run before constructing any component that captures the
//! factory returned by [`bars`]. A captured factory is a value: patching later
//! does not reach it, and the component keeps drawing to the terminal. Code that
//! resolves the factory per call through [`new_bar`] is not affected.

use crate::intercept::{BarFactory, BarOptions, MonitoredBars, ProgressIter, ProgressReport, TerminalBars, TryProgressIter};
use crate::monitor::ProgressMonitor;
use std::sync::{Arc, LazyLock, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Log target for the registry
const LOG_TARGET: &str = "  registry";

struct Registry {
    monitor: Option<Arc<ProgressMonitor>>,
    active: Arc<dyn BarFactory>,
    patched: bool,
}

static REGISTRY: LazyLock<RwLock<Registry>> = LazyLock::new(|| {
    RwLock::new(Registry {
        monitor: None,
        active: Arc::new(TerminalBars),
        patched: false,
    })
});

fn read() -> RwLockReadGuard<'static, Registry> {
    REGISTRY.read().expect("lock poisoned")
}

fn write() -> RwLockWriteGuard<'static, Registry> {
    REGISTRY.write().expect("lock poisoned")
}

/// Route every subsequently created bar into the process-wide monitor.
///
/// Creates the monitor on first use. Calling this again is harmless: the same
/// monitor is returned and the installed factory is left as is.
pub fn patch() -> Arc<ProgressMonitor> {
    let mut registry = write();

    let monitor = Arc::clone(registry.monitor.get_or_insert_with(|| {
        log::debug!(target: LOG_TARGET, "Creating process-wide progress monitor");
        Arc::new(ProgressMonitor::new())
    }));

    if !registry.patched {
        registry.active = Arc::new(MonitoredBars::new(Arc::clone(&monitor)));
        registry.patched = true;
        log::debug!(target: LOG_TARGET, "Progress bars now report to the monitor");
    }

    monitor
}

/// Restore terminal bars. The process-wide monitor is kept as is.
pub fn unpatch() {
    let mut registry = write();
    if registry.patched {
        registry.active = Arc::new(TerminalBars);
        registry.patched = false;
        log::debug!(target: LOG_TARGET, "Progress bars restored to terminal output");
    }
}

#[must_use]
pub fn is_patched() -> bool {
    read().patched
}

/// The process-wide monitor, if [`patch`] has ever run.
#[must_use]
pub fn get_monitor() -> Option<Arc<ProgressMonitor>> {
    read().monitor.clone()
}

/// Reset the process-wide monitor, if there is one.
pub fn reset_monitor() {
    if let Some(monitor) = get_monitor() {
        monitor.reset();
    }
}

/// The factory active right now.
///
/// See the [module documentation](self) for why holding on to it matters.
#[must_use]
pub fn bars() -> Arc<dyn BarFactory> {
    Arc::clone(&read().active)
}

/// Create a bar from the active factory.
#[must_use]
pub fn new_bar(options: BarOptions) -> Box<dyn ProgressReport> {
    bars().create(options)
}

/// Wrap an iterator with a bar from the active factory.
///
/// Without an explicit total, an exact size hint is used as the total.
pub fn wrap_iter<I: IntoIterator>(iter: I, options: BarOptions) -> ProgressIter<I::IntoIter, Box<dyn ProgressReport>> {
    let iter = iter.into_iter();
    let options = options.or_total_from_size_hint(iter.size_hint());
    ProgressIter::new(iter, new_bar(options))
}

/// Like [`wrap_iter`], for iterators of `Result` whose errors should reach the monitor.
pub fn wrap_try_iter<I: IntoIterator>(iter: I, options: BarOptions) -> TryProgressIter<I::IntoIter, Box<dyn ProgressReport>> {
    let iter = iter.into_iter();
    let options = options.or_total_from_size_hint(iter.size_hint());
    TryProgressIter::new(iter, new_bar(options))
}

/// Serializes unit tests that touch the process-wide registry.
#[cfg(test)]
pub(crate) fn test_guard() -> std::sync::MutexGuard<'static, ()> {
    static SERIAL: std::sync::Mutex<()> = std::sync::Mutex::new(());
    SERIAL.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}
