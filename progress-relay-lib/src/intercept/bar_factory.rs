use super::{BarOptions, MonitoredBar, NoopProgress, ProgressReport, TerminalBar};
use crate::monitor::ProgressMonitor;
use core::fmt::Debug;
use std::sync::Arc;

/// Creates progress bars on behalf of code that cannot be handed one directly.
pub trait BarFactory: Send + Sync + Debug {
    fn create(&self, options: BarOptions) -> Box<dyn ProgressReport>;
}

/// Produces [`TerminalBar`]s drawing to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBars;

impl BarFactory for TerminalBars {
    fn create(&self, options: BarOptions) -> Box<dyn ProgressReport> {
        Box::new(TerminalBar::new(options))
    }
}

/// Produces [`MonitoredBar`]s that all feed the same monitor.
#[derive(Debug, Clone)]
pub struct MonitoredBars {
    monitor: Arc<ProgressMonitor>,
}

impl MonitoredBars {
    #[must_use]
    pub const fn new(monitor: Arc<ProgressMonitor>) -> Self {
        Self { monitor }
    }

    #[must_use]
    pub const fn monitor(&self) -> &Arc<ProgressMonitor> {
        &self.monitor
    }
}

impl BarFactory for MonitoredBars {
    fn create(&self, options: BarOptions) -> Box<dyn ProgressReport> {
        Box::new(MonitoredBar::new(Arc::clone(&self.monitor), options))
    }
}

/// Produces bars that ignore every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopBars;

impl BarFactory for NoopBars {
    fn create(&self, _options: BarOptions) -> Box<dyn ProgressReport> {
        Box::new(NoopProgress)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_monitored_bars_share_one_monitor() {
        let monitor = Arc::new(ProgressMonitor::new());
        let factory = MonitoredBars::new(Arc::clone(&monitor));

        let first = factory.create(BarOptions::new().with_total(2).with_description("first"));
        first.advance(1);
        assert_eq!(monitor.get_progress().description, "first");

        let second = factory.create(BarOptions::new().with_total(4).with_description("second"));
        second.advance(3);
        let snapshot = monitor.get_progress();
        assert_eq!(snapshot.description, "second");
        assert_eq!(snapshot.current, 3);
        assert!(Arc::ptr_eq(factory.monitor(), &monitor));
    }

    #[test]
    fn test_noop_bars_leave_monitor_alone() {
        let bar = NoopBars.create(BarOptions::new().with_total(2));
        bar.advance(2);
        bar.close();
    }
}
