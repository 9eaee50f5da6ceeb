use crate::monitor::WorkerError;
use core::fmt::Debug;

/// A progress bar as seen by code doing long-running work.
///
/// Code that reports progress only talks to this trait, so the same code can
/// draw to a terminal, feed a [`ProgressMonitor`](crate::monitor::ProgressMonitor),
/// or do nothing at all depending on which implementation it was handed.
pub trait ProgressReport: Send + Sync + Debug {
    /// Move the position forward by `n` units.
    fn advance(&self, n: u64);

    /// Change the total amount of work. 0 means unknown.
    fn set_total(&self, total: u64);

    /// Change the text shown next to the bar.
    fn set_description(&self, description: &str);

    /// Publish the current state again without changing it.
    fn refresh(&self);

    /// Mark this bar as finished. Further calls after the first have no effect.
    fn close(&self);

    /// Relay an error that occurred while this bar was being driven.
    fn fail(&self, _error: WorkerError) {}
}

impl<P: ProgressReport + ?Sized> ProgressReport for Box<P> {
    fn advance(&self, n: u64) {
        (**self).advance(n);
    }

    fn set_total(&self, total: u64) {
        (**self).set_total(total);
    }

    fn set_description(&self, description: &str) {
        (**self).set_description(description);
    }

    fn refresh(&self) {
        (**self).refresh();
    }

    fn close(&self) {
        (**self).close();
    }

    fn fail(&self, error: WorkerError) {
        (**self).fail(error);
    }
}

/// A progress bar that discards every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressReport for NoopProgress {
    fn advance(&self, _n: u64) {}
    fn set_total(&self, _total: u64) {}
    fn set_description(&self, _description: &str) {}
    fn refresh(&self) {}
    fn close(&self) {}
}

/// Construction parameters shared by every progress bar implementation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BarOptions {
    /// Total amount of work, if known.
    pub total: Option<u64>,

    pub description: String,

    /// Suppress display. Monitored bars still forward `advance` and `refresh` calls.
    pub disable: bool,
}

impl BarOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub const fn disabled(mut self, disable: bool) -> Self {
        self.disable = disable;
        self
    }

    /// Fill in a missing total from an iterator's size hint when the hint is exact.
    #[must_use]
    pub fn or_total_from_size_hint(mut self, size_hint: (usize, Option<usize>)) -> Self {
        if self.total.is_none()
            && let (lower, Some(upper)) = size_hint
            && lower == upper
        {
            self.total = Some(lower as u64);
        }

        self
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_builder_methods() {
        let options = BarOptions::new().with_total(10).with_description("pages").disabled(true);
        assert_eq!(options.total, Some(10));
        assert_eq!(options.description, "pages");
        assert!(options.disable);
    }

    #[test]
    fn test_total_from_exact_size_hint() {
        let options = BarOptions::new().or_total_from_size_hint((0..7).size_hint());
        assert_eq!(options.total, Some(7));
    }

    #[test]
    fn test_total_from_inexact_size_hint_stays_unknown() {
        let options = BarOptions::new().or_total_from_size_hint((0..7).filter(|n| n % 2 == 0).size_hint());
        assert_eq!(options.total, None);
    }

    #[test]
    fn test_explicit_total_wins_over_size_hint() {
        let options = BarOptions::new().with_total(3).or_total_from_size_hint((0..7).size_hint());
        assert_eq!(options.total, Some(3));
    }

    #[test]
    fn test_noop_accepts_everything() {
        let bar: Box<dyn ProgressReport> = Box::new(NoopProgress);
        bar.advance(5);
        bar.set_total(10);
        bar.set_description("ignored");
        bar.refresh();
        bar.fail(WorkerError::from_boxed("ignored"));
        bar.close();
    }
}
