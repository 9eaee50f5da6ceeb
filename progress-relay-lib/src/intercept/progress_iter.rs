use super::ProgressReport;
use crate::monitor::WorkerError;
use core::error::Error;
use core::iter::FusedIterator;

/// Iterator adapter that advances a progress bar once per element.
///
/// The bar is advanced before each element is handed out and closed when the
/// underlying iterator runs dry.
#[derive(Debug)]
pub struct ProgressIter<I, P: ProgressReport> {
    iter: I,
    bar: P,
    exhausted: bool,
}

impl<I, P: ProgressReport> ProgressIter<I, P> {
    pub const fn new(iter: I, bar: P) -> Self {
        Self { iter, bar, exhausted: false }
    }

    /// The progress bar driven by this iterator.
    pub const fn bar(&self) -> &P {
        &self.bar
    }
}

impl<I: Iterator, P: ProgressReport> Iterator for ProgressIter<I, P> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        if let Some(item) = self.iter.next() {
            self.bar.advance(1);
            Some(item)
        } else {
            self.exhausted = true;
            self.bar.close();
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.exhausted { (0, Some(0)) } else { self.iter.size_hint() }
    }
}

impl<I: Iterator, P: ProgressReport> FusedIterator for ProgressIter<I, P> {}

/// Iterator adapter over fallible elements.
///
/// Successful elements advance the bar like [`ProgressIter`]. An `Err` element is
/// relayed through [`ProgressReport::fail`] and then yielded unchanged, so the
/// caller's own error handling still sees the original value.
#[derive(Debug)]
pub struct TryProgressIter<I, P: ProgressReport> {
    inner: ProgressIter<I, P>,
}

impl<I, P: ProgressReport> TryProgressIter<I, P> {
    pub const fn new(iter: I, bar: P) -> Self {
        Self {
            inner: ProgressIter::new(iter, bar),
        }
    }

    pub const fn bar(&self) -> &P {
        self.inner.bar()
    }
}

impl<I, P, T, E> Iterator for TryProgressIter<I, P>
where
    I: Iterator<Item = Result<T, E>>,
    P: ProgressReport,
    E: Error + 'static,
{
    type Item = Result<T, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.inner.exhausted {
            return None;
        }

        match self.inner.iter.next() {
            Some(Ok(item)) => {
                self.inner.bar.advance(1);
                Some(Ok(item))
            }
            Some(Err(e)) => {
                self.inner.bar.fail(WorkerError::captured(&e));
                Some(Err(e))
            }
            None => {
                self.inner.exhausted = true;
                self.inner.bar.close();
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<I, P, T, E> FusedIterator for TryProgressIter<I, P>
where
    I: Iterator<Item = Result<T, E>>,
    P: ProgressReport,
    E: Error + 'static,
{
}

/// Adds progress reporting to any iterator.
pub trait ProgressIteratorExt: Iterator + Sized {
    /// Advance `bar` once per element.
    fn with_progress<P: ProgressReport>(self, bar: P) -> ProgressIter<Self, P> {
        ProgressIter::new(self, bar)
    }

    /// Advance `bar` once per `Ok` element and relay `Err` elements to it.
    fn try_with_progress<P: ProgressReport>(self, bar: P) -> TryProgressIter<Self, P> {
        TryProgressIter::new(self, bar)
    }
}

impl<I: Iterator> ProgressIteratorExt for I {}
