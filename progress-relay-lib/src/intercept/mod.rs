//! Progress bars that report into a monitor instead of a terminal
//!
//! Long-running code reports progress through the [`ProgressReport`] trait. Three
//! implementations exist:
//!
//! - [`MonitoredBar`] forwards every state change to a
//!   [`ProgressMonitor`](crate::monitor::ProgressMonitor) and never draws anything.
//! - [`TerminalBar`] is an ordinary indicatif bar drawing to stderr.
//! - [`NoopProgress`] ignores everything.
//!
//! Code that can accept a bar should simply take one. Code that builds its own
//! bars goes through a [`BarFactory`], usually the process-wide one held by the
//! [`registry`](crate::registry).

mod bar_factory;
mod monitored_bar;
mod progress_iter;
mod progress_report;
mod terminal_bar;

pub use bar_factory::{BarFactory, MonitoredBars, NoopBars, TerminalBars};
pub use monitored_bar::MonitoredBar;
pub use progress_iter::{ProgressIter, ProgressIteratorExt, TryProgressIter};
pub use progress_report::{BarOptions, NoopProgress, ProgressReport};
pub use terminal_bar::TerminalBar;
