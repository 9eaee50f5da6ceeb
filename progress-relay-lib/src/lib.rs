#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for progress-relay
//!
//! Runs blocking work on a worker thread and lets the caller observe it as a
//! lazy sequence of progress snapshots, ending with the work's result or error.
//! Work that creates its own progress bars can be observed too, by routing bar
//! construction through a process-wide registry.
//!
//! # Module Organization
//!
//! - [`monitor`]: Shared, lock-protected progress state for one run
//! - [`intercept`]: Progress bar implementations that feed a monitor, draw to a terminal, or do nothing
//! - [`registry`]: Process-wide switch deciding which bars newly created code receives
//! - [`runner`]: Worker thread management and the polling progress stream
//! - `commands`: Command-line interface and orchestration

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

pub mod intercept;
pub mod monitor;
pub mod registry;
pub mod runner;

pub use crate::commands::{Host, run};
