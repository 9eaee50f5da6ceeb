//! Command-line interface for progress-relay
//!
//! This module implements the CLI commands on top of the library's monitoring
//! pieces. It handles argument parsing, configuration management, and turning a
//! progress stream into output.
//!
//! ## Commands
//!
//! - **demo**: Patch the [`registry`](crate::registry), run a simulated paged job
//!   that only knows about registry-provided progress bars, and write its
//!   progress stream to the host's output as newline-delimited JSON
//! - **init**: Generate a default configuration file
//! - **validate**: Check configuration file syntax and values
//!
//! ## Execution Flow
//!
//! The `run` function parses command-line arguments using clap and routes to
//! the appropriate command handler. The `demo` command drives the blocking
//! progress stream on tokio's blocking pool and forwards encoded lines to the
//! async side over a channel, so a slow writer never stalls the worker.

mod common;
mod config;
mod demo;
mod host;
mod init;
mod ndjson;
mod run;
mod validate;
mod workload;

#[cfg(debug_assertions)]
pub use config::Config;

pub use demo::{DemoArgs, run_demo};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use run::run;
pub use validate::{ValidateArgs, validate_config};
