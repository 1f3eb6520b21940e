//! # Command execution
//!
//! ## What
//! This module executes shell commands on behalf of the orchestration
//! layers: a [`Command`] describes what to run (program, arguments,
//! environment overrides, working directory, timeout, cancellation), an
//! [`Executor`] runs it, and a [`CommandOutput`] carries the exit code and
//! the captured streams back to the caller.
//!
//! ## How
//! [`ShellExecutor`] spawns the child with `tokio::process`, placing it in
//! its own process group on unix so that a timeout or cancellation can
//! terminate the whole tree, not just the immediate shell. Stdout and stderr
//! are drained line-by-line into capped buffers (optionally mirrored to the
//! logger) while the executor waits on the child under a wall-clock timeout.
//!
//! ## Why
//! Build tasks are arbitrary user commands: they can hang, fork, or produce
//! unbounded output. Supervising them behind one executor keeps those
//! failure modes contained and uniform for every caller.

mod executor;
mod types;


pub use executor::{ShellExecutor, DEFAULT_COMMAND_TIMEOUT, DEFAULT_MAX_CAPTURED_BYTES, OUTPUT_TRUNCATION_MARKER};
pub use types::{Command, CommandBuilder, CommandOutput, Executor};
