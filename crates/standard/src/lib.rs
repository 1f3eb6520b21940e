#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(clippy::panic)]

//! # `forge_standard_tools`
//!
//! Foundation crate for the forge build orchestrator.
//!
//! ## What
//! This crate provides the low-level primitives the orchestration layers are
//! built on: matching glob patterns against a workspace tree and executing
//! shell commands with timeouts, cancellation, and bounded output capture.
//! It knows nothing about projects, targets, or task graphs.
//!
//! ## How
//! The crate is split into small, focused modules:
//!
//! - **`filesystem`**: [`FileMatcher`] walks a workspace root (skipping VCS
//!   and build directories) and returns the relative paths matching a glob.
//! - **`command`**: a [`Command`] description, an async [`Executor`] trait,
//!   and the [`ShellExecutor`] implementation on top of `tokio::process`.
//! - **`error`**: the error hierarchy shared by both modules.
//!
//! ## Why
//! Keeping traversal and process plumbing out of the orchestration core lets
//! the higher layers stay declarative: they describe *what* to match and
//! *what* to run, while this crate owns the platform details (shell
//! selection, process groups, stream capture).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use forge_standard_tools::command::{CommandBuilder, Executor, ShellExecutor};
//! use forge_standard_tools::filesystem::FileMatcher;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Find every package manifest in the workspace.
//! let matcher = FileMatcher::new();
//! let manifests = matcher.match_files(Path::new("/repo"), "**/package.json")?;
//!
//! // Run a shell command with a timeout.
//! let executor = ShellExecutor::new();
//! let command = CommandBuilder::shell("npm run build")
//!     .current_dir("/repo/apps/web")
//!     .timeout(std::time::Duration::from_secs(60))
//!     .build();
//! let output = executor.execute(command).await?;
//! println!("exited with {}", output.status());
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod error;
pub mod filesystem;

pub use command::{Command, CommandBuilder, CommandOutput, Executor, ShellExecutor};
pub use error::{CommandError, Error, FileSystemError, Result};
pub use filesystem::FileMatcher;
