//! # Error handling for `forge_standard_tools`
//!
//! ## What
//! This module provides the error types for the foundation crate: filesystem
//! traversal and pattern matching on one side, command execution on the
//! other, plus the aggregate [`Error`] used at the crate boundary.
//!
//! ## How
//! Each domain has its own error enum (`FileSystemError`, `CommandError`)
//! defined with `thiserror`, and the aggregate `Error` wraps them via
//! `#[from]`. Result type aliases are provided for convenience.
//!
//! ## Why
//! Callers of the orchestration layers need to distinguish "the command ran
//! and failed" from "the command never ran" from "the workspace could not be
//! read"; separate enums keep those cases apart without string matching.

mod command;
mod filesystem;
mod standard;


pub use command::{CommandError, CommandResult};
pub use filesystem::{FileSystemError, FileSystemResult};
pub use standard::{Error, Result};
