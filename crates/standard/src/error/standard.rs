//! Aggregate error type for the crate boundary.

use std::io;
use thiserror::Error as ThisError;

use super::{CommandError, FileSystemError};

/// The main error type for `forge_standard_tools`, aggregating the
/// domain-specific errors from the `command` and `filesystem` modules.
///
/// # Examples
///
/// ```rust
/// use forge_standard_tools::error::{CommandError, Error};
///
/// fn run() -> Result<(), Error> {
///     Err(CommandError::Cancelled.into())
/// }
///
/// assert!(run().is_err());
/// ```
#[derive(ThisError, Debug)]
pub enum Error {
    /// Errors related to command execution.
    #[error("Command execution error: {0}")]
    Command(#[from] CommandError),

    /// Errors related to filesystem operations.
    #[error("Filesystem error: {0}")]
    FileSystem(#[from] FileSystemError),

    /// General I/O errors not covered by `FileSystemError`.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// General purpose errors with a custom message.
    #[error("Operation error: {0}")]
    Operation(String),
}

impl Error {
    /// Creates a new operational error.
    pub fn operation(message: impl Into<String>) -> Self {
        Self::Operation(message.into())
    }
}

/// Result type alias for `forge_standard_tools` operations.
pub type Result<T> = std::result::Result<T, Error>;
