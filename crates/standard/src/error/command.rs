//! Command execution error types.
//!
//! Errors that can occur while spawning and supervising child processes:
//! spawn failures, wall-clock timeouts, cancellation, and stream capture
//! problems. A non-zero exit code is *not* an error at this layer — it is
//! reported through `CommandOutput` so callers can inspect the code and the
//! captured streams.

use core::result::Result as CoreResult;
use std::time::Duration;
use thiserror::Error as ThisError;

/// Errors that can occur during command execution.
///
/// # Examples
///
/// ```
/// use forge_standard_tools::error::CommandError;
/// use std::time::Duration;
///
/// let error = CommandError::Timeout { duration: Duration::from_secs(600) };
/// assert!(error.to_string().contains("timed out"));
/// ```
#[derive(ThisError, Debug, Clone)]
pub enum CommandError {
    /// The command failed to start (e.g., shell not found).
    #[error("Failed to spawn command '{cmd}': {message}")]
    SpawnFailed {
        /// The command that failed to start
        cmd: String,
        /// The spawn failure error message
        message: String,
    },

    /// The command execution process itself failed (e.g., internal I/O error).
    #[error("Command execution failed for '{cmd}': {message}")]
    ExecutionFailed {
        /// The command that failed during execution
        cmd: String,
        /// The execution failure error message
        message: String,
    },

    /// The command timed out after the specified duration.
    #[error("Command timed out after {duration:?}")]
    Timeout {
        /// The time period after which the command timed out
        duration: Duration,
    },

    /// The command was cancelled before it completed.
    #[error("Command was cancelled")]
    Cancelled,

    /// Failed to capture stdout or stderr.
    #[error("Failed to capture {stream} stream")]
    CaptureFailed {
        /// Name of the stream that failed to capture (stdout/stderr)
        stream: String,
    },

    /// Generic error during command processing.
    #[error("Command processing error: {0}")]
    Generic(String),
}

/// Result type for command operations.
pub type CommandResult<T> = CoreResult<T, CommandError>;
