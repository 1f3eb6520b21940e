//! Filesystem and pattern matching error types.

use core::result::Result as CoreResult;
use std::path::PathBuf;
use thiserror::Error as ThisError;

/// Errors that can occur while walking the workspace tree or compiling glob
/// patterns.
///
/// Per-directory I/O errors during traversal are deliberately *not*
/// represented here: the matcher logs and suppresses them so a single
/// unreadable directory does not abort workspace discovery.
#[derive(ThisError, Debug, Clone)]
pub enum FileSystemError {
    /// A glob pattern failed to compile.
    #[error("Invalid glob pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The pattern that failed to compile
        pattern: String,
        /// The compilation error message
        message: String,
    },

    /// The workspace root does not exist or is not a directory.
    #[error("Not a directory: {path}")]
    NotADirectory {
        /// The offending path
        path: PathBuf,
    },

    /// Generic filesystem error.
    #[error("Filesystem error: {0}")]
    Generic(String),
}

/// Result type for filesystem operations.
pub type FileSystemResult<T> = CoreResult<T, FileSystemError>;
