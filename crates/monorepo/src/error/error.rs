//! Error types for the orchestrator core
//!
//! This module provides the error hierarchy for inference, graph
//! construction, and task planning. Failures *inside a single task* are
//! never surfaced here — they are encoded in the task's
//! [`TaskExecution`](crate::tasks::TaskExecution) so that one failing
//! command cannot abort the surrounding layer.

use thiserror::Error as ThisError;

/// Main error type for orchestrator operations
#[derive(ThisError, Debug)]
pub enum Error {
    /// Foundation errors (filesystem traversal, command plumbing)
    #[error("Standard tools error: {0}")]
    Standard(#[from] forge_standard_tools::error::Error),

    /// Malformed workspace or plugin configuration; surfaced before any task runs
    #[error("Configuration error: {0}")]
    Config(String),

    /// Cyclic project or task graph, with the offending path
    #[error("Circular dependency detected: {}", path.join(" -> "))]
    Cycle {
        /// The cycle path, first node repeated at the end
        path: Vec<String>,
    },

    /// Malformed plugin set handed to the inference engine
    #[error("Inference error: {0}")]
    Inference(String),

    /// Plugin failures that escape the per-plugin isolation
    #[error("Plugin error: {0}")]
    Plugin(String),

    /// Task graph construction errors
    #[error("Task error: {0}")]
    Task(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for orchestrator operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a cycle error from the offending path
    pub fn cycle(path: Vec<String>) -> Self {
        Error::Cycle { path }
    }

    /// Create an inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Error::Inference(msg.into())
    }

    /// Create a plugin error
    pub fn plugin(msg: impl Into<String>) -> Self {
        Error::Plugin(msg.into())
    }

    /// Create a task error
    pub fn task(msg: impl Into<String>) -> Self {
        Error::Task(msg.into())
    }
}
