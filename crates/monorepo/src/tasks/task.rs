//! Task definition and execution result models.

use crate::project::TargetConfiguration;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

/// Final state of a task execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Task ran and exited successfully
    Completed,
    /// Task failed (non-zero exit, timeout, spawn failure, or cancellation)
    Failed,
    /// Task was skipped without running
    Skipped,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Failed => write!(f, "failed"),
            TaskStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// A concrete `(project, target)` pair instantiated for one invocation.
///
/// The id has the form `<project>:<target>`; the colon is reserved, so
/// neither half may contain one (enforced when the project graph is built).
/// Tasks are immutable once the task graph is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Task id of the form `<project>:<target>`
    pub id: String,
    /// Project the task belongs to
    pub project: String,
    /// Target the task runs
    pub target: String,
    /// The resolved target configuration (workspace defaults applied)
    pub configuration: TargetConfiguration,
    /// Ids of tasks that must reach a terminal state before this one starts
    pub dependencies: BTreeSet<String>,
    /// Input patterns, copied from the configuration
    pub inputs: Vec<String>,
    /// Output globs, copied from the configuration
    pub outputs: Vec<String>,
    /// Whether the task's results are cacheable
    pub cache: bool,
}

impl Task {
    /// Creates a task for a project/target pair.
    pub fn new(
        project: impl Into<String>,
        target: impl Into<String>,
        configuration: TargetConfiguration,
    ) -> Self {
        let project = project.into();
        let target = target.into();
        Self {
            id: Self::id_for(&project, &target),
            inputs: configuration.inputs.clone(),
            outputs: configuration.outputs.clone(),
            cache: configuration.cache(),
            project,
            target,
            configuration,
            dependencies: BTreeSet::new(),
        }
    }

    /// The task id for a project/target pair.
    pub fn id_for(project: &str, target: &str) -> String {
        format!("{project}:{target}")
    }

    /// Splits a task id into its project and target halves.
    pub fn parse_id(id: &str) -> Option<(&str, &str)> {
        id.split_once(':')
    }
}

/// Result of executing (or attempting to execute) a single task.
///
/// Failures inside a task are always converted into this type — a failing
/// command never propagates as an exception past the executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskExecution {
    /// Id of the task this result belongs to
    pub task_id: String,
    /// Final status
    pub status: TaskStatus,
    /// Exit code (`0` on success; `-1` when no process exit code applies)
    pub exit_code: i32,
    /// Captured standard output, trimmed
    pub stdout: String,
    /// Captured standard error, trimmed
    pub stderr: String,
    /// When execution started
    pub start_time: DateTime<Utc>,
    /// When execution finished
    pub end_time: DateTime<Utc>,
    /// Failure description, when one applies beyond the exit code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TaskExecution {
    /// A successful execution.
    pub fn completed(
        task_id: impl Into<String>,
        stdout: &str,
        stderr: &str,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            status: TaskStatus::Completed,
            exit_code: 0,
            stdout: stdout.trim().to_string(),
            stderr: stderr.trim().to_string(),
            start_time,
            end_time: Utc::now(),
            error: None,
        }
    }

    /// A failed execution.
    pub fn failed(
        task_id: impl Into<String>,
        exit_code: i32,
        stdout: &str,
        stderr: &str,
        error: Option<String>,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            status: TaskStatus::Failed,
            exit_code,
            stdout: stdout.trim().to_string(),
            stderr: stderr.trim().to_string(),
            start_time,
            end_time: Utc::now(),
            error,
        }
    }

    /// Whether the task completed successfully.
    pub fn is_success(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Wall-clock duration of the execution.
    pub fn duration(&self) -> Duration {
        (self.end_time - self.start_time).to_std().unwrap_or_default()
    }
}
