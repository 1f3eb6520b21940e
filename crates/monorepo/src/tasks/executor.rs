//! Task execution: turning one task into supervised shell commands.

use super::task::{Task, TaskExecution};
use crate::graph::{ProjectGraph, ProjectGraphNode};
use chrono::{DateTime, Utc};
use forge_standard_tools::command::{
    Command, CommandBuilder, CommandOutput, Executor, ShellExecutor, DEFAULT_COMMAND_TIMEOUT,
};
use forge_standard_tools::error::{CommandError, Error as StandardError};
use std::path::Path;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Executor ids the shell task executor recognizes, besides a `null`
/// executor (which means the same thing).
pub const RECOGNIZED_EXECUTORS: [&str; 4] =
    ["run-commands", "nx:run-commands", "@nx/run-commands", "forge:run-commands"];

/// Executes a single task and reports a [`TaskExecution`].
///
/// Implementations must be safe for concurrent invocations on distinct
/// tasks: the planner runs a whole layer against one executor instance.
#[async_trait::async_trait]
pub trait TaskExecutor: Send + Sync {
    /// Executes `task` against the given project graph and workspace root.
    ///
    /// Every failure mode — missing project or target, unsupported
    /// executor, spawn failure, non-zero exit, timeout, cancellation — is
    /// encoded in the returned result rather than raised.
    async fn execute_task(
        &self,
        task: &Task,
        project_graph: &ProjectGraph,
        workspace_root: &Path,
        verbose: bool,
    ) -> TaskExecution;
}

/// The built-in task executor: runs a task's `commands` through the
/// platform shell, sequentially or in parallel, with per-command timeouts
/// and variable substitution.
///
/// Supported substitution variables (literal occurrences, no escaping):
/// `{workspaceRoot}`, `{projectRoot}`, `{projectName}`.
///
/// # Examples
///
/// ```no_run
/// use forge_monorepo_tools::tasks::{ShellTaskExecutor, TaskExecutor};
/// use std::path::Path;
///
/// # async fn example(
/// #     task: &forge_monorepo_tools::tasks::Task,
/// #     graph: &forge_monorepo_tools::graph::ProjectGraph,
/// # ) {
/// let executor = ShellTaskExecutor::new();
/// let execution = executor.execute_task(task, graph, Path::new("/repo"), false).await;
/// println!("{}: exit {}", execution.task_id, execution.exit_code);
/// # }
/// ```
pub struct ShellTaskExecutor {
    command_executor: ShellExecutor,
    command_timeout: Duration,
    cancel: CancellationToken,
}

impl ShellTaskExecutor {
    /// Creates an executor with the default 10-minute command timeout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            command_executor: ShellExecutor::new(),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            cancel: CancellationToken::new(),
        }
    }

    /// Overrides the per-command wall-clock timeout.
    #[must_use]
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Attaches a cancellation token; cancelling it terminates in-flight
    /// commands, and their tasks report `error = "cancelled"`.
    #[must_use]
    pub fn with_cancellation_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Overrides the per-stream output capture cap.
    #[must_use]
    pub fn with_max_output_bytes(mut self, bytes: usize) -> Self {
        self.command_executor = self.command_executor.with_max_captured_bytes(bytes);
        self
    }

    /// Substitutes the supported variables in one command string.
    fn substitute(command: &str, workspace_root: &Path, node: &ProjectGraphNode) -> String {
        let project_root = workspace_root.join(&node.config.root);
        command
            .replace("{workspaceRoot}", &workspace_root.display().to_string())
            .replace("{projectRoot}", &project_root.display().to_string())
            .replace("{projectName}", &node.config.name)
    }

    /// Resolves the working directory for a task.
    ///
    /// `options.cwd` is used when it names an existing path under the
    /// workspace root; otherwise the project root applies.
    fn resolve_cwd(
        workspace_root: &Path,
        node: &ProjectGraphNode,
        cwd: Option<&str>,
    ) -> std::path::PathBuf {
        if let Some(cwd) = cwd {
            let candidate = workspace_root.join(cwd);
            if candidate.is_dir() {
                return candidate;
            }
            log::debug!("Ignoring cwd '{cwd}': not a directory under the workspace root");
        }
        workspace_root.join(&node.config.root)
    }

    /// Builds the shell command for one command string.
    fn build_command(
        &self,
        command_line: &str,
        cwd: &Path,
        env: &std::collections::HashMap<String, String>,
        verbose: bool,
    ) -> Command {
        CommandBuilder::shell(command_line)
            .envs(env.clone())
            .current_dir(cwd)
            .timeout(self.command_timeout)
            .mirror_output(verbose)
            .cancel(self.cancel.clone())
            .build()
    }

    /// Runs commands one at a time, stopping at the first failure.
    async fn run_sequential(
        &self,
        task: &Task,
        commands: &[Command],
        started: DateTime<Utc>,
    ) -> TaskExecution {
        let mut stdout = String::new();
        let mut stderr = String::new();

        for command in commands {
            match self.command_executor.execute(command.clone()).await {
                Ok(output) => {
                    append_block(&mut stdout, output.stdout());
                    append_block(&mut stderr, output.stderr());
                    if !output.success() {
                        return TaskExecution::failed(
                            &task.id,
                            output.status(),
                            &stdout,
                            &stderr,
                            None,
                            started,
                        );
                    }
                }
                Err(error) => {
                    return TaskExecution::failed(
                        &task.id,
                        -1,
                        &stdout,
                        &stderr,
                        Some(describe_command_error(&error)),
                        started,
                    );
                }
            }
        }

        TaskExecution::completed(&task.id, &stdout, &stderr, started)
    }

    /// Starts all commands concurrently and waits for every one of them,
    /// aggregating outputs block-by-block in command-list order.
    async fn run_parallel(
        &self,
        task: &Task,
        commands: &[Command],
        started: DateTime<Utc>,
    ) -> TaskExecution {
        let executions = commands
            .iter()
            .map(|command| self.command_executor.execute(command.clone()));
        let outcomes: Vec<forge_standard_tools::error::Result<CommandOutput>> =
            futures::future::join_all(executions).await;

        let mut stdout = String::new();
        let mut stderr = String::new();
        let mut exit_code = 0;
        let mut error = None;

        for outcome in &outcomes {
            match outcome {
                Ok(output) => {
                    append_block(&mut stdout, output.stdout());
                    append_block(&mut stderr, output.stderr());
                    if exit_code == 0 && !output.success() {
                        exit_code = output.status();
                    }
                }
                Err(command_error) => {
                    if error.is_none() {
                        error = Some(describe_command_error(command_error));
                    }
                    if exit_code == 0 {
                        exit_code = -1;
                    }
                }
            }
        }

        if exit_code == 0 && error.is_none() {
            TaskExecution::completed(&task.id, &stdout, &stderr, started)
        } else {
            TaskExecution::failed(&task.id, exit_code, &stdout, &stderr, error, started)
        }
    }
}

impl Default for ShellTaskExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TaskExecutor for ShellTaskExecutor {
    async fn execute_task(
        &self,
        task: &Task,
        project_graph: &ProjectGraph,
        workspace_root: &Path,
        verbose: bool,
    ) -> TaskExecution {
        let started = Utc::now();

        let Some(node) = project_graph.get_project(&task.project) else {
            return TaskExecution::failed(
                &task.id,
                -1,
                "",
                "",
                Some("Project not found".to_string()),
                started,
            );
        };

        let Some(target) = node.config.targets.get(&task.target) else {
            return TaskExecution::failed(
                &task.id,
                -1,
                "",
                "",
                Some("Target not found".to_string()),
                started,
            );
        };

        if let Some(executor) = &target.executor {
            if !RECOGNIZED_EXECUTORS.contains(&executor.as_str()) {
                return TaskExecution::failed(
                    &task.id,
                    -1,
                    "",
                    "",
                    Some(format!("Unsupported executor: {executor}")),
                    started,
                );
            }
        }

        let command_lines = target.command_list();
        if command_lines.is_empty() {
            return TaskExecution::failed(
                &task.id,
                -1,
                "",
                "",
                Some("No commands specified".to_string()),
                started,
            );
        }

        let cwd = Self::resolve_cwd(workspace_root, node, target.cwd().as_deref());
        let env = target.env();

        let commands: Vec<Command> = command_lines
            .iter()
            .map(|line| {
                let substituted = Self::substitute(line, workspace_root, node);
                self.build_command(&substituted, &cwd, &env, verbose)
            })
            .collect();

        log::debug!(
            "Executing task '{}' ({} command(s), {})",
            task.id,
            commands.len(),
            if target.parallel() { "parallel" } else { "sequential" }
        );

        if target.parallel() {
            self.run_parallel(task, &commands, started).await
        } else {
            self.run_sequential(task, &commands, started).await
        }
    }
}

/// Maps a command-layer error to the task-level error string.
fn describe_command_error(error: &StandardError) -> String {
    match error {
        StandardError::Command(CommandError::Timeout { duration }) => {
            format!("Command timed out after {}", format_timeout(*duration))
        }
        StandardError::Command(CommandError::Cancelled) => "cancelled".to_string(),
        other => format!("Exception: {other}"),
    }
}

/// Appends a trimmed output block, separating blocks with a newline.
fn append_block(buffer: &mut String, block: &str) {
    let block = block.trim();
    if block.is_empty() {
        return;
    }
    if !buffer.is_empty() {
        buffer.push('\n');
    }
    buffer.push_str(block);
}

/// Renders a timeout duration the way it reads in configuration: whole
/// minutes where possible, the debug form otherwise.
pub(super) fn format_timeout(duration: Duration) -> String {
    let seconds = duration.as_secs();
    if seconds >= 60 && seconds % 60 == 0 {
        format!("{} minutes", seconds / 60)
    } else {
        format!("{duration:?}")
    }
}
