//! Command description, builder, and output types.

use crate::error::Result;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Description of a command to execute.
///
/// The executor inherits the parent environment and applies `env` on top;
/// `current_dir` defaults to the executor process's working directory; a
/// missing `timeout` falls back to the executor's default.
///
/// # Examples
///
/// ```
/// use forge_standard_tools::command::Command;
/// use std::time::Duration;
///
/// // A command line interpreted by the platform shell.
/// let command = Command::shell("echo hello");
///
/// // A program invoked directly.
/// let mut command = Command::new("git");
/// command.args = vec!["status".to_string(), "--porcelain".to_string()];
/// command.timeout = Some(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct Command {
    /// Program to invoke
    pub program: String,
    /// Program arguments
    pub args: Vec<String>,
    /// Environment overrides applied on top of the inherited environment
    pub env: HashMap<String, String>,
    /// Working directory for the child process
    pub current_dir: Option<PathBuf>,
    /// Wall-clock limit for the command
    pub timeout: Option<Duration>,
    /// Whether captured output lines are also mirrored to the logger
    pub mirror_output: bool,
    /// Token observed while the child runs; cancelling it terminates the child
    pub cancel: Option<CancellationToken>,
}

impl Command {
    /// Creates a command that invokes `program` directly, with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: HashMap::new(),
            current_dir: None,
            timeout: None,
            mirror_output: false,
            cancel: None,
        }
    }

    /// Creates a command that runs `command_line` through the platform shell
    /// (`sh -c` on unix, `cmd /c` on Windows).
    pub fn shell(command_line: impl Into<String>) -> Self {
        let command_line = command_line.into();
        let (program, flag) =
            if cfg!(windows) { ("cmd", "/c".to_string()) } else { ("sh", "-c".to_string()) };
        let mut command = Self::new(program);
        command.args = vec![flag, command_line];
        command
    }

    /// Returns the human-readable command line, unwrapping shell invocations.
    pub fn display_line(&self) -> String {
        let is_shell = (self.program == "sh" && self.args.first().is_some_and(|a| a == "-c"))
            || (self.program == "cmd" && self.args.first().is_some_and(|a| a == "/c"));
        if is_shell {
            if let Some(line) = self.args.get(1) {
                return line.clone();
            }
        }
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Fluent builder for [`Command`].
///
/// # Examples
///
/// ```
/// use forge_standard_tools::command::CommandBuilder;
/// use std::time::Duration;
///
/// let command = CommandBuilder::shell("npm run build")
///     .env("NODE_ENV", "production")
///     .current_dir("/repo/apps/web")
///     .timeout(Duration::from_secs(60))
///     .build();
/// assert_eq!(command.display_line(), "npm run build");
/// ```
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    command: Command,
}

impl CommandBuilder {
    /// Starts building a direct program invocation.
    pub fn new(program: impl Into<String>) -> Self {
        Self { command: Command::new(program) }
    }

    /// Starts building a shell command line.
    pub fn shell(command_line: impl Into<String>) -> Self {
        Self { command: Command::shell(command_line) }
    }

    /// Appends an argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.command.args.push(arg.into());
        self
    }

    /// Appends multiple arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets an environment override.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.command.env.insert(key.into(), value.into());
        self
    }

    /// Sets multiple environment overrides.
    #[must_use]
    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in vars {
            self.command.env.insert(key.into(), value.into());
        }
        self
    }

    /// Sets the working directory.
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.command.current_dir = Some(dir.into());
        self
    }

    /// Sets the wall-clock timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.command.timeout = Some(timeout);
        self
    }

    /// Mirrors captured output lines to the logger while the command runs.
    #[must_use]
    pub fn mirror_output(mut self, mirror: bool) -> Self {
        self.command.mirror_output = mirror;
        self
    }

    /// Attaches a cancellation token observed while the child runs.
    #[must_use]
    pub fn cancel(mut self, token: CancellationToken) -> Self {
        self.command.cancel = Some(token);
        self
    }

    /// Finishes building the command.
    #[must_use]
    pub fn build(self) -> Command {
        self.command
    }
}

/// Output captured from a completed command.
///
/// A non-zero exit code is reported here rather than as an error so callers
/// can inspect the code together with both streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    status: i32,
    stdout: String,
    stderr: String,
    duration: Duration,
}

impl CommandOutput {
    /// Creates a new command output.
    pub fn new(status: i32, stdout: String, stderr: String, duration: Duration) -> Self {
        Self { status, stdout, stderr, duration }
    }

    /// Exit code of the command (`-1` when terminated by a signal).
    pub fn status(&self) -> i32 {
        self.status
    }

    /// Whether the command exited with code zero.
    pub fn success(&self) -> bool {
        self.status == 0
    }

    /// Captured standard output.
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    /// Captured standard error.
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// Wall-clock duration of the command.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

/// Trait for executing commands.
///
/// Implementations must be safe to share across tasks: the orchestrator
/// executes many commands concurrently against one executor instance.
#[async_trait::async_trait]
pub trait Executor: Send + Sync {
    /// Executes a command and returns its output.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails to spawn, exceeds its timeout,
    /// or is cancelled. A non-zero exit code is *not* an error.
    async fn execute(&self, command: Command) -> Result<CommandOutput>;
}
