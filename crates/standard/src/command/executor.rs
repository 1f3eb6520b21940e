//! Shell command executor on top of `tokio::process`.

use super::types::{Command as CommandSpec, CommandOutput, Executor};
use crate::error::{CommandError, Error, Result};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::time::timeout;

/// Default wall-clock limit for a single command.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Default cap on the bytes retained per captured stream.
pub const DEFAULT_MAX_CAPTURED_BYTES: usize = 16 * 1024 * 1024;

/// Marker appended to a captured stream once its cap is reached.
pub const OUTPUT_TRUNCATION_MARKER: &str = "[output truncated]";

/// Which child stream a reader drains.
#[derive(Debug, Clone, Copy)]
enum StreamKind {
    Stdout,
    Stderr,
}

impl std::fmt::Display for StreamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamKind::Stdout => write!(f, "stdout"),
            StreamKind::Stderr => write!(f, "stderr"),
        }
    }
}

/// Executes commands through the platform shell semantics described on
/// [`CommandSpec`]: inherited environment plus overrides, capped stream
/// capture, a wall-clock timeout, and process-group termination on expiry.
///
/// The executor holds no per-invocation state and is safe to share across
/// concurrent tasks.
///
/// # Examples
///
/// ```no_run
/// use forge_standard_tools::command::{CommandBuilder, Executor, ShellExecutor};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let executor = ShellExecutor::new();
/// let output = executor.execute(CommandBuilder::shell("echo hello").build()).await?;
/// assert!(output.success());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    default_timeout: Duration,
    max_captured_bytes: usize,
}

impl ShellExecutor {
    /// Creates an executor with the default timeout and capture cap.
    #[must_use]
    pub fn new() -> Self {
        Self {
            default_timeout: DEFAULT_COMMAND_TIMEOUT,
            max_captured_bytes: DEFAULT_MAX_CAPTURED_BYTES,
        }
    }

    /// Overrides the timeout applied to commands that carry none.
    #[must_use]
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Overrides the per-stream capture cap.
    #[must_use]
    pub fn with_max_captured_bytes(mut self, bytes: usize) -> Self {
        self.max_captured_bytes = bytes;
        self
    }

    /// Returns the timeout applied to commands that carry none.
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Builds the tokio command for a spec.
    fn build_command(spec: &CommandSpec) -> Command {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .envs(&spec.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = &spec.current_dir {
            cmd.current_dir(dir);
        }

        // A dedicated process group lets a timeout or cancellation reap the
        // shell's grandchildren, not just the shell itself.
        #[cfg(unix)]
        cmd.process_group(0);

        cmd
    }

    /// Forcibly terminates the child and, on unix, its whole process group.
    #[allow(clippy::cast_possible_wrap)]
    async fn terminate(child: &mut Child, pid: Option<u32>) {
        #[cfg(unix)]
        if let Some(pid) = pid {
            // The child was spawned as its own process-group leader, so the
            // group id equals its pid.
            unsafe {
                libc::killpg(pid as i32, libc::SIGKILL);
            }
        }
        #[cfg(not(unix))]
        let _ = pid;

        if let Err(error) = child.kill().await {
            log::warn!("Failed to kill child process: {error}");
        }
    }

    /// Drains one child stream line-by-line into a capped buffer.
    async fn read_stream<R>(reader: R, cap: usize, mirror: bool, kind: StreamKind) -> String
    where
        R: AsyncRead + Unpin,
    {
        let mut lines = BufReader::new(reader).lines();
        let mut buffer = String::new();
        let mut truncated = false;

        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if mirror {
                        match kind {
                            StreamKind::Stdout => log::info!(target: "forge::command", "{line}"),
                            StreamKind::Stderr => log::warn!(target: "forge::command", "{line}"),
                        }
                    }
                    if buffer.len() + line.len() < cap {
                        buffer.push_str(&line);
                        buffer.push('\n');
                    } else if !truncated {
                        truncated = true;
                        buffer.push_str(OUTPUT_TRUNCATION_MARKER);
                        buffer.push('\n');
                    }
                }
                Ok(None) => break,
                Err(error) => {
                    log::warn!("Error reading {kind} stream: {error}");
                    break;
                }
            }
        }

        buffer
    }
}

impl Default for ShellExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Executor for ShellExecutor {
    async fn execute(&self, command: CommandSpec) -> Result<CommandOutput> {
        let started = Instant::now();
        let command_line = command.display_line();
        let timeout_duration = command.timeout.unwrap_or(self.default_timeout);

        let mut child = Self::build_command(&command).spawn().map_err(|error| {
            Error::Command(CommandError::SpawnFailed {
                cmd: command_line.clone(),
                message: error.to_string(),
            })
        })?;
        let pid = child.id();

        let stdout = child.stdout.take().ok_or(Error::Command(CommandError::CaptureFailed {
            stream: "stdout".to_string(),
        }))?;
        let stderr = child.stderr.take().ok_or(Error::Command(CommandError::CaptureFailed {
            stream: "stderr".to_string(),
        }))?;

        let cap = self.max_captured_bytes;
        let mirror = command.mirror_output;
        let stdout_task =
            tokio::spawn(Self::read_stream(stdout, cap, mirror, StreamKind::Stdout));
        let stderr_task =
            tokio::spawn(Self::read_stream(stderr, cap, mirror, StreamKind::Stderr));

        let cancel = command.cancel.clone();
        let cancelled = async {
            match &cancel {
                Some(token) => token.cancelled().await,
                None => std::future::pending().await,
            }
        };

        let status = tokio::select! {
            waited = timeout(timeout_duration, child.wait()) => match waited {
                Ok(Ok(status)) => status,
                Ok(Err(error)) => {
                    return Err(Error::Command(CommandError::ExecutionFailed {
                        cmd: command_line,
                        message: error.to_string(),
                    }));
                }
                Err(_) => {
                    log::warn!(
                        "Command '{command_line}' timed out after {timeout_duration:?}, terminating"
                    );
                    Self::terminate(&mut child, pid).await;
                    return Err(Error::Command(CommandError::Timeout {
                        duration: timeout_duration,
                    }));
                }
            },
            () = cancelled => {
                log::debug!("Command '{command_line}' cancelled, terminating");
                Self::terminate(&mut child, pid).await;
                return Err(Error::Command(CommandError::Cancelled));
            }
        };

        let stdout = stdout_task.await.unwrap_or_default();
        let stderr = stderr_task.await.unwrap_or_default();

        Ok(CommandOutput::new(status.code().unwrap_or(-1), stdout, stderr, started.elapsed()))
    }
}
