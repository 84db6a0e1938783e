//! Builder for `git` subprocess invocations.
//!
//! Every git call the crate makes goes through [`GitCommand`], which gives them
//! the same timeout handling, environment, logging, and error mapping.

use anyhow::{Context, Result};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::time::timeout;

use crate::constants::{GIT_LIST_REMOTE_TIMEOUT, SLOW_GIT_OPERATION};
use crate::core::GitError;

/// Fluent builder for a single git invocation.
///
/// New commands use [`default_git_command`] as the program, capture stdout and
/// stderr, and time out after [`GIT_LIST_REMOTE_TIMEOUT`].
///
/// # Examples
///
/// ```rust,no_run
/// use vcs_resolver::git::command_builder::GitCommand;
/// use std::time::Duration;
///
/// # async fn example() -> anyhow::Result<()> {
/// let listing = GitCommand::ls_remote("https://github.com/example/repo.git")
///     .with_timeout(Some(Duration::from_secs(30)))
///     .with_context("Listing example repo")
///     .execute_stdout()
///     .await?;
/// println!("{listing}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GitCommand {
    /// Executable to run
    program: String,

    /// Arguments passed to git
    args: Vec<String>,

    /// Extra environment variables for the git process
    env_vars: Vec<(String, String)>,

    /// Maximum duration to wait for completion (None = no timeout)
    timeout_duration: Option<Duration>,

    /// Optional prefix for log lines
    context: Option<String>,
}

impl Default for GitCommand {
    fn default() -> Self {
        Self {
            program: default_git_command().to_string(),
            args: Vec::new(),
            env_vars: Vec::new(),
            timeout_duration: Some(GIT_LIST_REMOTE_TIMEOUT),
            context: None,
        }
    }
}

/// The git executable name for the current platform.
#[must_use]
pub const fn default_git_command() -> &'static str {
    if cfg!(windows) { "git.exe" } else { "git" }
}

impl GitCommand {
    /// Creates a command with default settings and no arguments.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `program` instead of the platform's default git executable.
    #[must_use]
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Appends one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets an environment variable for the git process.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    /// Sets the timeout; `None` waits indefinitely.
    #[must_use]
    pub const fn with_timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Adds a context string to the log lines of this command.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    fn operation(&self) -> String {
        self.args.first().cloned().unwrap_or_else(|| "unknown".to_string())
    }

    /// Runs the command and captures its output.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotFound`] if the executable cannot be spawned
    /// - [`GitError::Timeout`] if the command outlives its timeout; the child
    ///   process is killed
    /// - [`GitError::CommandFailed`] if git exits with a non-zero status
    pub async fn execute(self) -> Result<GitCommandOutput> {
        let start = Instant::now();
        let operation = self.operation();
        let context = self.context.as_deref().map(|ctx| format!("({ctx}) ")).unwrap_or_default();

        tracing::debug!(
            target: "git",
            "{}Executing command: {} {}",
            context,
            self.program,
            self.args.join(" ")
        );

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        for (key, value) in &self.env_vars {
            tracing::trace!(target: "git", "Setting env var: {}={}", key, value);
            cmd.env(key, value);
        }

        let output_future = cmd.output();
        let result = match self.timeout_duration {
            Some(duration) => {
                if let Ok(result) = timeout(duration, output_future).await {
                    result
                } else {
                    tracing::warn!(
                        target: "git",
                        "{}Command timed out after {} seconds: git {}",
                        context,
                        duration.as_secs(),
                        self.args.join(" ")
                    );
                    return Err(GitError::Timeout {
                        operation,
                        seconds: duration.as_secs(),
                    }
                    .into());
                }
            }
            None => output_future.await,
        };

        let output = match result {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(GitError::NotFound.into());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to execute {} {operation}", self.program));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            tracing::debug!(
                target: "git",
                "{}Command failed with exit code: {:?}",
                context,
                output.status.code()
            );
            if !stderr.is_empty() {
                tracing::debug!(target: "git", "{}Error: {}", context, stderr.trim());
            }
            return Err(GitError::CommandFailed {
                operation,
                stderr: stderr.trim().to_string(),
            }
            .into());
        }

        if !stderr.is_empty() {
            tracing::debug!(target: "git", "{}{}", context, stderr.trim());
        }

        let elapsed = start.elapsed();
        if elapsed > SLOW_GIT_OPERATION {
            tracing::info!(target: "git::perf", "{}Git {} took {:.2}s", context, operation, elapsed.as_secs_f64());
        } else {
            tracing::debug!(target: "git::perf", "{}Git {} took {}ms", context, operation, elapsed.as_millis());
        }

        Ok(GitCommandOutput {
            stdout,
            stderr,
        })
    }

    /// Runs the command and returns its stdout.
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute).
    pub async fn execute_stdout(self) -> Result<String> {
        Ok(self.execute().await?.stdout)
    }
}

/// Captured output of a successful git command.
#[derive(Debug, Clone)]
pub struct GitCommandOutput {
    /// Standard output
    pub stdout: String,
    /// Standard error (progress and warnings)
    pub stderr: String,
}

impl GitCommand {
    /// `git ls-remote <url>`: every reference the remote advertises.
    #[must_use]
    pub fn ls_remote(url: &str) -> Self {
        Self::new().arg("ls-remote").arg(url)
    }
}
