//! External command execution
//!
//! Every external tool (project generator, make, flashers, arduino-cli) is
//! invoked through [`CommandRunner`]. Each invocation is blocking from the
//! caller's point of view, has a fixed timeout and yields a
//! [`CommandOutcome`]; the caller decides per step whether a non-zero exit
//! is fatal via [`StepPolicy`].

use crate::error::{Error, Result};
use crate::utils::display_command;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, warn};

/// Number of output lines kept when reporting a failed command
const OUTPUT_TAIL_LINES: usize = 20;

/// Description of one external command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Executable name or path
    pub program: String,

    /// Arguments
    pub args: Vec<String>,

    /// Working directory; inherits the current one when unset
    pub cwd: Option<PathBuf>,

    /// Time allowed before the process is killed
    pub timeout: Duration,
}

impl CommandSpec {
    /// Create a command with no arguments
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            timeout,
        }
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Command line rendered for logs
    pub fn display(&self) -> String {
        display_command(&self.program, &self.args)
    }
}

/// Result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Exit code; `None` when terminated by a signal
    pub exit_code: Option<i32>,

    /// Captured standard output
    pub stdout: String,

    /// Captured standard error
    pub stderr: String,

    /// Wall-clock duration
    pub duration: Duration,
}

impl CommandOutcome {
    /// Whether the command exited with status zero
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Last lines of combined stdout and stderr
    pub fn tail(&self) -> String {
        let lines: Vec<&str> = self
            .stdout
            .lines()
            .chain(self.stderr.lines())
            .filter(|line| !line.trim().is_empty())
            .collect();
        let start = lines.len().saturating_sub(OUTPUT_TAIL_LINES);
        lines[start..].join("\n")
    }

    /// Convert a non-zero outcome into [`Error::CommandFailed`]
    pub fn into_failure(self, spec: &CommandSpec) -> Error {
        Error::CommandFailed {
            command: spec.display(),
            exit_code: self.exit_code,
            output: self.tail(),
        }
    }
}

/// How a pipeline step treats a non-zero exit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPolicy {
    /// Abort with an error
    Fatal,
    /// Log a warning with the output tail and continue
    Warn,
}

/// Runs external commands
///
/// Tests substitute a recording implementation to observe invocations
/// without spawning processes.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a command to completion, capturing its output
    ///
    /// A non-zero exit is not an error here; a timeout or a failure to spawn is.
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutcome>;
}

/// Run a command and apply the step policy to its exit status
pub async fn run_step(
    runner: &dyn CommandRunner,
    spec: &CommandSpec,
    policy: StepPolicy,
) -> Result<CommandOutcome> {
    let outcome = runner.run(spec).await?;
    if outcome.success() {
        return Ok(outcome);
    }

    match policy {
        StepPolicy::Fatal => Err(outcome.into_failure(spec)),
        StepPolicy::Warn => {
            warn!(
                "'{}' exited with {:?} after {:.1}s, continuing:\n{}",
                spec.program,
                outcome.exit_code,
                outcome.duration.as_secs_f64(),
                outcome.tail()
            );
            Ok(outcome)
        }
    }
}

/// [`CommandRunner`] backed by real processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutcome> {
        debug!("Running: {}", spec.display());

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(cwd) = &spec.cwd {
            cmd.current_dir(cwd);
        }

        let started = Instant::now();
        let output = match tokio::time::timeout(spec.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(Error::CommandSpawn {
                    command: spec.program.clone(),
                    source: e,
                })
            }
            Err(_) => {
                return Err(Error::CommandTimeout {
                    command: spec.display(),
                    timeout_secs: spec.timeout.as_secs(),
                })
            }
        };

        let outcome = CommandOutcome {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            duration: started.elapsed(),
        };

        debug!(
            "'{}' finished with {:?} in {:.1}s",
            spec.program,
            outcome.exit_code,
            outcome.duration.as_secs_f64()
        );

        Ok(outcome)
    }
}
