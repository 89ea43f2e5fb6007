//! External command execution.
//!
//! Every subprocess gobuilder starts (git, the go toolchain, the freshly
//! built binary in `run` mode) is described by a [`CommandSpec`] and handed
//! to a [`CommandRunner`]. Production code uses [`SystemRunner`]; tests swap
//! in [`super::RecordingRunner`] to observe the exact command sequence.

use crate::error::{BuilderError, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output (empty unless captured).
    pub stdout: String,

    /// Standard error (empty unless captured).
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment overrides (merged with the inherited environment).
    pub env: BTreeMap<String, String>,

    /// Capture stdout (if false, inherits from parent).
    pub capture_stdout: bool,

    /// Capture stderr (if false, inherits from parent).
    pub capture_stderr: bool,
}

/// A program invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSpec {
    /// Program name or path.
    pub program: String,

    /// Arguments, passed verbatim (no shell).
    pub args: Vec<String>,

    /// Execution options.
    pub options: CommandOptions,
}

impl CommandSpec {
    /// Start building an invocation of `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            options: CommandOptions::default(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run inside `dir`.
    pub fn cwd(mut self, dir: impl AsRef<Path>) -> Self {
        self.options.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Set an environment variable for the child.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.env.insert(key.into(), value.into());
        self
    }

    /// Capture stdout and stderr instead of inheriting them.
    pub fn capture(mut self) -> Self {
        self.options.capture_stdout = true;
        self.options.capture_stderr = true;
        self
    }

    /// The argument vector after the program name, as `&str`s.
    pub fn arg_strs(&self) -> Vec<&str> {
        self.args.iter().map(String::as_str).collect()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.options.env {
            write!(f, "{}={} ", key, value)?;
        }
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " '{}'", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Executes commands.
///
/// Implementations report a non-zero exit as `Ok` with `success == false`;
/// only a failure to start the process is an `Err`.
pub trait CommandRunner {
    /// Execute the command and wait for it to finish.
    fn run(&self, spec: &CommandSpec) -> Result<CommandResult>;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandResult> {
        let start = Instant::now();
        let options = &spec.options;

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);

        if let Some(cwd) = &options.cwd {
            cmd.current_dir(cwd);
        }

        for (key, value) in &options.env {
            cmd.env(key, value);
        }

        cmd.stdin(Stdio::inherit());

        if options.capture_stdout {
            cmd.stdout(Stdio::piped());
        } else {
            cmd.stdout(Stdio::inherit());
        }

        if options.capture_stderr {
            cmd.stderr(Stdio::piped());
        } else {
            cmd.stderr(Stdio::inherit());
        }

        tracing::debug!(command = %spec, "Executing");

        let output = cmd.output().map_err(|source| BuilderError::CommandSpawn {
            command: spec.to_string(),
            source,
        })?;

        let duration = start.elapsed();
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if output.status.success() {
            Ok(CommandResult::success(stdout, stderr, duration))
        } else {
            Ok(CommandResult::failure(
                output.status.code(),
                stdout,
                stderr,
                duration,
            ))
        }
    }
}

/// Run a command and turn a non-zero exit into [`BuilderError::CommandFailed`].
pub fn run_checked(runner: &dyn CommandRunner, spec: &CommandSpec) -> Result<CommandResult> {
    let result = runner.run(spec)?;

    if result.success {
        Ok(result)
    } else {
        Err(BuilderError::CommandFailed {
            command: spec.to_string(),
            code: result.exit_code,
            stderr: result.stderr,
        })
    }
}
