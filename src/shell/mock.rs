//! Recording command runner for testing.
//!
//! `RecordingRunner` implements [`CommandRunner`] without starting any
//! process. Every invocation is recorded for later assertion, and a
//! configurable responder decides what each command "returns".
//!
//! # Example
//!
//! ```
//! use gobuilder::shell::{run_checked, CommandResult, CommandSpec, RecordingRunner};
//! use std::time::Duration;
//!
//! let runner = RecordingRunner::new().respond_with(|spec| {
//!     if spec.args.first().map(String::as_str) == Some("fail") {
//!         CommandResult::failure(Some(1), String::new(), "nope".into(), Duration::ZERO)
//!     } else {
//!         CommandResult::success(String::new(), String::new(), Duration::ZERO)
//!     }
//! });
//!
//! assert!(run_checked(&runner, &CommandSpec::new("tool").arg("ok")).is_ok());
//! assert!(run_checked(&runner, &CommandSpec::new("tool").arg("fail")).is_err());
//! assert_eq!(runner.command_lines(), vec!["tool ok", "tool fail"]);
//! ```

use std::sync::Mutex;
use std::time::Duration;

use crate::error::Result;

use super::command::{CommandResult, CommandRunner, CommandSpec};

type Responder = Box<dyn Fn(&CommandSpec) -> CommandResult + Send + Sync>;

/// Command runner that records invocations instead of executing them.
///
/// By default every command succeeds with empty output.
pub struct RecordingRunner {
    calls: Mutex<Vec<CommandSpec>>,
    responder: Responder,
}

impl Default for RecordingRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RecordingRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingRunner")
            .field("calls", &self.calls())
            .finish_non_exhaustive()
    }
}

impl RecordingRunner {
    /// Create a runner where every command succeeds.
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            responder: Box::new(|_| ok("")),
        }
    }

    /// Replace the responder.
    pub fn respond_with<F>(mut self, responder: F) -> Self
    where
        F: Fn(&CommandSpec) -> CommandResult + Send + Sync + 'static,
    {
        self.responder = Box::new(responder);
        self
    }

    /// All recorded invocations, in order.
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Recorded invocations rendered as command lines.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(ToString::to_string).collect()
    }

    /// Recorded invocations of `program` whose first argument is `verb`.
    pub fn calls_to(&self, program: &str, verb: &str) -> Vec<CommandSpec> {
        self.calls()
            .into_iter()
            .filter(|c| c.program == program && c.args.first().map(String::as_str) == Some(verb))
            .collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandResult> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(spec.clone());
        Ok((self.responder)(spec))
    }
}

/// A successful result with the given stdout.
pub fn ok(stdout: &str) -> CommandResult {
    CommandResult::success(stdout.to_string(), String::new(), Duration::ZERO)
}

/// A failed result with the given exit code and stderr.
pub fn fail(code: i32, stderr: &str) -> CommandResult {
    CommandResult::failure(Some(code), String::new(), stderr.to_string(), Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_calls_in_order() {
        let runner = RecordingRunner::new();

        runner.run(&CommandSpec::new("git").arg("clone")).unwrap();
        runner.run(&CommandSpec::new("go").arg("build")).unwrap();

        assert_eq!(runner.command_lines(), vec!["git clone", "go build"]);
    }

    #[test]
    fn default_responder_succeeds() {
        let runner = RecordingRunner::new();

        let result = runner.run(&CommandSpec::new("anything")).unwrap();

        assert!(result.success);
        assert!(result.stdout.is_empty());
    }

    #[test]
    fn calls_to_filters_by_program_and_verb() {
        let runner = RecordingRunner::new();

        runner.run(&CommandSpec::new("go").arg("get")).unwrap();
        runner.run(&CommandSpec::new("go").arg("build")).unwrap();
        runner.run(&CommandSpec::new("git").arg("build")).unwrap();

        assert_eq!(runner.calls_to("go", "build").len(), 1);
    }

    #[test]
    fn responder_controls_result() {
        let runner = RecordingRunner::new().respond_with(|_| fail(7, "bad"));

        let result = runner.run(&CommandSpec::new("x")).unwrap();

        assert_eq!(result.exit_code, Some(7));
        assert_eq!(result.stderr, "bad");
    }
}
