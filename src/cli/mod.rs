//! Command-line interface for gobuilder.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{BuildArgs, Cli, Commands, CompletionsArgs, ListArgs, PullArgs, RunArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
