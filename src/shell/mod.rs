//! External command execution.

pub mod command;
pub mod mock;

pub use command::{
    run_checked, CommandOptions, CommandResult, CommandRunner, CommandSpec, SystemRunner,
};
pub use mock::RecordingRunner;
