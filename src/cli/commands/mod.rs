//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results. Commands are
//! routed by [`CommandDispatcher`], which also loads configuration and
//! constructs the [`crate::Builder`] they share.

pub mod build;
pub mod completions;
pub mod dispatcher;
pub mod list;
pub mod pull;
pub mod run;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
