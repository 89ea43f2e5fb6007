//! gobuilder - build Go binaries from declaratively configured projects.
//!
//! A configuration file names projects. Each project lists the packages to
//! link into one binary, the repositories those packages come from, and how
//! to compile it. gobuilder fetches the repositories through pluggable
//! fetchers, generates an entry point that imports every package, records
//! the revision of each dependency, and drives `go build`, optionally across
//! a matrix of target platforms.
//!
//! # Modules
//!
//! - [`builder`] - Top-level orchestration over all projects
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - YAML configuration loading and dot-path access
//! - [`error`] - Error types and result aliases
//! - [`fetcher`] - Fetch strategies and their registry
//! - [`git`] - Git plumbing used by fetchers and revision discovery
//! - [`project`] - Per-project pull and build sequence
//! - [`shell`] - Subprocess execution behind a mockable runner
//! - [`template`] - Entry-point template rendering
//! - [`toolchain`] - The go command and workspace
//! - [`ui`] - Terminal output
//! - [`workspace`] - GOPATH-style package lookup
//!
//! # Example
//!
//! ```
//! use gobuilder::project::entrypoint::imports_source;
//!
//! let source = imports_source(&["github.com/org/plugin"]);
//! assert_eq!(source, "package main\nimport _ \"github.com/org/plugin\"\n");
//! ```

pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod git;
pub mod project;
pub mod shell;
pub mod template;
pub mod toolchain;
pub mod ui;
pub mod workspace;

pub use builder::{Builder, BuilderOptions};
pub use error::{BuilderError, Result};
