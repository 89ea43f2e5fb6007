//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::builder::{Builder, BuilderOptions};
use crate::cli::args::{Cli, Commands};
use crate::config::load_configs;
use crate::error::Result;
use crate::template::{EntryTemplate, TemplateData};
use crate::toolchain::Toolchain;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command, reporting to `ui`.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    cwd: PathBuf,
    toolchain: Option<Arc<Toolchain>>,
    scratch_root: Option<PathBuf>,
}

impl CommandDispatcher {
    /// Create a dispatcher resolving relative paths against `cwd`.
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            cwd,
            toolchain: None,
            scratch_root: None,
        }
    }

    /// Use `toolchain` instead of discovering one.
    pub fn with_toolchain(mut self, toolchain: Arc<Toolchain>) -> Self {
        self.toolchain = Some(toolchain);
        self
    }

    /// Create scratch workspaces under `dir`.
    pub fn with_scratch_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(dir.into());
        self
    }

    /// The working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }

    /// Load the configs named on the command line and construct a builder.
    pub fn load_builder(&self, cli: &Cli) -> Result<Builder> {
        let configs = load_configs(&cli.config, &self.cwd)?;

        let mut options = BuilderOptions::new()
            .configs(configs)
            .update_repo(cli.update)
            .output_dir(self.cwd.clone());

        if let Some(path) = &cli.template {
            options = options.template(EntryTemplate::from_file(&self.resolve(path))?);
        }
        if let Some(toolchain) = &self.toolchain {
            options = options.toolchain(toolchain.clone());
        }
        if let Some(dir) = &self.scratch_root {
            options = options.scratch_root(dir.clone());
        }

        Builder::new(options)
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let data: TemplateData = cli.set.iter().cloned().collect();

        match &cli.command {
            Commands::Completions(args) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
            Commands::List(args) => {
                let cmd = super::list::ListCommand::new(self.load_builder(cli)?, args.clone());
                cmd.execute(ui)
            }
            Commands::Build(args) => {
                let cmd =
                    super::build::BuildCommand::new(self.load_builder(cli)?, data, args.clone());
                cmd.execute(ui)
            }
            Commands::Run(args) => {
                let cmd = super::run::RunCommand::new(self.load_builder(cli)?, data, args.clone());
                cmd.execute(ui)
            }
            Commands::Pull(args) => {
                let cmd = super::pull::PullCommand::new(self.load_builder(cli)?, args.clone());
                cmd.execute(ui)
            }
        }
    }
}

/// The named projects, or every project when none are named.
pub(crate) fn selected_projects(builder: &Builder, named: &[String]) -> Vec<String> {
    if named.is_empty() {
        builder.list_projects()
    } else {
        named.to_vec()
    }
}
