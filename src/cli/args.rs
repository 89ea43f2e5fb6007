//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// gobuilder - build Go binaries from declaratively configured projects.
#[derive(Debug, Parser)]
#[command(name = "gobuilder")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file; repeat to combine projects from several files
    /// (default: gobuilder.yml)
    #[arg(short, long = "config", global = true, value_name = "FILE")]
    pub config: Vec<PathBuf>,

    /// Pull updates into repos that are already present
    #[arg(short, long, global = true)]
    pub update: bool,

    /// Template for the generated main file (default: built-in)
    #[arg(long, global = true, value_name = "FILE")]
    pub template: Option<PathBuf>,

    /// Template variable, repeatable
    #[arg(long = "set", global = true, value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub set: Vec<(String, String)>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List configured projects
    List(ListArgs),

    /// Build projects (all when none are named)
    Build(BuildArgs),

    /// Build a project into a scratch directory and run it
    Run(RunArgs),

    /// Fetch and update the repos of projects (all when none are named)
    Pull(PullArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `build` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct BuildArgs {
    /// Projects to build
    #[arg(value_name = "PROJECT")]
    pub projects: Vec<String>,
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, clap::Args)]
pub struct RunArgs {
    /// Project to run
    pub project: String,

    /// Arguments passed to the built binary
    #[arg(last = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

/// Arguments for the `pull` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct PullArgs {
    /// Projects to pull
    #[arg(value_name = "PROJECT")]
    pub projects: Vec<String>,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
