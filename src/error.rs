//! Error types for gobuilder operations.
//!
//! This module defines [`BuilderError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Configuration problems are fatal and surface before any subprocess runs
//! - Subprocess failures carry the command line, exit code and captured stderr
//! - Fetch and build failures are wrapped with the fetcher or project they
//!   came from
//! - Dependency revision lookups never produce a `BuilderError`; they use
//!   [`crate::project::revision::RevisionError`] and are logged instead

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for gobuilder operations.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// A required configuration value is missing or empty.
    #[error("Missing required field '{field}' in {context}")]
    MissingField { field: String, context: String },

    /// A project has no configuration subtree.
    #[error("Could not initialize project '{project}': config is empty")]
    ProjectConfigEmpty { project: String },

    /// A project does not declare a `fetchers` section.
    #[error("Could not initialize project '{project}': fetchers config is not set")]
    FetchersNotConfigured { project: String },

    /// A fetch strategy was requested that is not registered.
    #[error("Fetcher '{name}' not found")]
    FetcherNotFound { name: String },

    /// Two configuration sources declare the same project.
    #[error("Project '{name}' already exists")]
    DuplicateProject { name: String },

    /// A project was requested that is not configured.
    #[error("Unknown project: {name}")]
    ProjectNotFound { name: String },

    /// The workspace search path (GOPATH) is empty.
    #[error("Workspace search path is empty (set GOPATH)")]
    WorkspaceNotConfigured,

    /// A repository name could not be derived from a URL.
    #[error("Could not derive a repository name from url: {url}")]
    InvalidRepoUrl { url: String },

    /// A package is still missing from the workspace after fetching it.
    #[error("Package '{package}' not found in workspace after fetch")]
    PackageNotFound { package: String },

    /// Entry-point template could not be rendered.
    #[error("Template error: {message}")]
    TemplateError { message: String },

    /// External command exited unsuccessfully.
    #[error("Command failed with exit code {code:?}: {command}{}", format_stderr(.stderr))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// External command could not be started.
    #[error("Failed to start command '{command}': {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A fetch strategy failed for a repository.
    #[error("Fetcher '{fetcher}' failed for {url}: {source}")]
    Fetch {
        fetcher: String,
        url: String,
        #[source]
        source: Box<BuilderError>,
    },

    /// A project build failed.
    #[error("Build of project '{project}' failed: {source}")]
    Build {
        project: String,
        #[source]
        source: Box<BuilderError>,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn format_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\n{trimmed}")
    }
}

impl BuilderError {
    /// Shorthand for [`BuilderError::MissingField`].
    pub fn missing(field: impl Into<String>, context: impl Into<String>) -> Self {
        BuilderError::MissingField {
            field: field.into(),
            context: context.into(),
        }
    }

    /// Walk through `Fetch` and `Build` wrappers to the underlying error.
    pub fn root_cause(&self) -> &BuilderError {
        match self {
            BuilderError::Fetch { source, .. } | BuilderError::Build { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }
}

/// Result type alias for gobuilder operations.
pub type Result<T> = std::result::Result<T, BuilderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_not_found_displays_path() {
        let err = BuilderError::ConfigNotFound {
            path: PathBuf::from("/foo/gobuilder.yml"),
        };
        assert!(err.to_string().contains("/foo/gobuilder.yml"));
    }

    #[test]
    fn config_parse_error_displays_path_and_message() {
        let err = BuilderError::ConfigParseError {
            path: PathBuf::from("/config.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/config.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn missing_field_displays_field_and_context() {
        let err = BuilderError::missing("dir", "repo https://example.com/x.git");
        let msg = err.to_string();
        assert!(msg.contains("'dir'"));
        assert!(msg.contains("https://example.com/x.git"));
    }

    #[test]
    fn duplicate_project_displays_name() {
        let err = BuilderError::DuplicateProject {
            name: "api".into(),
        };
        assert_eq!(err.to_string(), "Project 'api' already exists");
    }

    #[test]
    fn command_failed_includes_stderr_when_present() {
        let err = BuilderError::CommandFailed {
            command: "git pull".into(),
            code: Some(1),
            stderr: "fatal: not a git repository\n".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("git pull"));
        assert!(msg.ends_with("fatal: not a git repository"));
    }

    #[test]
    fn command_failed_without_stderr_is_single_line() {
        let err = BuilderError::CommandFailed {
            command: "go build".into(),
            code: Some(2),
            stderr: String::new(),
        };
        assert!(!err.to_string().contains('\n'));
    }

    #[test]
    fn root_cause_unwraps_context() {
        let err = BuilderError::Build {
            project: "api".into(),
            source: Box::new(BuilderError::Fetch {
                fetcher: "git".into(),
                url: "u".into(),
                source: Box::new(BuilderError::WorkspaceNotConfigured),
            }),
        };
        assert!(matches!(
            err.root_cause(),
            BuilderError::WorkspaceNotConfigured
        ));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: BuilderError = io_err.into();
        assert!(matches!(err, BuilderError::Io(_)));
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(BuilderError::WorkspaceNotConfigured)
        }
        assert!(returns_error().is_err());
    }
}
