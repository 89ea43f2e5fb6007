//! Entry-point templates.
//!
//! An [`EntryTemplate`] renders the `main` source unit of a project build.
//! Rendering is a pure function of the template text, the build
//! [`Metadata`] and the caller's [`TemplateData`]; nothing here touches the
//! filesystem except [`EntryTemplate::from_file`].
//!
//! # Variables
//!
//! Metadata variables take priority over caller data:
//!
//! | Variable          | Value                                           |
//! |-------------------|-------------------------------------------------|
//! | `name`            | project name                                    |
//! | `packages`        | configured packages, one per line               |
//! | `packages_json`   | configured packages as a JSON array             |
//! | `revisions_json`  | resolved dependency revisions as a JSON array   |
//! | `built_at`        | RFC 3339 UTC timestamp of the build             |
//! | `config.<path>`   | scalar from the project config                  |
//!
//! Appending `_go` to any metadata variable (`name_go`, `revisions_json_go`)
//! yields its value as a quoted Go string literal.

pub mod interpolation;

use crate::config::Config;
use crate::error::{BuilderError, Result};
use crate::project::revision::PackageRevision;
use chrono::{DateTime, SecondsFormat, Utc};
use include_dir::{include_dir, Dir};
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::Path;

static TEMPLATES_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// File name of the embedded default template.
pub const DEFAULT_TEMPLATE: &str = "main.go.tmpl";

/// Caller-supplied template variables (`--set key=value`).
pub type TemplateData = BTreeMap<String, String>;

/// Build metadata handed to the template.
#[derive(Debug, Clone)]
pub struct Metadata {
    pub name: String,
    pub packages: Vec<String>,
    pub config: Config,
    pub revisions: Vec<PackageRevision>,
    pub built_at: DateTime<Utc>,
}

impl Metadata {
    fn lookup(&self, variable: &str) -> Option<String> {
        self.value(variable).or_else(|| {
            let value = self.value(variable.strip_suffix("_go")?)?;
            go_string_literal(&value)
        })
    }

    fn value(&self, variable: &str) -> Option<String> {
        match variable {
            "name" => Some(self.name.clone()),
            "packages" => Some(self.packages.join("\n")),
            "packages_json" => serde_json::to_string(&self.packages).ok(),
            "revisions_json" => serde_json::to_string(&self.revisions).ok(),
            "built_at" => Some(self.built_at.to_rfc3339_opts(SecondsFormat::Secs, true)),
            _ => {
                let path = variable.strip_prefix("config.")?;
                self.config
                    .has(path)
                    .then(|| self.config.get_string(path))
            }
        }
    }
}

/// A JSON string is also a valid Go interpreted string literal.
fn go_string_literal(value: &str) -> Option<String> {
    serde_json::to_string(value).ok()
}

/// Template for the generated `main` source unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryTemplate {
    origin: String,
    source: String,
}

impl EntryTemplate {
    /// The template embedded in the binary.
    pub fn builtin() -> Result<Self> {
        let file = TEMPLATES_DIR
            .get_file(DEFAULT_TEMPLATE)
            .ok_or_else(|| BuilderError::TemplateError {
                message: format!("embedded template {DEFAULT_TEMPLATE} is missing"),
            })?;

        let source = file
            .contents_utf8()
            .ok_or_else(|| BuilderError::TemplateError {
                message: format!("embedded template {DEFAULT_TEMPLATE} is not valid UTF-8"),
            })?;

        Ok(Self::from_source(format!("builtin:{DEFAULT_TEMPLATE}"), source))
    }

    /// Load a template from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| BuilderError::TemplateError {
            message: format!("could not read {}: {e}", path.display()),
        })?;

        Ok(Self::from_source(path.display().to_string(), source))
    }

    /// Wrap template text. `origin` names it in diagnostics.
    pub fn from_source(origin: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            source: source.into(),
        }
    }

    /// Where the template came from.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// The raw template text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Variables the template references.
    pub fn variables(&self) -> BTreeSet<String> {
        interpolation::variables(&self.source)
    }

    /// Render the template.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError` when a referenced variable is neither a
    /// metadata variable nor present in `data`.
    pub fn render(&self, metadata: &Metadata, data: &TemplateData) -> Result<String> {
        interpolation::render(&self.source, |variable| {
            metadata
                .lookup(variable)
                .or_else(|| data.get(variable).cloned())
        })
        .map_err(|e| match e {
            BuilderError::TemplateError { message } => BuilderError::TemplateError {
                message: format!("{}: {message}", self.origin),
            },
            other => other,
        })
    }
}
