//! Dependency revision discovery.
//!
//! Before compiling, a build snapshots the commit of every transitive
//! dependency that has a local git checkout. The snapshot is metadata for
//! the entry template, so nothing in here can fail a build: lookup problems
//! are [`RevisionError`]s that get logged and dropped.

use crate::error::BuilderError;
use crate::git;
use crate::toolchain::Toolchain;
use crate::workspace::SearchPath;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// The checked-out state of one dependency at build time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRevision {
    /// Import path.
    pub package: String,
    /// Branch or tag name; empty when neither could be read.
    pub branch: String,
    /// Commit id.
    pub revision: String,
}

/// Why a dependency has no [`PackageRevision`].
#[derive(Debug, Error)]
pub enum RevisionError {
    #[error("dependency listing failed: {0}")]
    List(#[source] BuilderError),

    #[error("package not found in search path")]
    NotFound,

    #[error("could not read commit id: {0}")]
    Commit(#[source] BuilderError),

    #[error("could not read branch or tag: {0}")]
    Branch(#[source] BuilderError),
}

/// Snapshot the revisions of every dependency of `sources`.
///
/// Dependencies are listed with `go list` inside `dir`, resolved against the
/// toolchain's lookup path and deduplicated by import path, keeping the
/// first occurrence. Never fails; see [`RevisionError`].
pub fn discover_revisions(
    toolchain: &Toolchain,
    project: &str,
    dir: &Path,
    sources: &[&Path],
) -> Vec<PackageRevision> {
    let packages = match toolchain.list_deps(dir, sources) {
        Ok(packages) => packages,
        Err(e) => {
            let error = RevisionError::List(e);
            tracing::debug!(project, error = %error, "Skipping revision discovery");
            return Vec::new();
        }
    };

    let lookup = toolchain.lookup_path();
    let mut seen = HashSet::new();
    let mut revisions = Vec::new();

    for package in packages {
        if !seen.insert(package.clone()) {
            continue;
        }

        match package_revision(toolchain, &lookup, project, &package) {
            Ok(revision) => revisions.push(revision),
            Err(error) => {
                tracing::debug!(project, package = %package, error = %error, "Package revision skipped");
            }
        }
    }

    revisions
}

fn package_revision(
    toolchain: &Toolchain,
    lookup: &SearchPath,
    project: &str,
    package: &str,
) -> Result<PackageRevision, RevisionError> {
    let location = lookup.find(package).ok_or(RevisionError::NotFound)?;
    let runner = toolchain.runner();

    let revision = git::commit_sha(runner, &location.dir).map_err(RevisionError::Commit)?;

    let branch = git::branch_or_tag(runner, &location.dir).unwrap_or_else(|e| {
        let error = RevisionError::Branch(e);
        tracing::debug!(
            project,
            package,
            pkg_path = %location.dir.display(),
            error = %error,
            "Branch or tag unknown"
        );
        String::new()
    });

    Ok(PackageRevision {
        package: package.to_string(),
        branch,
        revision,
    })
}
