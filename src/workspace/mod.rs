//! Workspace search path and package lookup.
//!
//! The workspace is an ordered list of roots (a `GOPATH`). A package with
//! import path `github.com/org/lib` lives at `<root>/src/github.com/org/lib`
//! under the first root where that directory exists. Lookups never touch
//! the filesystem beyond `is_dir` checks.

use crate::error::{BuilderError, Result};
use std::path::{Path, PathBuf};

/// Where a package was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLocation {
    /// The search root that contains the package.
    pub root: PathBuf,
    /// Absolute package directory (`<root>/src/<package>`).
    pub dir: PathBuf,
}

/// Ordered list of workspace roots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    roots: Vec<PathBuf>,
}

impl SearchPath {
    /// Parse a colon-separated list, ignoring empty entries.
    pub fn parse(value: &str) -> Self {
        Self {
            roots: std::env::split_paths(value)
                .filter(|p| !p.as_os_str().is_empty())
                .collect(),
        }
    }

    /// Build from explicit roots.
    pub fn from_roots<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    /// Read `GOPATH` from the environment. Empty when unset.
    pub fn from_env() -> Self {
        std::env::var("GOPATH")
            .map(|v| Self::parse(&v))
            .unwrap_or_default()
    }

    /// The roots, in search order.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// True when there is no root to search or create packages in.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// A copy with `root` appended (used to add `GOROOT` for lookups).
    pub fn with_root(&self, root: impl Into<PathBuf>) -> Self {
        let mut roots = self.roots.clone();
        roots.push(root.into());
        Self { roots }
    }

    /// The root new packages are placed in.
    ///
    /// # Errors
    ///
    /// Returns `WorkspaceNotConfigured` when the search path is empty.
    pub fn primary_root(&self) -> Result<&Path> {
        self.roots
            .first()
            .map(PathBuf::as_path)
            .ok_or(BuilderError::WorkspaceNotConfigured)
    }

    /// Directory `package` would occupy under `root`.
    pub fn package_dir(root: &Path, package: &str) -> PathBuf {
        root.join("src").join(package)
    }

    /// Find an existing local copy of `package`.
    pub fn find(&self, package: &str) -> Option<PackageLocation> {
        self.roots.iter().find_map(|root| {
            let dir = Self::package_dir(root, package);
            dir.is_dir().then(|| PackageLocation {
                root: root.clone(),
                dir,
            })
        })
    }

    /// Whether a local copy of `package` exists.
    pub fn contains(&self, package: &str) -> bool {
        self.find(package).is_some()
    }
}
