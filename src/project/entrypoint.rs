//! Generated entry-point sources.
//!
//! Every build writes two Go files into its scratch directory: an imports
//! unit that blank-imports each configured package, and a main unit
//! rendered from the entry template. Text generation here is pure; the
//! caller owns the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

/// File name of the rendered main unit.
pub fn main_file_name(project: &str) -> String {
    format!("main_{project}.go")
}

/// File name of the generated imports unit.
pub fn imports_file_name(project: &str) -> String {
    format!("main_{project}_imports.go")
}

/// `package main` followed by one blank import per package.
pub fn imports_source<S: AsRef<str>>(packages: &[S]) -> String {
    let mut source = String::from("package main\n");
    for package in packages {
        source.push_str(&format!("import _ \"{}\"\n", package.as_ref()));
    }
    source
}

/// Removes a file when dropped.
///
/// Holds the imports unit for the duration of a build so it disappears
/// however the build ends.
#[derive(Debug)]
pub struct RemoveOnDrop {
    path: PathBuf,
}

impl RemoveOnDrop {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RemoveOnDrop {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::debug!(path = %self.path.display(), error = %e, "Could not remove generated file");
        }
    }
}
