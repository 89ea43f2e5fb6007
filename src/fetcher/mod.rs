//! Pluggable fetch strategies.
//!
//! A [`Fetcher`] brings a remote package into the workspace, pins it to a
//! revision when asked, and advances it when an update is requested. Each
//! strategy lives in its own module and registers itself with a
//! [`FetcherRegistry`] under a name that repo configs refer to:
//!
//! - [`git`] (`"git"`) clones directly into `<GOPATH>/src/<dir>/<repo>`
//! - [`goget`] (`"goget"`) delegates placement to `go get`
//!
//! Both share the checkout/update policy in [`sync_checkout`]: a revision is
//! checked out whenever one is given, and an update is skipped with a warning
//! when the checkout is detached, so pinned repositories never move.

pub mod git;
pub mod goget;
pub mod registry;

pub use registry::{FetcherFactory, FetcherRegistry};

use crate::config::Config;
use crate::error::Result;
use crate::shell::CommandRunner;
use std::fmt;
use std::path::Path;

/// One fetch request, built from a repo's configuration.
#[derive(Debug, Clone, Copy)]
pub struct FetchRequest<'a> {
    /// Clone URL or import path.
    pub url: &'a str,
    /// Revision to check out, if pinned.
    pub revision: Option<&'a str>,
    /// Whether to pull updates into an existing checkout.
    pub update: bool,
    /// The repo's configuration subtree.
    pub config: &'a Config,
}

/// What a fetch actually did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOutcome {
    /// The package was absent and has been cloned/fetched.
    pub fetched: bool,
    /// A revision was checked out.
    pub checked_out: bool,
    /// New changes were pulled.
    pub updated: bool,
    /// An update was requested but the checkout is detached.
    pub update_skipped: bool,
}

/// A fetch strategy.
pub trait Fetcher: fmt::Debug {
    /// The strategy name this fetcher is registered under.
    fn name(&self) -> &str;

    /// Fetch, check out and update one repository.
    fn fetch(&self, request: &FetchRequest<'_>) -> Result<FetchOutcome>;
}

/// Apply the checkout and update policy to an existing local copy.
///
/// `outcome.fetched` must already reflect whether the copy was just created;
/// a fresh copy is never pulled again.
pub fn sync_checkout(
    runner: &dyn CommandRunner,
    fetcher: &str,
    dir: &Path,
    request: &FetchRequest<'_>,
    pull_args: &[String],
    mut outcome: FetchOutcome,
) -> Result<FetchOutcome> {
    let revision = request.revision.unwrap_or_default();

    if let Some(rev) = request.revision.filter(|r| !r.is_empty()) {
        crate::git::checkout(runner, dir, rev)?;
        outcome.checked_out = true;
        tracing::info!(fetcher, url = request.url, revision = rev, "Checked out");
    }

    if request.update && !outcome.fetched {
        if crate::git::is_detached(runner, dir)? {
            outcome.update_skipped = true;
            tracing::warn!(
                fetcher,
                url = request.url,
                revision,
                "Repo detached, update skipped"
            );
        } else {
            crate::git::pull(runner, dir, pull_args)?;
            outcome.updated = true;
            tracing::info!(fetcher, url = request.url, revision, "Updated");
        }
    }

    Ok(outcome)
}
