//! `go get` fetch strategy.
//!
//! The repo URL is treated as an import path and placement follows the go
//! toolchain's own GOPATH convention. Repo config keys:
//!
//! - `args`: extra `go get` arguments

use crate::config::Config;
use crate::error::{BuilderError, Result};
use crate::toolchain::Toolchain;
use std::sync::Arc;

use super::{sync_checkout, FetchOutcome, FetchRequest, Fetcher, FetcherRegistry};

/// Strategy name.
pub const NAME: &str = "goget";

/// Add the goget strategy to `registry`.
pub fn register(registry: &mut FetcherRegistry) {
    registry.register(NAME, |config, toolchain| {
        Ok(Box::new(GoGetFetcher::new(config, toolchain)) as Box<dyn Fetcher>)
    });
}

/// Fetches packages with `go get -d`.
#[derive(Debug)]
pub struct GoGetFetcher {
    toolchain: Arc<Toolchain>,
}

impl GoGetFetcher {
    /// Create a goget fetcher. The strategy takes no options of its own.
    pub fn new(_config: &Config, toolchain: Arc<Toolchain>) -> Self {
        Self { toolchain }
    }
}

impl Fetcher for GoGetFetcher {
    fn name(&self) -> &str {
        NAME
    }

    fn fetch(&self, request: &FetchRequest<'_>) -> Result<FetchOutcome> {
        let workspace = self.toolchain.workspace();
        workspace.primary_root()?;

        let package = request.url;
        let mut outcome = FetchOutcome::default();

        let package_dir = match workspace.find(package) {
            Some(location) => location.dir,
            None => {
                self.toolchain
                    .get(None, &request.config.get_string_list("args"), &[package])?;
                outcome.fetched = true;
                tracing::info!(
                    fetcher = NAME,
                    url = request.url,
                    revision = request.revision.unwrap_or_default(),
                    "Fetched"
                );

                workspace
                    .find(package)
                    .ok_or_else(|| BuilderError::PackageNotFound {
                        package: package.to_string(),
                    })?
                    .dir
            }
        };

        sync_checkout(
            self.toolchain.runner(),
            NAME,
            &package_dir,
            request,
            &[],
            outcome,
        )
    }
}
