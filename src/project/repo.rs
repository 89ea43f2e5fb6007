//! A dependency repository bound to its fetcher.

use crate::config::Config;
use crate::error::{BuilderError, Result};
use crate::fetcher::{FetchOutcome, FetchRequest, Fetcher};

/// Strategy used when a repo does not name one.
pub const DEFAULT_FETCHER: &str = "goget";

/// One entry of a project's `repos` section.
///
/// Built fresh for every pull; borrows the fetcher from its project.
#[derive(Debug)]
pub struct Repo<'a> {
    pub name: String,
    pub url: String,
    pub fetcher: &'a dyn Fetcher,
    pub revision: Option<String>,
    pub update: bool,
    pub config: Config,
}

impl Repo<'_> {
    /// The fetch request this repo describes.
    pub fn request(&self) -> FetchRequest<'_> {
        FetchRequest {
            url: &self.url,
            revision: self.revision.as_deref(),
            update: self.update,
            config: &self.config,
        }
    }

    /// Fetch, check out and update this repo.
    ///
    /// # Errors
    ///
    /// Any fetcher failure, wrapped in `BuilderError::Fetch`.
    pub fn pull(&self) -> Result<FetchOutcome> {
        self.fetcher
            .fetch(&self.request())
            .map_err(|e| BuilderError::Fetch {
                fetcher: self.fetcher.name().to_string(),
                url: self.url.clone(),
                source: Box::new(e),
            })
    }
}
