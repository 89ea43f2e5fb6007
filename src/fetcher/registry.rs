//! Registry of fetch strategies.
//!
//! The registry maps a strategy name to a constructor. Strategy modules add
//! themselves through their `register` function; [`FetcherRegistry::builtin`]
//! calls each of those once. The registry is an ordinary value handed to the
//! [`crate::Builder`], so tests can register fakes next to (or instead of)
//! the built-in strategies.

use crate::config::Config;
use crate::error::{BuilderError, Result};
use crate::toolchain::Toolchain;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::Fetcher;

/// Constructs a fetcher from its `fetchers.<name>` config subtree.
pub type FetcherFactory =
    Arc<dyn Fn(&Config, Arc<Toolchain>) -> Result<Box<dyn Fetcher>> + Send + Sync>;

/// Strategy name to constructor mapping.
#[derive(Clone, Default)]
pub struct FetcherRegistry {
    factories: BTreeMap<String, FetcherFactory>,
}

impl fmt::Debug for FetcherRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetcherRegistry")
            .field("fetchers", &self.names())
            .finish()
    }
}

impl FetcherRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the `git` and `goget` strategies.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        super::git::register(&mut registry);
        super::goget::register(&mut registry);
        registry
    }

    /// Register a constructor under `name`. A later registration replaces an
    /// earlier one with the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&Config, Arc<Toolchain>) -> Result<Box<dyn Fetcher>> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    /// Registered strategy names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }

    /// Instantiate the strategy `name`.
    ///
    /// # Errors
    ///
    /// Returns `FetcherNotFound` for an unregistered name, or whatever the
    /// constructor reports.
    pub fn create(
        &self,
        name: &str,
        config: &Config,
        toolchain: Arc<Toolchain>,
    ) -> Result<Box<dyn Fetcher>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| BuilderError::FetcherNotFound {
                name: name.to_string(),
            })?;
        factory(config, toolchain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::{FetchOutcome, FetchRequest};
    use crate::shell::RecordingRunner;
    use crate::workspace::SearchPath;

    #[derive(Debug)]
    struct Named(&'static str);

    impl Fetcher for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn fetch(&self, _request: &FetchRequest<'_>) -> Result<FetchOutcome> {
            Ok(FetchOutcome::default())
        }
    }

    fn toolchain() -> Arc<Toolchain> {
        Arc::new(Toolchain::new(
            Arc::new(RecordingRunner::new()),
            SearchPath::default(),
        ))
    }

    #[test]
    fn builtin_registers_git_and_goget() {
        assert_eq!(FetcherRegistry::builtin().names(), vec!["git", "goget"]);
    }

    #[test]
    fn create_unknown_is_fetcher_not_found() {
        let err = FetcherRegistry::new()
            .create("svn", &Config::default(), toolchain())
            .unwrap_err();

        assert!(matches!(err, BuilderError::FetcherNotFound { name } if name == "svn"));
    }

    #[test]
    fn last_registration_wins() {
        let mut registry = FetcherRegistry::new();
        registry.register("fake", |_, _| Ok(Box::new(Named("first")) as Box<dyn Fetcher>));
        registry.register("fake", |_, _| Ok(Box::new(Named("second")) as Box<dyn Fetcher>));

        let fetcher = registry
            .create("fake", &Config::default(), toolchain())
            .unwrap();

        assert_eq!(fetcher.name(), "second");
        assert_eq!(registry.names(), vec!["fake"]);
    }

    #[test]
    fn constructor_receives_config() {
        let mut registry = FetcherRegistry::new();
        registry.register("picky", |config, _| {
            if config.get_string("token").is_empty() {
                Err(BuilderError::missing("token", "fetchers.picky"))
            } else {
                Ok(Box::new(Named("picky")) as Box<dyn Fetcher>)
            }
        });

        let empty = registry.create("picky", &Config::default(), toolchain());
        let configured = registry.create(
            "picky",
            &Config::from_yaml_str("token: abc").unwrap(),
            toolchain(),
        );

        assert!(matches!(empty, Err(BuilderError::MissingField { .. })));
        assert!(configured.is_ok());
    }
}
