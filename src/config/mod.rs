//! Configuration loading and access for gobuilder.
//!
//! - [`node`] provides [`Config`], dot-path access to a YAML subtree
//! - [`loader`] finds and parses config files
//! - [`merger`] layers `*.local.yml` overrides onto a config file
//!
//! # Example
//!
//! ```
//! use gobuilder::config::Config;
//!
//! let config = Config::from_yaml_str(
//!     "api:\n  packages: [github.com/org/plugin]\n  build:\n    target:\n      linux: [amd64]\n",
//! )
//! .unwrap();
//!
//! assert_eq!(config.keys(), vec!["api"]);
//! assert_eq!(config.get_string_list("api.packages"), vec!["github.com/org/plugin"]);
//! assert_eq!(config.get_config("api.build.target").keys(), vec!["linux"]);
//! ```
//!
//! # Layout
//!
//! ```yaml
//! api:
//!   fetchers:
//!     git: {}
//!     goget: {}
//!   repos:
//!     lib:
//!       url: https://github.com/org/lib.git
//!       fetcher: git
//!       revision: v1.2.0
//!       dir: github.com/org
//!   packages:
//!     - github.com/org/lib/plugin
//!   build:
//!     args:
//!       go-build: [-trimpath]
//!     target:
//!       linux: [amd64, arm64]
//! ```

pub mod loader;
pub mod merger;
pub mod node;

pub use loader::{load_config_file, load_configs, parse_config, DEFAULT_CONFIG_FILE};
pub use merger::deep_merge;
pub use node::Config;
