//! Configuration file discovery and loading.
//!
//! Each config file is a YAML mapping keyed by project name. A sibling
//! `<stem>.local.<ext>` file, when present, is deep-merged on top of it so
//! developers can pin revisions or add targets without touching the shared
//! file.

use crate::config::merger::deep_merge;
use crate::config::node::Config;
use crate::error::{BuilderError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file used when none is given on the command line.
pub const DEFAULT_CONFIG_FILE: &str = "gobuilder.yml";

/// Path of the local override file for `path`.
///
/// `gobuilder.yml` becomes `gobuilder.local.yml`.
pub fn local_override_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}.local.{}", stem, ext.to_string_lossy()),
        None => format!("{}.local", stem),
    };
    path.with_file_name(name)
}

/// Parse YAML content into a [`Config`].
///
/// # Arguments
///
/// * `content` - The YAML content to parse
/// * `source_path` - Path for error reporting
pub fn parse_config(content: &str, source_path: &Path) -> Result<Config> {
    Config::from_yaml_str(content).map_err(|e| BuilderError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

fn read_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            BuilderError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            BuilderError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Load a config file, merging its local override if one exists.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if either file is invalid YAML.
pub fn load_config_file(path: &Path) -> Result<Config> {
    let base = read_config(path)?;

    let local = local_override_path(path);
    if !local.is_file() {
        return Ok(base);
    }

    tracing::debug!(path = %local.display(), "Merging local config override");
    let overlay = read_config(&local)?;
    Ok(Config::new(deep_merge(base.value(), overlay.value())))
}

/// Load every config file in order.
///
/// With no paths, loads [`DEFAULT_CONFIG_FILE`] from `cwd`.
pub fn load_configs(paths: &[PathBuf], cwd: &Path) -> Result<Vec<Config>> {
    if paths.is_empty() {
        return Ok(vec![load_config_file(&cwd.join(DEFAULT_CONFIG_FILE))?]);
    }

    paths
        .iter()
        .map(|p| {
            if p.is_absolute() {
                load_config_file(p)
            } else {
                load_config_file(&cwd.join(p))
            }
        })
        .collect()
}
