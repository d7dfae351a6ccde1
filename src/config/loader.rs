//! Configuration file discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::SolinkConfig;
use crate::error::{Result, SolinkError};

/// File name looked up in the user config directory.
pub const CONFIG_FILE_NAME: &str = "config.yml";

/// The user config file location, whether or not it exists.
///
/// `$XDG_CONFIG_HOME/solink/config.yml` when set, otherwise
/// `$HOME/.config/solink/config.yml`.
pub fn user_config_path() -> Option<PathBuf> {
    user_config_path_with_env(|key| std::env::var(key))
}

/// [`user_config_path`] with a custom env var lookup (for testing).
pub fn user_config_path_with_env<F>(env_fn: F) -> Option<PathBuf>
where
    F: Fn(&str) -> std::result::Result<String, std::env::VarError>,
{
    let non_empty = |key: &str| env_fn(key).ok().filter(|v| !v.is_empty());

    let base = non_empty("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| non_empty("HOME").map(|home| PathBuf::from(home).join(".config")))?;

    Some(base.join("solink").join(CONFIG_FILE_NAME))
}

/// Load a single config file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<SolinkConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SolinkError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            SolinkError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into a config.
///
/// Blank files parse to the default config.
pub fn parse_config(content: &str, source_path: &Path) -> Result<SolinkConfig> {
    if content.trim().is_empty() {
        return Ok(SolinkConfig::default());
    }

    serde_yaml::from_str(content).map_err(|e| SolinkError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load config with an optional explicit path.
///
/// An explicit path must exist. Without one, the user config file is used
/// if present, and defaults otherwise. Returns the config and the file it
/// came from.
pub fn load_config(config_override: Option<&Path>) -> Result<(SolinkConfig, Option<PathBuf>)> {
    load_config_from(config_override, user_config_path())
}

fn load_config_from(
    config_override: Option<&Path>,
    user_path: Option<PathBuf>,
) -> Result<(SolinkConfig, Option<PathBuf>)> {
    if let Some(path) = config_override {
        let config = load_config_file(path)?;
        return Ok((config, Some(path.to_path_buf())));
    }

    match user_path {
        Some(path) if path.is_file() => {
            tracing::debug!("Loading config from {}", path.display());
            let config = load_config_file(&path)?;
            Ok((config, Some(path)))
        }
        _ => Ok((SolinkConfig::default(), None)),
    }
}
