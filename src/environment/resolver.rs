//! Locating the active Python runtime root.

use std::path::PathBuf;

use crate::error::{Result, SolinkError};

/// Variables naming a runtime root, in priority order.
pub const ROOT_VARS: [&str; 2] = ["VIRTUAL_ENV", "CONDA_PREFIX"];

/// The root directory of the active virtual or conda environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeRoot {
    /// Root directory.
    pub path: PathBuf,
    /// The variable it was read from.
    pub detected_via: String,
}

impl RuntimeRoot {
    /// Resolve from the process environment.
    pub fn resolve() -> Result<Self> {
        Self::resolve_with_env(|key| std::env::var(key))
    }

    /// Resolve with a custom env var lookup (for testing).
    ///
    /// Empty values are treated as unset.
    pub fn resolve_with_env<F>(env_fn: F) -> Result<Self>
    where
        F: Fn(&str) -> std::result::Result<String, std::env::VarError>,
    {
        for var in ROOT_VARS {
            if let Ok(value) = env_fn(var) {
                if !value.is_empty() {
                    tracing::debug!("Runtime root {} (from {})", value, var);
                    return Ok(Self {
                        path: PathBuf::from(value),
                        detected_via: var.to_string(),
                    });
                }
            }
        }

        Err(SolinkError::RuntimeRootMissing {
            vars: ROOT_VARS.join(" or "),
        })
    }
}
