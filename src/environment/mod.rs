//! Python runtime environment resolution.
//!
//! - [`resolver`] - The runtime root from `VIRTUAL_ENV` or `CONDA_PREFIX`
//! - [`python`] - The `pythonX.Y` directory and its `site-packages`

pub mod python;
pub mod resolver;

use std::path::PathBuf;

pub use python::{discover_python_version, site_packages_dir};
pub use resolver::{RuntimeRoot, ROOT_VARS};

use crate::error::Result;

/// A resolved runtime: root, Python version, and `site-packages`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeEnvironment {
    pub root: RuntimeRoot,
    pub python_version: String,
    pub site_packages: PathBuf,
}

impl RuntimeEnvironment {
    /// Resolve from a root, using `python_version` when given and
    /// discovering it otherwise.
    pub fn resolve(root: RuntimeRoot, python_version: Option<&str>) -> Result<Self> {
        let python_version = match python_version {
            Some(version) => version.to_string(),
            None => discover_python_version(&root.path)?,
        };
        let site_packages = site_packages_dir(&root.path, &python_version);
        tracing::debug!("Using site-packages at {}", site_packages.display());

        Ok(Self {
            root,
            python_version,
            site_packages,
        })
    }
}
