//! Python version discovery under a runtime root.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::error::{Result, SolinkError};

static PYTHON_DIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^python(\d+)\.(\d+)([A-Za-z]*)$").expect("Invalid python dir regex")
});

/// Path of `site-packages` for a runtime root and Python version.
pub fn site_packages_dir(root: &Path, python_version: &str) -> PathBuf {
    root.join("lib")
        .join(format!("python{}", python_version))
        .join("site-packages")
}

/// Find the Python version installed under `root`.
///
/// Looks for `lib/pythonX.Y` directories that contain `site-packages` and
/// returns the highest `X.Y` (with any ABI suffix such as `t`).
pub fn discover_python_version(root: &Path) -> Result<String> {
    let lib = root.join("lib");
    let not_found = || SolinkError::PythonVersionNotFound {
        root: root.to_path_buf(),
    };

    let entries = std::fs::read_dir(&lib).map_err(|_| not_found())?;

    let mut best: Option<((u32, u32), String)> = None;
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        let Some(caps) = PYTHON_DIR_RE.captures(name) else {
            continue;
        };
        if !entry.path().join("site-packages").is_dir() {
            continue;
        }
        let (Ok(major), Ok(minor)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) else {
            continue;
        };
        let version = name.trim_start_matches("python").to_string();

        let better = match &best {
            Some((key, current)) => (major, minor) > *key
                || ((major, minor) == *key && version < *current),
            None => true,
        };
        if better {
            best = Some(((major, minor), version));
        }
    }

    best.map(|(_, version)| version).ok_or_else(not_found)
}
