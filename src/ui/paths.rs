//! Shortened path display.

use std::path::{Path, PathBuf};

/// Renders paths relative to a common base directory.
///
/// `/home/u/env/lib/python3.11/site-packages/tensorrt_libs/libnvinfer.so.8`
/// is shown as `tensorrt_libs/libnvinfer.so.8` when the base is the
/// site-packages directory.
#[derive(Debug, Clone, Default)]
pub struct PathDisplay {
    base: Option<PathBuf>,
}

impl PathDisplay {
    /// Strip `base` from displayed paths.
    pub fn relative_to(base: impl Into<PathBuf>) -> Self {
        Self {
            base: Some(base.into()),
        }
    }

    /// Show complete paths.
    pub fn full() -> Self {
        Self { base: None }
    }

    /// Format a path for display.
    pub fn show(&self, path: &Path) -> String {
        match &self.base {
            Some(base) => match path.strip_prefix(base) {
                Ok(rest) if !rest.as_os_str().is_empty() => rest.display().to_string(),
                _ => path.display().to_string(),
            },
            None => path.display().to_string(),
        }
    }
}
