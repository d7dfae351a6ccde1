//! Configuration schema definitions for solink.
//!
//! These structs map to the YAML configuration file format. Every field
//! has a default, so an empty file (or no file at all) is a valid config.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::trace::DEFAULT_PATTERN;

/// Root configuration structure for `config.yml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolinkConfig {
    /// Python version under `<root>/lib/` (e.g., "3.11").
    ///
    /// Discovered from the environment when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python_version: Option<String>,

    /// How the import is traced.
    pub trace: TraceConfig,

    /// Regular expression matching missing library names in the trace.
    pub pattern: String,

    /// Directories to reconcile, relative to site-packages.
    pub targets: Vec<PathBuf>,

    /// Directory used when a target has no matching file.
    ///
    /// `null` disables the fallback.
    pub fallback: Option<PathBuf>,

    /// Require the major version of the found file to match.
    pub check_version: bool,

    /// Print absolute paths instead of site-packages relative ones.
    pub full_paths: bool,

    /// List each target directory after reconciling.
    pub show_contents: bool,

    /// Program used to retry denied operations. Empty disables elevation.
    pub elevate_with: String,
}

impl Default for SolinkConfig {
    fn default() -> Self {
        Self {
            python_version: None,
            trace: TraceConfig::default(),
            pattern: DEFAULT_PATTERN.to_string(),
            targets: vec![
                PathBuf::from("tensorrt_libs"),
                PathBuf::from("nvidia/cudnn/lib"),
            ],
            fallback: Some(PathBuf::from("tensorrt_libs")),
            check_version: false,
            full_paths: false,
            show_contents: false,
            elevate_with: "sudo".to_string(),
        }
    }
}

/// Tracer invocation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TraceConfig {
    /// Tracer program.
    pub tracer: String,

    /// System calls passed to the tracer's `-e` filter.
    pub syscalls: Vec<String>,

    /// Interpreter to trace.
    pub interpreter: String,

    /// Statement the interpreter runs.
    pub import: String,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            tracer: "strace".to_string(),
            syscalls: vec!["open".to_string(), "openat".to_string()],
            interpreter: "python".to_string(),
            import: "import tensorflow as tf".to_string(),
        }
    }
}
