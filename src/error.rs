//! Error types for solink operations.
//!
//! This module defines [`SolinkError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `SolinkError` for failures that end the run or need distinct handling
//! - Per-library problems are not errors: they become a
//!   [`LinkOutcome`](crate::link::LinkOutcome) and the batch continues
//! - Use `anyhow::Error` (via `SolinkError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for solink operations.
#[derive(Debug, Error)]
pub enum SolinkError {
    /// Neither `VIRTUAL_ENV` nor `CONDA_PREFIX` is set.
    #[error("No active environment: set one of {vars}")]
    RuntimeRootMissing { vars: String },

    /// No `lib/pythonX.Y/site-packages` directory under the runtime root.
    #[error("Could not determine the Python version under {root}")]
    PythonVersionNotFound { root: PathBuf },

    /// Configuration file not found at the requested location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// The requirement pattern is not a valid regular expression.
    #[error("Invalid library pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// The system call tracer could not be started.
    #[error("Failed to run tracer '{command}': {message}")]
    TracerFailed { command: String, message: String },

    /// An escalated filesystem command failed.
    #[error("Elevated command failed with exit code {code:?}: {command}: {stderr}")]
    ElevationFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SolinkError {
    /// Whether this error is a permission denial from a direct filesystem call.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::PermissionDenied)
    }
}

/// Result type alias for solink operations.
pub type Result<T> = std::result::Result<T, SolinkError>;
