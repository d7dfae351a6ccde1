//! Running the framework import under a system call tracer.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::TraceConfig;
use crate::error::{Result, SolinkError};
use crate::shell::{display_command, run_captured};

/// A tracer invocation wrapping an interpreter import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceCommand {
    /// Tracer program (e.g., `strace`).
    pub tracer: String,
    /// System calls to trace.
    pub syscalls: Vec<String>,
    /// Interpreter to run under the tracer.
    pub interpreter: String,
    /// Statement passed to the interpreter with `-c`.
    pub import: String,
}

impl TraceCommand {
    /// Arguments passed to the tracer.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        if !self.syscalls.is_empty() {
            args.push("-e".into());
            args.push(self.syscalls.join(",").into());
        }
        args.push(self.interpreter.clone().into());
        args.push("-c".into());
        args.push(self.import.clone().into());
        args
    }

    /// Human-readable command line.
    pub fn display(&self) -> String {
        display_command(&self.tracer, &self.args())
    }

    /// Run the tracer and return its diagnostic stream.
    ///
    /// The import itself is expected to fail when libraries are missing, so
    /// a non-zero exit is not an error; only failing to start the tracer is.
    pub fn run(&self) -> Result<String> {
        let result = run_captured(&self.tracer, &self.args()).map_err(|e| {
            SolinkError::TracerFailed {
                command: self.display(),
                message: e.to_string(),
            }
        })?;

        if !result.success {
            tracing::debug!(
                "Traced import exited with {:?}; using its trace anyway",
                result.exit_code
            );
        }

        Ok(result.stderr)
    }
}

impl From<&TraceConfig> for TraceCommand {
    fn from(config: &TraceConfig) -> Self {
        Self {
            tracer: config.tracer.clone(),
            syscalls: config.syscalls.clone(),
            interpreter: config.interpreter.clone(),
            import: config.import.clone(),
        }
    }
}

/// Where trace text comes from.
#[derive(Debug, Clone)]
pub enum TraceSource {
    /// Run the tracer now.
    Live(TraceCommand),
    /// Read a previously captured trace.
    File(PathBuf),
}

impl TraceSource {
    /// Obtain the trace text.
    pub fn capture(&self) -> Result<String> {
        match self {
            Self::Live(command) => command.run(),
            Self::File(path) => read_trace(path),
        }
    }

    /// Short description for progress output.
    pub fn describe(&self) -> String {
        match self {
            Self::Live(command) => format!("Tracing: {}", command.display()),
            Self::File(path) => format!("Reading trace from {}", path.display()),
        }
    }
}

/// Read a saved trace, tolerating invalid UTF-8.
pub fn read_trace(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
