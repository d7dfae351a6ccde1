//! External process execution.
//!
//! Programs are spawned directly (no intermediate shell) so that paths and
//! import statements reach them verbatim.

use crate::error::Result;
use std::ffi::OsStr;
use std::process::{Command, Stdio};
use std::time::Instant;

/// Result of executing an external program.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard error.
    pub stderr: String,

    /// Whether the program succeeded (exit code 0).
    pub success: bool,
}

/// Format a program and its arguments for display.
pub fn display_command<S: AsRef<OsStr>>(program: &str, args: &[S]) -> String {
    let mut parts = vec![program.to_string()];
    for arg in args {
        let arg = arg.as_ref().to_string_lossy();
        if arg.contains(' ') {
            parts.push(format!("\"{}\"", arg));
        } else {
            parts.push(arg.into_owned());
        }
    }
    parts.join(" ")
}

/// Run a program to completion, capturing stderr and discarding stdout.
///
/// A non-zero exit is reported through [`CommandResult::success`]; only a
/// failure to spawn is an error.
pub fn run_captured<S: AsRef<OsStr>>(program: &str, args: &[S]) -> Result<CommandResult> {
    let start = Instant::now();

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped());

    tracing::debug!("Running: {}", display_command(program, args));
    let output = cmd.output()?;

    let result = CommandResult {
        exit_code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        success: output.status.success(),
    };

    tracing::debug!(
        "{} exited with {:?} after {:?}",
        program,
        result.exit_code,
        start.elapsed()
    );

    Ok(result)
}
