//! External process execution and platform checks.

pub mod command;
pub mod platform;

pub use command::{display_command, run_captured, CommandResult};
pub use platform::{is_ci, is_ci_with_env, is_elevated};
