//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. This allows:
//! - Single binary with subcommands (`solink fix`, `solink scan`)
//! - Shared settings resolution
//! - Consistent global flag handling

pub mod completions;
pub mod dispatcher;
pub mod display;
pub mod env;
pub mod fix;
pub mod scan;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
