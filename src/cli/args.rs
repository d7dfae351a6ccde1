//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::Overrides;

/// solink - Repair missing CUDA/TensorRT library links in a Python environment.
#[derive(Debug, Parser)]
#[command(name = "solink")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "SOLINK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Whether the selected command prints machine-readable output.
    pub fn wants_json(&self) -> bool {
        match &self.command {
            Some(Commands::Fix(args)) => args.json,
            Some(Commands::Scan(args)) => args.json,
            _ => false,
        }
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Trace the import and create missing links (default if no command specified)
    Fix(FixArgs),

    /// Trace the import and list missing libraries without linking
    Scan(ScanArgs),

    /// Show the resolved environment and target directories
    Env(EnvArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `fix` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct FixArgs {
    /// Read a saved trace instead of running the tracer
    #[arg(long, value_name = "PATH")]
    pub trace_file: Option<PathBuf>,

    /// Report what would change without touching the filesystem
    #[arg(long)]
    pub dry_run: bool,

    /// Only accept files whose major version matches
    #[arg(long)]
    pub check_version: bool,

    /// Do not fall back to the default library directory
    #[arg(long)]
    pub no_fallback: bool,

    /// Show complete paths instead of site-packages relative ones
    #[arg(long)]
    pub full_paths: bool,

    /// List each target directory after linking
    #[arg(long)]
    pub show_contents: bool,

    /// Exit with status 3 if any library was skipped or failed
    #[arg(long)]
    pub fail_on_error: bool,

    /// Print a JSON report instead of human-readable output
    #[arg(long)]
    pub json: bool,
}

impl FixArgs {
    /// Settings overrides carried by these flags.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            trace_file: self.trace_file.clone(),
            check_version: self.check_version,
            no_fallback: self.no_fallback,
            full_paths: self.full_paths,
            show_contents: self.show_contents,
        }
    }
}

/// Arguments for the `scan` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ScanArgs {
    /// Read a saved trace instead of running the tracer
    #[arg(long, value_name = "PATH")]
    pub trace_file: Option<PathBuf>,

    /// Print the library list as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `env` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct EnvArgs {
    /// Show complete paths instead of site-packages relative ones
    #[arg(long)]
    pub full_paths: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
