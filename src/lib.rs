//! solink - Repair missing CUDA/TensorRT shared-library links.
//!
//! solink traces a framework import inside the active Python environment,
//! works out which `lib*.so.N` files the dynamic loader failed to find, and
//! creates symlinks in the package library directories so the next import
//! succeeds.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading and effective settings
//! - [`environment`] - Runtime root and `site-packages` resolution
//! - [`error`] - Error types and result aliases
//! - [`link`] - Requirement parsing and symlink reconciliation
//! - [`shell`] - External command execution
//! - [`trace`] - Tracing the import and extracting missing libraries
//! - [`ui`] - Terminal output, spinners, and test doubles
//!
//! # Example
//!
//! ```
//! use solink::link::LibraryRequirement;
//! use solink::trace::RequirementExtractor;
//!
//! let trace = r#"openat(AT_FDCWD, "/env/libnvinfer_plugin.so.8", O_RDONLY) = -1 ENOENT"#;
//! let extraction = RequirementExtractor::default().extract(trace);
//! let requirement = LibraryRequirement::parse(&extraction.requirements()[0]).unwrap();
//! assert_eq!(requirement.base_name(), "libnvinfer_plugin.so.");
//! assert_eq!(requirement.major_version(), "8");
//! ```

pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod link;
pub mod shell;
pub mod trace;
pub mod ui;

pub use error::{Result, SolinkError};
