//! Configuration loading for solink.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Effective run settings in [`settings`]
//!
//! # Example
//!
//! ```
//! use solink::config::{parse_config, SolinkConfig};
//! use std::path::Path;
//!
//! let config = parse_config("check_version: true", Path::new("config.yml")).unwrap();
//! assert!(config.check_version);
//! assert_eq!(config.targets, SolinkConfig::default().targets);
//! ```
//!
//! # Configuration File Locations
//!
//! 1. `--config <path>` or `$SOLINK_CONFIG` (must exist)
//! 2. `$XDG_CONFIG_HOME/solink/config.yml`
//! 3. `~/.config/solink/config.yml`

pub mod loader;
pub mod schema;
pub mod settings;

pub use loader::{load_config, load_config_file, parse_config, user_config_path};
pub use schema::{SolinkConfig, TraceConfig};
pub use settings::{Overrides, Settings};
