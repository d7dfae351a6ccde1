//! Effective run settings.
//!
//! [`Settings`] layers command-line overrides over the loaded config and
//! anchors relative directories at the resolved `site-packages`. Commands
//! receive this record instead of reading globals.

use std::path::{Path, PathBuf};

use crate::config::{load_config, SolinkConfig};
use crate::environment::{RuntimeEnvironment, RuntimeRoot};
use crate::error::Result;
use crate::link::ReconcileOptions;
use crate::trace::{RequirementExtractor, TraceCommand, TraceSource};
use crate::ui::PathDisplay;

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Read the trace from this file instead of running the tracer.
    pub trace_file: Option<PathBuf>,
    /// Require matching major versions.
    pub check_version: bool,
    /// Disable the fallback directory.
    pub no_fallback: bool,
    /// Show complete paths in reports.
    pub full_paths: bool,
    /// List each target directory after linking.
    pub show_contents: bool,
}

/// Everything a run needs, resolved.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Runtime root, Python version, and `site-packages`.
    pub environment: RuntimeEnvironment,
    /// Config file the settings were loaded from, if any.
    pub config_source: Option<PathBuf>,
    /// Target directories, absolute.
    pub targets: Vec<PathBuf>,
    /// Fallback directory, absolute.
    pub fallback: Option<PathBuf>,
    /// Pattern that picks missing libraries out of the trace.
    pub extractor: RequirementExtractor,
    /// Where the trace comes from.
    pub trace: TraceSource,
    /// Require matching major versions.
    pub check_version: bool,
    /// Show complete paths in reports.
    pub full_paths: bool,
    /// List each target directory after linking.
    pub show_contents: bool,
    /// Program used to retry denied operations; empty disables escalation.
    pub elevate_with: String,
}

impl Settings {
    /// Load the config file, resolve the runtime from the process
    /// environment, and apply `overrides`.
    pub fn load(config_path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let (config, source) = load_config(config_path)?;
        let root = RuntimeRoot::resolve()?;
        let environment = RuntimeEnvironment::resolve(root, config.python_version.as_deref())?;

        let mut settings = Self::build(&config, overrides, environment)?;
        settings.config_source = source;
        Ok(settings)
    }

    /// Combine config, overrides, and the resolved environment.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPattern` if the configured pattern does not compile.
    pub fn build(
        config: &SolinkConfig,
        overrides: &Overrides,
        environment: RuntimeEnvironment,
    ) -> Result<Self> {
        let extractor = RequirementExtractor::new(&config.pattern)?;
        let site_packages = &environment.site_packages;

        let targets = config
            .targets
            .iter()
            .map(|dir| site_packages.join(dir))
            .collect();

        let fallback = if overrides.no_fallback {
            None
        } else {
            config.fallback.as_ref().map(|dir| site_packages.join(dir))
        };

        let trace = match &overrides.trace_file {
            Some(path) => TraceSource::File(path.clone()),
            None => TraceSource::Live(TraceCommand::from(&config.trace)),
        };

        Ok(Self {
            config_source: None,
            targets,
            fallback,
            extractor,
            trace,
            check_version: config.check_version || overrides.check_version,
            full_paths: config.full_paths || overrides.full_paths,
            show_contents: config.show_contents || overrides.show_contents,
            elevate_with: config.elevate_with.clone(),
            environment,
        })
    }

    /// How paths are printed for this run.
    pub fn path_display(&self) -> PathDisplay {
        if self.full_paths {
            PathDisplay::full()
        } else {
            PathDisplay::relative_to(&self.environment.site_packages)
        }
    }

    /// Options for the reconciler.
    pub fn reconcile_options(&self, dry_run: bool) -> ReconcileOptions {
        ReconcileOptions {
            check_version: self.check_version,
            fallback: self.fallback.clone(),
            dry_run,
        }
    }
}
