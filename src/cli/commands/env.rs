//! The `solink env` command.
//!
//! Shows where solink would look and link, without tracing anything.

use std::path::{Path, PathBuf};

use crate::cli::args::EnvArgs;
use crate::config::{Overrides, Settings};
use crate::error::Result;
use crate::ui::{PathDisplay, StatusKind, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// The env command implementation.
pub struct EnvCommand {
    config_path: Option<PathBuf>,
    args: EnvArgs,
}

impl EnvCommand {
    /// Create a new env command.
    pub fn new(config_path: Option<&Path>, args: EnvArgs) -> Self {
        Self {
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }

    /// Run against already resolved settings.
    pub fn run(&self, settings: &Settings, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let env = &settings.environment;
        let paths = settings.path_display();

        ui.message(&format!(
            "Runtime root:   {} (from {})",
            env.root.path.display(),
            env.root.detected_via
        ));
        ui.message(&format!("Python version: {}", env.python_version));
        ui.message(&format!("Site-packages:  {}", env.site_packages.display()));
        match &settings.config_source {
            Some(path) => ui.message(&format!("Config file:    {}", path.display())),
            None => ui.message("Config file:    (defaults)"),
        }
        ui.message(&format!("Pattern:        {}", settings.extractor.pattern()));
        ui.message(&format!("Trace:          {}", settings.trace.describe()));

        ui.show_header("Target directories");
        for dir in &settings.targets {
            show_directory(dir, &paths, ui);
        }

        ui.show_header("Fallback directory");
        match &settings.fallback {
            Some(dir) => show_directory(dir, &paths, ui),
            None => ui.message("  (disabled)"),
        }

        Ok(CommandResult::success())
    }
}

impl Command for EnvCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let overrides = Overrides {
            full_paths: self.args.full_paths,
            ..Overrides::default()
        };
        let settings = Settings::load(self.config_path.as_deref(), &overrides)?;
        self.run(&settings, ui)
    }
}

fn show_directory(dir: &Path, paths: &PathDisplay, ui: &mut dyn UserInterface) {
    if dir.is_dir() {
        ui.status(StatusKind::Success, &paths.show(dir));
    } else {
        ui.status(StatusKind::Failed, &format!("{} (missing)", paths.show(dir)));
    }
}
