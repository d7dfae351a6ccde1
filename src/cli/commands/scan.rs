//! The `solink scan` command.
//!
//! Captures the trace and prints the libraries that failed to load,
//! without touching the filesystem.

use std::path::{Path, PathBuf};

use crate::cli::args::ScanArgs;
use crate::config::{Overrides, Settings};
use crate::error::{Result, SolinkError};
use crate::trace::{tail, Extraction, TraceSource, TRACE_TAIL_CHARS};
use crate::ui::{StatusKind, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// The scan command implementation.
pub struct ScanCommand {
    config_path: Option<PathBuf>,
    args: ScanArgs,
}

impl ScanCommand {
    /// Create a new scan command.
    pub fn new(config_path: Option<&Path>, args: ScanArgs) -> Self {
        Self {
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }

    /// Run against already resolved settings.
    pub fn run(&self, settings: &Settings, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let trace = capture_trace(&settings.trace, ui)?;
        let extraction = settings.extractor.extract(&trace);

        if self.args.json {
            let json = serde_json::to_string_pretty(extraction.requirements())
                .map_err(|e| SolinkError::Other(e.into()))?;
            println!("{}", json);
            return Ok(CommandResult::success());
        }

        match extraction {
            Extraction::NothingToDo => report_nothing_to_do(&trace, ui),
            Extraction::Missing(names) => {
                ui.message(&format!("Missing libraries ({}):", names.len()));
                for name in names {
                    ui.status(StatusKind::Warning, &name);
                }
            }
        }

        Ok(CommandResult::success())
    }
}

impl Command for ScanCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let overrides = Overrides {
            trace_file: self.args.trace_file.clone(),
            ..Overrides::default()
        };
        let settings = Settings::load(self.config_path.as_deref(), &overrides)?;
        self.run(&settings, ui)
    }
}

/// Obtain the trace text behind a spinner.
pub fn capture_trace(source: &TraceSource, ui: &mut dyn UserInterface) -> Result<String> {
    let mut spinner = ui.start_spinner(&source.describe());
    match source.capture() {
        Ok(trace) => {
            spinner.finish_success(&format!("Captured {} bytes of trace output", trace.len()));
            Ok(trace)
        }
        Err(e) => {
            spinner.finish_error("Could not capture trace");
            Err(e)
        }
    }
}

/// Tell the user nothing matched and show the end of the trace.
pub fn report_nothing_to_do(trace: &str, ui: &mut dyn UserInterface) {
    ui.warning("No missing libraries found in trace output.");
    ui.message(&format!("Last {} characters of trace:", TRACE_TAIL_CHARS));
    ui.message(tail(trace, TRACE_TAIL_CHARS));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolinkConfig;
    use crate::environment::{RuntimeEnvironment, RuntimeRoot};
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn settings(trace_file: &Path) -> Settings {
        let environment = RuntimeEnvironment::resolve(
            RuntimeRoot {
                path: PathBuf::from("/env"),
                detected_via: "VIRTUAL_ENV".into(),
            },
            Some("3.11"),
        )
        .unwrap();
        let overrides = Overrides {
            trace_file: Some(trace_file.to_path_buf()),
            ..Overrides::default()
        };
        Settings::build(&SolinkConfig::default(), &overrides, environment).unwrap()
    }

    #[test]
    fn lists_missing_libraries() {
        let temp = TempDir::new().unwrap();
        let trace = temp.path().join("trace.txt");
        fs::write(
            &trace,
            "openat(AT_FDCWD, \"/x/libnvinfer_plugin.so.8\", O_RDONLY) = -1 ENOENT\n\
             openat(AT_FDCWD, \"/x/libnvinfer.so.8\", O_RDONLY) = -1 ENOENT\n",
        )
        .unwrap();

        let mut ui = MockUI::new();
        let cmd = ScanCommand::new(None, ScanArgs::default());
        let result = cmd.run(&settings(&trace), &mut ui).unwrap();

        assert!(result.success);
        assert!(ui.has_message("Missing libraries (2):"));
        assert_eq!(
            ui.statuses(),
            [
                (StatusKind::Warning, "libnvinfer.so.8".to_string()),
                (StatusKind::Warning, "libnvinfer_plugin.so.8".to_string()),
            ]
        );
        assert_eq!(ui.spinners().len(), 1);
    }

    #[test]
    fn empty_trace_shows_tail() {
        let temp = TempDir::new().unwrap();
        let trace = temp.path().join("trace.txt");
        fs::write(&trace, "import ok\n").unwrap();

        let mut ui = MockUI::new();
        let cmd = ScanCommand::new(None, ScanArgs::default());
        let result = cmd.run(&settings(&trace), &mut ui).unwrap();

        assert_eq!(result.exit_code, 0);
        assert!(ui.has_warning("No missing libraries found"));
        assert!(ui.has_message("import ok"));
    }

    #[test]
    fn unreadable_trace_file_is_error() {
        let mut ui = MockUI::new();
        let cmd = ScanCommand::new(None, ScanArgs::default());
        let err = cmd
            .run(&settings(Path::new("/nonexistent/trace.txt")), &mut ui)
            .unwrap_err();
        assert!(matches!(err, SolinkError::Io(_)));
    }
}
