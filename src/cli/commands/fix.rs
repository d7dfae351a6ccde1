//! The `solink fix` command.
//!
//! Traces the import, extracts the missing libraries, and reconciles links
//! in every target directory.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::cli::args::FixArgs;
use crate::config::Settings;
use crate::error::{Result, SolinkError};
use crate::link::{DryRunOps, EscalatingOps, LinkOps, ReconcileReport, Reconciler};
use crate::trace::Extraction;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::display::{show_created, show_directory_contents, show_outcomes};
use super::scan::{capture_trace, report_nothing_to_do};

/// Exit code for `--fail-on-error` when a requirement was not satisfied.
pub const EXIT_UNSATISFIED: i32 = 3;

/// The fix command implementation.
pub struct FixCommand {
    config_path: Option<PathBuf>,
    args: FixArgs,
}

/// Machine-readable run report.
#[derive(Debug, Serialize)]
pub struct FixReport<'a> {
    /// Whether links were only planned.
    pub dry_run: bool,
    /// Missing libraries extracted from the trace.
    pub requirements: &'a [String],
    /// One report per target directory, in processing order.
    pub directories: &'a [ReconcileReport],
}

impl FixCommand {
    /// Create a new fix command.
    pub fn new(config_path: Option<&Path>, args: FixArgs) -> Self {
        Self {
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }

    /// Run against already resolved settings.
    pub fn run(&self, settings: &Settings, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.message(&format!(
            "Environment: {} (from {})",
            settings.environment.root.path.display(),
            settings.environment.root.detected_via
        ));

        let trace = capture_trace(&settings.trace, ui)?;
        let requirements = match settings.extractor.extract(&trace) {
            Extraction::Missing(names) => names,
            Extraction::NothingToDo => {
                report_nothing_to_do(&trace, ui);
                self.print_json(&[], &[])?;
                return Ok(CommandResult::success());
            }
        };
        ui.message(&format!(
            "Required libraries to link: {}",
            requirements.join(", ")
        ));

        let reports = self.reconcile_all(settings, &requirements, ui);
        self.print_json(&requirements, &reports)?;

        if self.args.fail_on_error && reports.iter().any(ReconcileReport::has_problems) {
            return Ok(CommandResult::failure(EXIT_UNSATISFIED));
        }
        Ok(CommandResult::success())
    }

    fn reconcile_all(
        &self,
        settings: &Settings,
        requirements: &[String],
        ui: &mut dyn UserInterface,
    ) -> Vec<ReconcileReport> {
        let ops: Box<dyn LinkOps> = if self.args.dry_run {
            Box::new(DryRunOps::default())
        } else {
            Box::new(EscalatingOps::with_program(&settings.elevate_with))
        };
        let paths = settings.path_display();
        let reconciler = Reconciler::new(
            ops.as_ref(),
            settings.reconcile_options(self.args.dry_run),
            paths.clone(),
        );

        let mut reports = Vec::with_capacity(settings.targets.len());
        for dir in &settings.targets {
            ui.show_header(&format!("Processing {}", paths.show(dir)));
            let report = reconciler.reconcile(requirements, dir, ui);

            if dir.is_dir() {
                show_outcomes(&report, ui);
                show_created(&report, &paths, ui);
                if settings.show_contents {
                    show_directory_contents(dir, ui);
                }
            }
            reports.push(report);
        }
        reports
    }

    fn print_json(&self, requirements: &[String], reports: &[ReconcileReport]) -> Result<()> {
        if !self.args.json {
            return Ok(());
        }
        let report = FixReport {
            dry_run: self.args.dry_run,
            requirements,
            directories: reports,
        };
        let json =
            serde_json::to_string_pretty(&report).map_err(|e| SolinkError::Other(e.into()))?;
        println!("{}", json);
        Ok(())
    }
}

impl Command for FixCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let settings = Settings::load(self.config_path.as_deref(), &self.args.overrides())?;
        self.run(&settings, ui)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::config::{Overrides, SolinkConfig};
    use crate::environment::{RuntimeEnvironment, RuntimeRoot};
    use crate::ui::MockUI;
    use std::fs;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    const TRACE: &str = "openat(AT_FDCWD, \"/x/libnvinfer.so.8\", O_RDONLY) = -1 ENOENT\n\
                         openat(AT_FDCWD, \"/x/libnvinfer_plugin.so.8\", O_RDONLY) = -1 ENOENT\n";

    struct Fixture {
        _temp: TempDir,
        site_packages: PathBuf,
        trace: PathBuf,
    }

    impl Fixture {
        fn new(trace: &str) -> Self {
            let temp = TempDir::new().unwrap();
            let site_packages = temp.path().join("lib/python3.11/site-packages");
            fs::create_dir_all(site_packages.join("tensorrt_libs")).unwrap();
            fs::create_dir_all(site_packages.join("nvidia/cudnn/lib")).unwrap();
            let trace_path = temp.path().join("trace.txt");
            fs::write(&trace_path, trace).unwrap();
            Self {
                site_packages,
                trace: trace_path,
                _temp: temp,
            }
        }

        fn trt(&self) -> PathBuf {
            self.site_packages.join("tensorrt_libs")
        }

        fn cudnn(&self) -> PathBuf {
            self.site_packages.join("nvidia/cudnn/lib")
        }

        fn settings(&self) -> Settings {
            let root = self
                .site_packages
                .ancestors()
                .nth(3)
                .unwrap()
                .to_path_buf();
            let environment = RuntimeEnvironment::resolve(
                RuntimeRoot {
                    path: root,
                    detected_via: "VIRTUAL_ENV".into(),
                },
                None,
            )
            .unwrap();
            let overrides = Overrides {
                trace_file: Some(self.trace.clone()),
                ..Overrides::default()
            };
            let config = SolinkConfig {
                elevate_with: String::new(),
                ..SolinkConfig::default()
            };
            Settings::build(&config, &overrides, environment).unwrap()
        }
    }

    fn fix(args: FixArgs) -> FixCommand {
        FixCommand::new(None, args)
    }

    #[test]
    fn links_versioned_files_and_falls_back() {
        let fx = Fixture::new(TRACE);
        fs::write(fx.trt().join("libnvinfer.so.8.6.1"), b"").unwrap();
        fs::write(fx.trt().join("libnvinfer_plugin.so.8.6.1"), b"").unwrap();

        let mut ui = MockUI::new();
        let result = fix(FixArgs::default()).run(&fx.settings(), &mut ui).unwrap();

        assert!(result.success);
        assert_eq!(
            fs::read_link(fx.trt().join("libnvinfer.so.8")).unwrap(),
            fx.trt().join("libnvinfer.so.8.6.1")
        );
        // cudnn has no matching file: the link points into the fallback pool.
        assert_eq!(
            fs::read_link(fx.cudnn().join("libnvinfer.so.8")).unwrap(),
            fx.trt().join("libnvinfer.so.8")
        );
        assert!(fx.cudnn().join("libnvinfer_plugin.so.8").exists());
        assert!(ui.has_message("Required libraries to link: libnvinfer.so.8, libnvinfer_plugin.so.8"));
        assert!(ui.has_message("Summary of created symlinks:"));
        assert_eq!(ui.headers().len(), 2);
    }

    #[test]
    fn second_run_creates_nothing() {
        let fx = Fixture::new(TRACE);
        fs::write(fx.trt().join("libnvinfer.so.8.6.1"), b"").unwrap();
        fs::write(fx.trt().join("libnvinfer_plugin.so.8.6.1"), b"").unwrap();
        let settings = fx.settings();

        fix(FixArgs::default()).run(&settings, &mut MockUI::new()).unwrap();

        let mut ui = MockUI::new();
        fix(FixArgs::default()).run(&settings, &mut ui).unwrap();
        assert!(ui.successes().is_empty());
        assert_eq!(
            ui.warnings()
                .iter()
                .filter(|w| w.contains("No symlinks were created."))
                .count(),
            2
        );
        assert!(ui.has_message("Symlink already exists and is correct"));
    }

    #[test]
    fn nothing_to_do_prints_tail_and_succeeds() {
        let fx = Fixture::new("openat(AT_FDCWD, \"/x/libcudart.so.12\", O_RDONLY) = 3\n");

        let mut ui = MockUI::new();
        let result = fix(FixArgs::default()).run(&fx.settings(), &mut ui).unwrap();

        assert_eq!(result.exit_code, 0);
        assert!(ui.has_warning("No missing libraries found in trace output."));
        assert!(ui.has_message("libcudart.so.12"));
        assert!(ui.headers().is_empty());
    }

    #[test]
    fn dry_run_leaves_filesystem_untouched() {
        let fx = Fixture::new(TRACE);
        fs::write(fx.trt().join("libnvinfer.so.8.6.1"), b"").unwrap();

        let mut ui = MockUI::new();
        let args = FixArgs {
            dry_run: true,
            ..FixArgs::default()
        };
        fix(args).run(&fx.settings(), &mut ui).unwrap();

        assert!(fs::symlink_metadata(fx.trt().join("libnvinfer.so.8")).is_err());
        assert!(ui.has_success("Would create symlink"));
    }

    #[test]
    fn dry_run_plan_matches_real_run() {
        let fx = Fixture::new(TRACE);
        fs::write(fx.trt().join("libnvinfer.so.8.6.1"), b"").unwrap();
        fs::write(fx.trt().join("libnvinfer_plugin.so.8.6.1"), b"").unwrap();
        let settings = fx.settings();
        let strict = |dry_run| FixArgs {
            dry_run,
            fail_on_error: true,
            ..FixArgs::default()
        };

        let mut planned = MockUI::new();
        let plan = fix(strict(true)).run(&settings, &mut planned).unwrap();
        assert!(fs::read_dir(fx.cudnn()).unwrap().next().is_none());

        let mut applied = MockUI::new();
        let real = fix(strict(false)).run(&settings, &mut applied).unwrap();

        assert_eq!(plan.exit_code, 0);
        assert_eq!(real.exit_code, 0);
        assert!(planned.errors().is_empty());
        let planned_links: Vec<String> = planned
            .successes()
            .iter()
            .map(|m| m.replace("Would create symlink", "Created symlink"))
            .collect();
        assert_eq!(planned_links, applied.successes());
        assert_eq!(planned_links.len(), 4);
    }

    #[test]
    fn fail_on_error_reports_unsatisfied() {
        let fx = Fixture::new(TRACE);
        fs::remove_dir_all(fx.cudnn()).unwrap();
        fs::write(fx.trt().join("libnvinfer.so.8.6.1"), b"").unwrap();
        fs::write(fx.trt().join("libnvinfer_plugin.so.8.6.1"), b"").unwrap();

        let mut ui = MockUI::new();
        let args = FixArgs {
            fail_on_error: true,
            ..FixArgs::default()
        };
        let result = fix(args).run(&fx.settings(), &mut ui).unwrap();

        assert_eq!(result.exit_code, EXIT_UNSATISFIED);
        assert!(ui.has_error("Target directory does not exist"));
        // The tensorrt directory was still repaired.
        assert!(fx.trt().join("libnvinfer.so.8").exists());
    }

    #[test]
    fn problems_without_flag_still_exit_zero() {
        let fx = Fixture::new(TRACE);
        fs::remove_dir_all(fx.cudnn()).unwrap();

        let result = fix(FixArgs::default())
            .run(&fx.settings(), &mut MockUI::new())
            .unwrap();
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn show_contents_lists_directories() {
        let fx = Fixture::new(TRACE);
        fs::write(fx.trt().join("libnvinfer.so.8.6.1"), b"").unwrap();
        fs::write(fx.trt().join("libnvinfer_plugin.so.8.6.1"), b"").unwrap();
        symlink("/nowhere/libnvinfer_plugin.so.8", fx.trt().join("libnvinfer_plugin.so.8"))
            .unwrap();

        let mut settings = fx.settings();
        settings.show_contents = true;
        let mut ui = MockUI::new();
        fix(FixArgs::default()).run(&settings, &mut ui).unwrap();

        assert!(ui.has_message("Contents of"));
        assert!(ui.has_message("libnvinfer.so.8 -> "));
        assert!(ui.has_warning("Broken symlink found"));
    }
}
