//! Shared display helpers for reconcile results.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::link::ReconcileReport;
use crate::ui::{PathDisplay, StatusKind, UserInterface};

/// Print one status line per requirement (verbose mode only).
pub fn show_outcomes(report: &ReconcileReport, ui: &mut dyn UserInterface) {
    if !ui.output_mode().shows_details() {
        return;
    }
    for entry in &report.entries {
        ui.status(
            StatusKind::from(&entry.outcome),
            &format!("{} ({})", entry.requirement, entry.outcome.label()),
        );
    }
}

/// Print the links created in one directory.
pub fn show_created(report: &ReconcileReport, paths: &PathDisplay, ui: &mut dyn UserInterface) {
    let created = report.created();
    if created.is_empty() {
        ui.warning("No symlinks were created.");
        return;
    }

    ui.message("Summary of created symlinks:");
    for action in created {
        ui.status(
            StatusKind::Success,
            &format!(
                "{} -> {}",
                paths.show(&action.link),
                paths.show(&action.target)
            ),
        );
    }
}

/// Entries of `dir`, sorted, with symlink targets as `name -> target`.
pub fn list_directory(dir: &Path) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let line = match fs::read_link(entry.path()) {
            Ok(target) => format!("{} -> {}", name, target.display()),
            Err(_) if entry.path().is_dir() => format!("{}/", name),
            Err(_) => name,
        };
        lines.push(line);
    }
    lines.sort();
    Ok(lines)
}

/// Print the contents of a target directory.
pub fn show_directory_contents(dir: &Path, ui: &mut dyn UserInterface) {
    ui.message(&format!("Contents of {}:", dir.display()));
    match list_directory(dir) {
        Ok(lines) if lines.is_empty() => ui.message("  (empty)"),
        Ok(lines) => {
            for line in lines {
                ui.message(&format!("  {}", line));
            }
        }
        Err(e) => ui.error(&format!("Could not list {}: {}", dir.display(), e)),
    }
}
