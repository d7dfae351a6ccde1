//! Symlink reconciliation.
//!
//! For every requirement the reconciler picks a backing file (in the
//! directory being repaired, or in the fallback pool), checks what already
//! sits at the link location, and creates or replaces the link as needed.
//! Each requirement is handled independently: a failure is recorded in the
//! report and the next requirement is processed.

use std::fs;
use std::path::{Path, PathBuf};

use super::finder::{find_matching_file, is_dangling, MatchResult};
use super::ops::LinkOps;
use super::outcome::{
    LinkAction, LinkOutcome, ReconcileReport, RequirementReport, Resolution, SkipReason,
};
use super::requirement::LibraryRequirement;
use crate::error::{Result, SolinkError};
use crate::ui::{PathDisplay, UserInterface};

/// Matching behavior for a reconcile pass.
#[derive(Debug, Clone, Default)]
pub struct ReconcileOptions {
    /// Require the major version to match (otherwise any version is accepted
    /// with a warning).
    pub check_version: bool,
    /// Default library pool used when the target directory has no match.
    pub fallback: Option<PathBuf>,
    /// Word messages as a plan rather than as completed actions.
    pub dry_run: bool,
}

/// Creates and repairs links in target directories.
pub struct Reconciler<'a> {
    ops: &'a dyn LinkOps,
    options: ReconcileOptions,
    paths: PathDisplay,
}

/// What was at the link location before creating the link.
enum Existing {
    Nothing,
    Replaced,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler using `ops` for every filesystem mutation.
    pub fn new(ops: &'a dyn LinkOps, options: ReconcileOptions, paths: PathDisplay) -> Self {
        Self {
            ops,
            options,
            paths,
        }
    }

    /// Reconcile every requirement in `target_dir`.
    pub fn reconcile(
        &self,
        requirements: &[String],
        target_dir: &Path,
        ui: &mut dyn UserInterface,
    ) -> ReconcileReport {
        let mut report = ReconcileReport::new(target_dir);

        if !target_dir.is_dir() {
            ui.error(&format!(
                "Target directory does not exist: {}",
                self.paths.show(target_dir)
            ));
            report.entries = requirements
                .iter()
                .map(|name| RequirementReport {
                    requirement: name.clone(),
                    resolution: None,
                    outcome: LinkOutcome::Skipped(SkipReason::DirectoryMissing {
                        directory: target_dir.to_path_buf(),
                    }),
                })
                .collect();
            return report;
        }

        for name in requirements {
            let entry = self.reconcile_one(name, target_dir, ui);
            tracing::debug!(
                "{} in {}: {:?} -> {}",
                name,
                target_dir.display(),
                entry.resolution,
                entry.outcome.label()
            );
            report.entries.push(entry);
        }

        report
    }

    fn reconcile_one(
        &self,
        name: &str,
        target_dir: &Path,
        ui: &mut dyn UserInterface,
    ) -> RequirementReport {
        let entry = |resolution: Option<Resolution>, outcome: LinkOutcome| RequirementReport {
            requirement: name.to_string(),
            resolution,
            outcome,
        };

        let requirement = match LibraryRequirement::parse(name) {
            Ok(r) => r,
            Err(e) => {
                ui.error(&e.to_string());
                return entry(None, LinkOutcome::Skipped(SkipReason::MalformedName));
            }
        };

        let link = target_dir.join(requirement.name());

        let (resolution, target) = match self.locate(&requirement, target_dir, ui) {
            Ok(Some(found)) => found,
            Ok(None) => {
                return entry(
                    Some(Resolution::NotFound),
                    LinkOutcome::Skipped(SkipReason::NoMatch),
                )
            }
            Err(e) => {
                ui.error(&format!(
                    "Failed to search {}: {}",
                    self.paths.show(target_dir),
                    e
                ));
                return entry(None, self.failed(&link, e));
            }
        };
        let resolution = Some(resolution);

        if !target.exists() && !self.ops.is_planned(&target) {
            ui.error(&format!(
                "File to symlink to not found: {}, skipping.",
                self.paths.show(&target)
            ));
            return entry(
                resolution,
                LinkOutcome::Skipped(SkipReason::TargetMissing { target }),
            );
        }

        if target == link {
            ui.message(&format!(
                "Library already present: {}",
                self.paths.show(&link)
            ));
            return entry(
                resolution,
                LinkOutcome::AlreadyCorrect(LinkAction::new(link, target)),
            );
        }

        let existing = match self.inspect_existing(&link, &target, ui) {
            Ok(Inspection::Done(outcome)) => return entry(resolution, outcome),
            Ok(Inspection::Proceed(existing)) => existing,
            Err(e) => return entry(resolution, self.failed(&link, e)),
        };

        match self.create(&target, &link) {
            Ok(()) => {
                let verb = if self.options.dry_run {
                    "Would create symlink"
                } else {
                    "Created symlink"
                };
                ui.success(&format!(
                    "{}: {} -> {}",
                    verb,
                    self.paths.show(&link),
                    self.paths.show(&target)
                ));
                let action = LinkAction::new(link, target);
                let outcome = match existing {
                    Existing::Nothing => LinkOutcome::Created(action),
                    Existing::Replaced => LinkOutcome::Recreated(action),
                };
                entry(resolution, outcome)
            }
            Err(e) => {
                ui.error(&format!(
                    "Failed to create symlink for {}: {}",
                    requirement, e
                ));
                entry(resolution, self.failed(&link, e))
            }
        }
    }

    /// Choose the file the link should point to.
    fn locate(
        &self,
        requirement: &LibraryRequirement,
        target_dir: &Path,
        ui: &mut dyn UserInterface,
    ) -> Result<Option<(Resolution, PathBuf)>> {
        match find_matching_file(target_dir, requirement, self.options.check_version)? {
            MatchResult::Exact(file) => Ok(Some((Resolution::FoundInTarget, target_dir.join(file)))),
            MatchResult::VersionMismatch(file) => {
                ui.warning(&format!(
                    "Version mismatch for {}: Found {}, but continuing since version checking is disabled.",
                    requirement, file
                ));
                Ok(Some((Resolution::FoundInTarget, target_dir.join(file))))
            }
            MatchResult::NoMatch => match &self.options.fallback {
                Some(fallback) => {
                    ui.warning(&format!(
                        "Could not find a matching file for {} in {}, defaulting to {} path.",
                        requirement,
                        self.paths.show(target_dir),
                        self.paths.show(fallback)
                    ));
                    Ok(Some((
                        Resolution::FoundInFallback,
                        fallback.join(requirement.name()),
                    )))
                }
                None => {
                    ui.warning(&format!(
                        "Could not find a matching file for {} in {}, skipping.",
                        requirement,
                        self.paths.show(target_dir)
                    ));
                    Ok(None)
                }
            },
        }
    }

    /// Decide what to do with whatever already sits at `link`.
    fn inspect_existing(
        &self,
        link: &Path,
        target: &Path,
        ui: &mut dyn UserInterface,
    ) -> Result<Inspection> {
        let meta = match fs::symlink_metadata(link) {
            Ok(meta) => meta,
            Err(_) => return Ok(Inspection::Proceed(Existing::Nothing)),
        };

        if !meta.file_type().is_symlink() {
            if meta.is_file() {
                ui.message(&format!(
                    "Regular file already present, leaving it in place: {}",
                    self.paths.show(link)
                ));
                return Ok(Inspection::Done(LinkOutcome::AlreadyCorrect(
                    LinkAction::new(link, link),
                )));
            }
            ui.error(&format!(
                "Path exists and is not a file or symlink: {}",
                self.paths.show(link)
            ));
            return Ok(Inspection::Done(LinkOutcome::Failed {
                link: link.to_path_buf(),
                message: "path exists and is not a file or symlink".to_string(),
            }));
        }

        if is_dangling(link) {
            ui.warning(&format!(
                "Broken symlink found: {}, removing it",
                self.paths.show(link)
            ));
            if let Err(e) = self.ops.remove(link) {
                ui.error(&format!(
                    "Failed to remove broken symlink: {}: {}",
                    self.paths.show(link),
                    e
                ));
                return Ok(Inspection::Done(self.failed(link, e)));
            }
            return Ok(Inspection::Proceed(Existing::Replaced));
        }

        let current = fs::read_link(link)?;
        let resolved_current = link_destination(link, &current);

        if current == target || same_file(link, target) {
            ui.message(&format!(
                "Symlink already exists and is correct: {} -> {}",
                self.paths.show(link),
                self.paths.show(target)
            ));
            return Ok(Inspection::Done(LinkOutcome::AlreadyCorrect(
                LinkAction::new(link, target),
            )));
        }

        if let Some(fallback) = &self.options.fallback {
            if in_directory(&resolved_current, fallback) {
                ui.warning(&format!(
                    "Symlink exists defaulting to {} path, {} -> {}",
                    self.paths.show(fallback),
                    self.paths.show(link),
                    self.paths.show(&resolved_current)
                ));
                return Ok(Inspection::Done(LinkOutcome::AcceptedFallback(
                    LinkAction::new(link, resolved_current),
                )));
            }
        }

        ui.warning(&format!(
            "Symlink exists but is incorrect: {} -> {}",
            self.paths.show(link),
            self.paths.show(&resolved_current)
        ));
        if let Err(e) = self.ops.remove(link) {
            ui.error(&format!(
                "Failed to remove stale symlink: {}: {}",
                self.paths.show(link),
                e
            ));
            return Ok(Inspection::Done(self.failed(link, e)));
        }
        Ok(Inspection::Proceed(Existing::Replaced))
    }

    /// Create the link, clearing a path that appeared in the meantime.
    fn create(&self, target: &Path, link: &Path) -> Result<()> {
        match self.ops.symlink(target, link) {
            Err(SolinkError::Io(e)) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                tracing::debug!("{} appeared before linking, replacing it", link.display());
                self.ops.remove(link)?;
                self.ops.symlink(target, link)
            }
            other => other,
        }
    }

    fn failed(&self, link: &Path, error: SolinkError) -> LinkOutcome {
        LinkOutcome::Failed {
            link: link.to_path_buf(),
            message: error.to_string(),
        }
    }
}

enum Inspection {
    /// The requirement is settled without creating a link.
    Done(LinkOutcome),
    /// Go on and create the link.
    Proceed(Existing),
}

/// Where `link` points, with the directory part of its text resolved.
fn link_destination(link: &Path, current: &Path) -> PathBuf {
    let joined = match link.parent() {
        Some(parent) => parent.join(current),
        None => current.to_path_buf(),
    };
    let resolved_dir = joined.parent().and_then(|dir| fs::canonicalize(dir).ok());
    if let (Some(dir), Some(name)) = (resolved_dir, joined.file_name()) {
        return dir.join(name);
    }
    joined
}

fn in_directory(path: &Path, dir: &Path) -> bool {
    let dir = fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
    path.starts_with(dir)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
