//! Per-requirement results of a reconcile pass.

use serde::Serialize;
use std::path::PathBuf;

/// Where the file backing a requirement was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// A matching file lives in the directory being repaired.
    FoundInTarget,
    /// Nothing matched locally; the default library pool is used instead.
    FoundInFallback,
    /// No candidate directory can satisfy the requirement.
    NotFound,
}

/// A symlink that exists (or was created) for a requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkAction {
    /// Path of the symlink.
    pub link: PathBuf,
    /// Path the symlink points to.
    pub target: PathBuf,
}

impl LinkAction {
    /// Create a new link action.
    pub fn new(link: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            link: link.into(),
            target: target.into(),
        }
    }
}

/// Why a requirement was skipped without touching the filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The name does not look like `lib<name>.so.<major>`.
    MalformedName,
    /// No candidate directory holds a matching file.
    NoMatch,
    /// A target was chosen but does not exist on disk.
    TargetMissing { target: PathBuf },
    /// The directory to repair does not exist.
    DirectoryMissing { directory: PathBuf },
}

/// Terminal state of one requirement in one directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LinkOutcome {
    /// The existing link (or real file) already satisfies the requirement.
    AlreadyCorrect(LinkAction),
    /// An existing link into the fallback pool was left alone.
    AcceptedFallback(LinkAction),
    /// A new link was created.
    Created(LinkAction),
    /// A stale or dangling link was replaced.
    Recreated(LinkAction),
    /// Nothing was done.
    Skipped(SkipReason),
    /// A filesystem operation failed, even after escalation.
    Failed { link: PathBuf, message: String },
}

impl LinkOutcome {
    /// The link this outcome created, if any.
    pub fn created_link(&self) -> Option<&LinkAction> {
        match self {
            Self::Created(action) | Self::Recreated(action) => Some(action),
            _ => None,
        }
    }

    /// Whether the requirement is satisfied after this outcome.
    pub fn is_satisfied(&self) -> bool {
        matches!(
            self,
            Self::AlreadyCorrect(_)
                | Self::AcceptedFallback(_)
                | Self::Created(_)
                | Self::Recreated(_)
        )
    }

    /// Short label used in summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AlreadyCorrect(_) => "already correct",
            Self::AcceptedFallback(_) => "fallback kept",
            Self::Created(_) => "created",
            Self::Recreated(_) => "recreated",
            Self::Skipped(_) => "skipped",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Outcome of one requirement, with the stage reached before it ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequirementReport {
    /// The requirement as extracted from the trace.
    pub requirement: String,
    /// Where a backing file was found, if parsing succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,
    /// Final state.
    pub outcome: LinkOutcome,
}

/// Results for every requirement in a single target directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Directory that was repaired.
    pub directory: PathBuf,
    /// One entry per requirement, in processing order.
    pub entries: Vec<RequirementReport>,
}

impl ReconcileReport {
    /// Create an empty report for a directory.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            entries: Vec::new(),
        }
    }

    /// Links created or recreated during this pass.
    pub fn created(&self) -> Vec<&LinkAction> {
        self.entries
            .iter()
            .filter_map(|e| e.outcome.created_link())
            .collect()
    }

    /// Whether any requirement was skipped or failed.
    pub fn has_problems(&self) -> bool {
        self.entries.iter().any(|e| !e.outcome.is_satisfied())
    }

    /// Number of entries with the given label.
    pub fn count(&self, label: &str) -> usize {
        self.entries
            .iter()
            .filter(|e| e.outcome.label() == label)
            .count()
    }
}
