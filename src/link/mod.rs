//! Library requirements and symlink reconciliation.
//!
//! - [`requirement`] - Typed parsing of `lib<name>.so.<major>` names
//! - [`finder`] - Locating a real file that satisfies a requirement
//! - [`ops`] - Filesystem operations with privilege escalation fallback
//! - [`reconciler`] - Creating and repairing links
//! - [`outcome`] - Per-requirement results

pub mod finder;
pub mod ops;
pub mod outcome;
pub mod reconciler;
pub mod requirement;

pub use finder::{find_matching_file, is_dangling, MatchResult};
pub use ops::{DirectOps, DryRunOps, ElevatedOps, EscalatingOps, LinkOps};
pub use outcome::{
    LinkAction, LinkOutcome, ReconcileReport, RequirementReport, Resolution, SkipReason,
};
pub use reconciler::{ReconcileOptions, Reconciler};
pub use requirement::{LibraryRequirement, MalformedName};
