//! Status vocabulary for consistent CLI output.

use super::theme::SolinkTheme;
use crate::link::LinkOutcome;

/// Canonical status kinds used across all solink output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    /// Link created or repaired.
    Success,
    /// Requirement already satisfied.
    Unchanged,
    /// Operation failed.
    Failed,
    /// Requirement was skipped.
    Skipped,
    /// Non-fatal warning.
    Warning,
}

impl StatusKind {
    /// Unicode icon for TTY output.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "✓",
            Self::Unchanged => "=",
            Self::Failed => "✗",
            Self::Skipped => "○",
            Self::Warning => "⚠",
        }
    }

    /// Bracketed text for non-TTY output.
    pub fn bracketed(self) -> &'static str {
        match self {
            Self::Success => "[ok]",
            Self::Unchanged => "[same]",
            Self::Failed => "[FAIL]",
            Self::Skipped => "[skip]",
            Self::Warning => "[warn]",
        }
    }

    /// Styled icon string using the given theme.
    pub fn styled(self, theme: &SolinkTheme) -> String {
        let icon = self.icon();
        match self {
            Self::Success => theme.success.apply_to(icon).to_string(),
            Self::Unchanged => theme.dim.apply_to(icon).to_string(),
            Self::Failed => theme.error.apply_to(icon).to_string(),
            Self::Skipped => theme.dim.apply_to(icon).to_string(),
            Self::Warning => theme.warning.apply_to(icon).to_string(),
        }
    }

    /// Format a status line: styled icon + message.
    pub fn format(self, theme: &SolinkTheme, msg: &str) -> String {
        format!("{} {}", self.styled(theme), msg)
    }

    /// Format a status line for non-TTY: bracketed + message.
    pub fn format_plain(self, msg: &str) -> String {
        format!("{} {}", self.bracketed(), msg)
    }
}

impl From<&LinkOutcome> for StatusKind {
    fn from(outcome: &LinkOutcome) -> Self {
        match outcome {
            LinkOutcome::Created(_) | LinkOutcome::Recreated(_) => Self::Success,
            LinkOutcome::AlreadyCorrect(_) => Self::Unchanged,
            LinkOutcome::AcceptedFallback(_) => Self::Warning,
            LinkOutcome::Skipped(_) => Self::Skipped,
            LinkOutcome::Failed { .. } => Self::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::{LinkAction, SkipReason};
    use std::path::PathBuf;

    #[test]
    fn icon_returns_unicode_symbols() {
        assert_eq!(StatusKind::Success.icon(), "✓");
        assert_eq!(StatusKind::Failed.icon(), "✗");
        assert_eq!(StatusKind::Skipped.icon(), "○");
    }

    #[test]
    fn format_plain_uses_brackets() {
        assert_eq!(
            StatusKind::Failed.format_plain("libnvinfer.so.8"),
            "[FAIL] libnvinfer.so.8"
        );
    }

    #[test]
    fn format_with_plain_theme() {
        let theme = SolinkTheme::plain();
        assert_eq!(StatusKind::Success.format(&theme, "done"), "✓ done");
    }

    #[test]
    fn maps_link_outcomes() {
        let action = LinkAction::new("/a", "/b");
        assert_eq!(
            StatusKind::from(&LinkOutcome::Recreated(action.clone())),
            StatusKind::Success
        );
        assert_eq!(
            StatusKind::from(&LinkOutcome::AlreadyCorrect(action)),
            StatusKind::Unchanged
        );
        assert_eq!(
            StatusKind::from(&LinkOutcome::Skipped(SkipReason::NoMatch)),
            StatusKind::Skipped
        );
        assert_eq!(
            StatusKind::from(&LinkOutcome::Failed {
                link: PathBuf::from("/a"),
                message: "denied".into()
            }),
            StatusKind::Failed
        );
    }
}
