//! Output mode.

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Show per-library detail in addition to status.
    Verbose,
    /// Show progress and status only.
    #[default]
    Normal,
    /// Show spinners, summary status lines, and errors.
    Quiet,
    /// Show nothing except errors.
    Silent,
}

impl OutputMode {
    /// Pick a mode from the global verbosity flags.
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if verbose {
            Self::Verbose
        } else if quiet {
            Self::Quiet
        } else {
            Self::Normal
        }
    }

    /// Check if this mode shows detail lines.
    pub fn shows_details(&self) -> bool {
        matches!(self, Self::Verbose)
    }

    /// Check if this mode shows progress messages, headers, and warnings.
    pub fn shows_messages(&self) -> bool {
        matches!(self, Self::Verbose | Self::Normal)
    }

    /// Check if this mode shows progress spinners.
    pub fn shows_spinners(&self) -> bool {
        matches!(self, Self::Verbose | Self::Normal | Self::Quiet)
    }

    /// Check if this mode shows status lines.
    pub fn shows_status(&self) -> bool {
        !matches!(self, Self::Silent)
    }
}
