//! Non-interactive UI for piped output and CI.

use super::{OutputMode, SpinnerHandle, StatusKind, UserInterface};

/// UI implementation for non-interactive mode.
///
/// Plain text without color. Warnings and errors go to stderr, everything
/// else to stdout. Spinners print their message once.
pub struct NonInteractiveUI {
    mode: OutputMode,
    is_ci: bool,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            is_ci: crate::shell::is_ci(),
        }
    }

    /// Create with explicit CI flag (for testing).
    pub fn with_ci(mode: OutputMode, is_ci: bool) -> Self {
        Self { mode, is_ci }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_messages() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_messages() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_messages() {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn status(&mut self, kind: StatusKind, msg: &str) {
        if self.mode.shows_status() {
            println!("  {}", kind.format_plain(msg));
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        // CI logs keep every line, so the progress line is noise there.
        if self.mode.shows_spinners() && !self.is_ci {
            println!("{}", message);
        }
        Box::new(NoopSpinner)
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_messages() {
            println!("\n{}", title);
        }
    }
}

/// Spinner that does nothing (for non-interactive mode).
struct NoopSpinner;

impl SpinnerHandle for NoopSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, _msg: &str) {}

    fn finish_error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_output_mode() {
        let ui = NonInteractiveUI::with_ci(OutputMode::Silent, true);
        assert_eq!(ui.output_mode(), OutputMode::Silent);
    }

    #[test]
    fn spinner_is_noop() {
        let mut ui = NonInteractiveUI::with_ci(OutputMode::Silent, true);
        let mut spinner = ui.start_spinner("Tracing");
        spinner.set_message("still tracing");
        spinner.finish_success("done");
    }
}
