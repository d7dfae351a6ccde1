//! Interactive terminal UI.

use console::Term;
use std::io::Write;

use super::{
    should_use_colors, NonInteractiveUI, OutputMode, ProgressSpinner, SolinkTheme,
    SpinnerHandle, StatusKind, UserInterface,
};

/// Interactive terminal UI implementation.
///
/// Warnings and errors go to the error stream so that stdout can carry a
/// JSON report on its own.
pub struct TerminalUI<O = Term, E = Term> {
    out: O,
    err: E,
    theme: SolinkTheme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode) -> Self {
        let theme = if should_use_colors() {
            SolinkTheme::new()
        } else {
            SolinkTheme::plain()
        };
        Self::with_streams(mode, theme, Term::stdout(), Term::stderr())
    }
}

impl<O: Write, E: Write> TerminalUI<O, E> {
    /// Create a terminal UI writing to the given streams.
    pub fn with_streams(mode: OutputMode, theme: SolinkTheme, out: O, err: E) -> Self {
        Self {
            out,
            err,
            theme,
            mode,
        }
    }
}

impl<O: Write, E: Write> UserInterface for TerminalUI<O, E> {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_messages() {
            writeln!(self.out, "{}", msg).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_messages() {
            writeln!(self.out, "{}", self.theme.format_success(msg)).ok();
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_messages() {
            writeln!(self.err, "{}", self.theme.format_warning(msg)).ok();
        }
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_error(msg)).ok();
    }

    fn status(&mut self, kind: StatusKind, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.out, "  {}", kind.format(&self.theme, msg)).ok();
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            Box::new(ProgressSpinner::new(message))
        } else {
            Box::new(ProgressSpinner::hidden())
        }
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_messages() {
            writeln!(self.out, "\n{}", self.theme.format_header(title)).ok();
        }
    }
}

/// Create the appropriate UI based on context.
pub fn create_ui(interactive: bool, mode: OutputMode) -> Box<dyn UserInterface> {
    if interactive && Term::stdout().is_term() {
        Box::new(TerminalUI::new(mode))
    } else {
        Box::new(NonInteractiveUI::new(mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captured(mode: OutputMode) -> TerminalUI<Vec<u8>, Vec<u8>> {
        TerminalUI::with_streams(mode, SolinkTheme::plain(), Vec::new(), Vec::new())
    }

    fn text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    #[test]
    fn terminal_ui_output_mode() {
        let ui = TerminalUI::new(OutputMode::Quiet);
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
    }

    #[test]
    fn errors_never_reach_stdout() {
        let mut ui = captured(OutputMode::Silent);

        ui.message("Environment: /env");
        ui.error("Target directory does not exist: nvidia/cudnn/lib");

        assert!(ui.out.is_empty());
        assert_eq!(
            text(&ui.err),
            "✗ Target directory does not exist: nvidia/cudnn/lib\n"
        );
    }

    #[test]
    fn warnings_go_to_stderr() {
        let mut ui = captured(OutputMode::Normal);

        ui.warning("Broken symlink found");
        ui.success("Created symlink");

        assert_eq!(text(&ui.out), "✓ Created symlink\n");
        assert_eq!(text(&ui.err), "⚠ Broken symlink found\n");
    }

    #[test]
    fn quiet_keeps_status_lines_and_errors() {
        let mut ui = captured(OutputMode::Quiet);

        ui.show_header("Processing tensorrt_libs");
        ui.message("Summary of created symlinks:");
        ui.warning("Could not find a matching file");
        ui.status(StatusKind::Success, "libnvinfer.so.8 -> libnvinfer.so.8.6.1");
        ui.error("Failed to create symlink");

        assert_eq!(text(&ui.out), "  ✓ libnvinfer.so.8 -> libnvinfer.so.8.6.1\n");
        assert_eq!(text(&ui.err), "✗ Failed to create symlink\n");
    }

    #[test]
    fn create_ui_respects_mode() {
        let ui = create_ui(false, OutputMode::Silent);
        assert_eq!(ui.output_mode(), OutputMode::Silent);
    }
}
