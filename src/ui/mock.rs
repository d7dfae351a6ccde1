//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion.
//!
//! # Example
//!
//! ```
//! use solink::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//!
//! // Use ui in code under test...
//! ui.warning("Broken symlink found: libnvinfer.so.8, removing it");
//! ui.success("Created symlink: libnvinfer.so.8 -> libnvinfer.so.8.6.1");
//!
//! // Assert on captured interactions
//! assert!(ui.has_warning("Broken symlink"));
//! assert!(ui.successes().contains(
//!     &"Created symlink: libnvinfer.so.8 -> libnvinfer.so.8.6.1".to_string()
//! ));
//! ```

use super::{OutputMode, SpinnerHandle, StatusKind, UserInterface};

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    statuses: Vec<(StatusKind, String)>,
    headers: Vec<String>,
    spinners: Vec<String>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self {
            mode: OutputMode::Normal,
            ..Default::default()
        }
    }

    /// Create a new MockUI with a specific output mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Get all captured messages.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Get all captured success messages.
    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    /// Get all captured warning messages.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Get all captured error messages.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Get all captured status lines.
    pub fn statuses(&self) -> &[(StatusKind, String)] {
        &self.statuses
    }

    /// Get all captured headers.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Get all spinner messages that were started.
    pub fn spinners(&self) -> &[String] {
        &self.spinners
    }

    /// Check if a specific message was shown.
    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific success was shown.
    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific warning was shown.
    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific error was shown.
    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
    }

    /// Check if a status line of this kind containing `msg` was shown.
    pub fn has_status(&self, kind: StatusKind, msg: &str) -> bool {
        self.statuses
            .iter()
            .any(|(k, m)| *k == kind && m.contains(msg))
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn status(&mut self, kind: StatusKind, msg: &str) {
        self.statuses.push((kind, msg.to_string()));
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.spinners.push(message.to_string());
        Box::new(MockSpinner::default())
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }
}

/// Spinner that records how it finished.
#[derive(Debug, Default)]
pub struct MockSpinner {
    /// Last message set on the spinner.
    pub message: Option<String>,
    /// Final message and whether it was a success.
    pub finished: Option<(bool, String)>,
}

impl SpinnerHandle for MockSpinner {
    fn set_message(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
    }

    fn finish_success(&mut self, msg: &str) {
        self.finished = Some((true, msg.to_string()));
    }

    fn finish_error(&mut self, msg: &str) {
        self.finished = Some((false, msg.to_string()));
    }
}
