//! Extracting missing library names from trace output.

use regex::Regex;
use std::collections::BTreeSet;

use crate::error::{Result, SolinkError};

/// Default pattern: the TensorRT core and plugin libraries.
pub const DEFAULT_PATTERN: &str = r"libnvinfer(?:_plugin)?\.so\.\d+";

/// Number of trailing trace characters shown when nothing matched.
pub const TRACE_TAIL_CHARS: usize = 1000;

/// Result of scanning a trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Distinct library names, sorted.
    Missing(Vec<String>),
    /// The trace mentions no matching library.
    NothingToDo,
}

impl Extraction {
    /// The extracted names (empty for [`Extraction::NothingToDo`]).
    pub fn requirements(&self) -> &[String] {
        match self {
            Self::Missing(names) => names,
            Self::NothingToDo => &[],
        }
    }
}

/// Finds library names in free text.
///
/// # Example
///
/// ```
/// use solink::trace::{Extraction, RequirementExtractor};
///
/// let extractor = RequirementExtractor::default();
/// let trace = r#"openat(AT_FDCWD, "/env/libnvinfer.so.8", O_RDONLY|O_CLOEXEC) = -1 ENOENT"#;
/// assert_eq!(
///     extractor.extract(trace),
///     Extraction::Missing(vec!["libnvinfer.so.8".to_string()])
/// );
/// ```
#[derive(Debug, Clone)]
pub struct RequirementExtractor {
    regex: Regex,
}

impl RequirementExtractor {
    /// Compile an extractor from a pattern.
    ///
    /// If the pattern has capture groups, the first group is the library
    /// name; otherwise the whole match is.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| SolinkError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { regex })
    }

    /// The source pattern.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Collect every distinct match in `trace`.
    pub fn extract(&self, trace: &str) -> Extraction {
        let names: BTreeSet<String> = self
            .regex
            .captures_iter(trace)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(0)))
            .map(|m| m.as_str().to_string())
            .filter(|name| !name.is_empty())
            .collect();

        if names.is_empty() {
            Extraction::NothingToDo
        } else {
            Extraction::Missing(names.into_iter().collect())
        }
    }
}

impl Default for RequirementExtractor {
    fn default() -> Self {
        Self {
            regex: Regex::new(DEFAULT_PATTERN).expect("default pattern is valid"),
        }
    }
}

/// The last `max_chars` characters of `text`.
pub fn tail(text: &str, max_chars: usize) -> &str {
    let count = text.chars().count();
    if count <= max_chars {
        return text;
    }
    let skip = count - max_chars;
    match text.char_indices().nth(skip) {
        Some((idx, _)) => &text[idx..],
        None => "",
    }
}
