//! Load tracing and requirement extraction.
//!
//! - [`runner`] - Running the import under a system call tracer
//! - [`extract`] - Pattern-matching the trace into library names

pub mod extract;
pub mod runner;

pub use extract::{tail, Extraction, RequirementExtractor, DEFAULT_PATTERN, TRACE_TAIL_CHARS};
pub use runner::{read_trace, TraceCommand, TraceSource};
