//! Structured logging.

mod format;

pub use format::{AssessmentLogEvent, StructuredLogger};
