//! Utility modules.

/// `YYYY-MM-DD HH:MM:SS` formatting and tolerant timestamp parsing.
pub mod datetime;

/// Truncation and masking helpers for log output.
pub mod log_sanitizer;
