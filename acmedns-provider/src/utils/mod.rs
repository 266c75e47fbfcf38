//! Utility modules.

/// Log sanitization utilities to keep secrets out of logs.
pub mod log_sanitizer;
