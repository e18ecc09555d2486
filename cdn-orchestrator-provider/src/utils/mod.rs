//! Utility modules.

/// Timestamp serialization helpers for API records.
pub mod datetime;

/// Log sanitization utilities to prevent token and credential exposure.
pub mod log_sanitizer;
