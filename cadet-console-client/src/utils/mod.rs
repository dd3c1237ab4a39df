//! Utility modules.

/// Keeps record payloads and tokens from flooding or leaking into logs.
pub mod log_sanitizer;
