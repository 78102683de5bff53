//! Tracing and logging (shared setup).

/// Tracing configuration (filters, output format).
pub mod tracing;
