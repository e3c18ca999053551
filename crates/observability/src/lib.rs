//! Tracing/logging setup shared by every warden process.

/// Tracing configuration and initialization.
pub mod tracing;

pub use tracing::{LogFormat, init, init_with};
