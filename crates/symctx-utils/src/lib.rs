//! # symctx Utilities
//!
//! Logging setup shared by the symctx binaries.
//!
//! Library crates only emit `tracing` events; installing a subscriber is
//! the binary's job, and this crate is how it does it.

pub mod logging;

// Re-export commonly used logging functions for convenience
pub use logging::{LogFormat, LogLevel, LoggingConfig, LoggingError, LoggingGuard, init_logging, init_logging_from_env};
pub use tracing::{debug, error, info, trace, warn};
