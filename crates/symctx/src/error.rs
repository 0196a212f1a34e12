//! # Error Types
//!
//! Errors surfaced by the `symctx` command line.

use std::io;

use symctx_core::SymctxError;
use symctx_utils::LoggingError;
use thiserror::Error;

/// Main error type for the command line
///
/// ## Error Categories
///
/// 1. **Input errors**: Io, Json, InvalidFixture
/// 2. **Model errors**: Core, UnknownCompileUnit
/// 3. **Runtime errors**: Join, Logging
#[derive(Error, Debug)]
pub enum CliError
{
    /// Reading the fixture failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The fixture is not valid JSON for the fixture schema
    #[error("Invalid fixture JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The fixture is well-formed but describes an impossible module
    #[error("Invalid fixture: {0}")]
    InvalidFixture(String),

    /// Building the module failed
    #[error(transparent)]
    Core(#[from] SymctxError),

    /// `--unit` named a compile unit the fixture doesn't have
    #[error("No compile unit with id {0}")]
    UnknownCompileUnit(u64),

    /// The blocking worker panicked or was cancelled
    #[error("Worker thread failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// Logging could not be set up
    #[error(transparent)]
    Logging(#[from] LoggingError),
}

/// Convenience type alias for `Result<T, CliError>`
pub type Result<T> = std::result::Result<T, CliError>;
