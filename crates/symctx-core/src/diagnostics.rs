//! Module-level diagnostics.
//!
//! Non-fatal problems found while resolving (bad debug info, mostly) are
//! recorded here so callers can surface them, and logged as they arrive.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use tracing::{error, warn};

/// How bad a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity
{
    /// Suspicious but usable
    Warning,
    /// Debug info is inconsistent
    Error,
}

impl fmt::Display for Severity
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// One recorded message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic
{
    /// Severity
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
}

impl fmt::Display for Diagnostic
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Append-only diagnostics sink.
#[derive(Debug, Default)]
pub struct Diagnostics
{
    entries: Mutex<Vec<Diagnostic>>,
}

impl Diagnostics
{
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Record and log a diagnostic.
    pub fn report(&self, severity: Severity, message: impl Into<String>, context: &str)
    {
        let message = message.into();
        match severity {
            Severity::Error => error!(module = context, "{message}"),
            Severity::Warning => warn!(module = context, "{message}"),
        }
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Diagnostic { severity, message });
    }

    /// Everything recorded so far, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Diagnostic>
    {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of recorded diagnostics.
    #[must_use]
    pub fn len(&self) -> usize
    {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool
    {
        self.len() == 0
    }
}
