//! # Logging Utilities
//!
//! Subscriber setup for the symctx tools, built on `tracing-subscriber`.
//!
//! Diagnostics go to stderr so they never mix with command output on stdout.
//! Optionally a copy goes to a file, rolled daily by `tracing-appender`.
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: filter directives (e.g. `debug`, `symctx_core=trace`);
//!   ignored when an explicit level is configured
//! - `SYMCTX_LOG_FORMAT`: `pretty` (default) or `json`
//! - `SYMCTX_LOG_FILE`: also log to this file; a path ending in `/` names a
//!   directory that receives one dated file per run
//!
//! ## Example
//!
//! ```rust,no_run
//! use symctx_utils::{LogLevel, LoggingConfig, init_logging};
//!
//! let config = LoggingConfig::from_env().with_level(Some(LogLevel::Debug));
//! let _guard = init_logging(&config).expect("Failed to initialize logging");
//! tracing::debug!("resolver ready");
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{env, io};

use chrono::Utc;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::{self};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Environment variable selecting the output format.
pub const LOG_FORMAT_ENV: &str = "SYMCTX_LOG_FORMAT";

/// Environment variable naming an additional log file.
pub const LOG_FILE_ENV: &str = "SYMCTX_LOG_FILE";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat
{
    /// Human-readable lines (default)
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "pretty" | "dev" | "development" => Ok(LogFormat::Pretty),
            "json" | "prod" | "production" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {s}. Use 'pretty' or 'json'")),
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel
{
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level
    Info,
    /// Debug level
    Debug,
    /// Trace level (most verbose)
    Trace,
}

impl From<LogLevel> for Level
{
    fn from(level: LogLevel) -> Self
    {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

impl FromStr for LogLevel
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "error" | "err" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(format!(
                "Unknown log level: {s}. Use 'error', 'warn', 'info', 'debug', or 'trace'"
            )),
        }
    }
}

/// Where and how to log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggingConfig
{
    /// Explicit level; overrides `RUST_LOG` when set
    pub level: Option<LogLevel>,
    /// Output format for every sink
    pub format: LogFormat,
    /// Optional log file (or directory, when the path ends in `/`)
    pub file: Option<PathBuf>,
}

impl LoggingConfig
{
    /// Read `SYMCTX_LOG_FORMAT` and `SYMCTX_LOG_FILE`.
    ///
    /// An unparseable format falls back to pretty output.
    #[must_use]
    pub fn from_env() -> Self
    {
        Self::from_vars(env::var(LOG_FORMAT_ENV).ok().as_deref(), env::var(LOG_FILE_ENV).ok().as_deref())
    }

    fn from_vars(format: Option<&str>, file: Option<&str>) -> Self
    {
        Self {
            level: None,
            format: format.and_then(|value| value.parse().ok()).unwrap_or_default(),
            file: file.filter(|value| !value.is_empty()).map(PathBuf::from),
        }
    }

    /// Set an explicit level.
    #[must_use]
    pub fn with_level(mut self, level: Option<LogLevel>) -> Self
    {
        self.level = level;
        self
    }

    // Priority: explicit level, then RUST_LOG, then INFO
    fn filter(&self) -> EnvFilter
    {
        if let Some(level) = self.level {
            return EnvFilter::new(Level::from(level).to_string());
        }
        match env::var("RUST_LOG") {
            Ok(rust_log) => EnvFilter::try_new(rust_log).unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string())),
            Err(_) => EnvFilter::new(Level::INFO.to_string()),
        }
    }
}

/// Keeps the file writer alive; drop it only when the program exits.
#[derive(Debug)]
pub struct LoggingGuard
{
    _file: Option<WorkerGuard>,
    file_path: Option<PathBuf>,
}

impl LoggingGuard
{
    /// The file receiving logs, if any.
    #[must_use]
    pub fn file_path(&self) -> Option<&Path>
    {
        self.file_path.as_deref()
    }
}

/// Initialize logging from the environment alone.
///
/// ## Errors
///
/// See [`init_logging`].
pub fn init_logging_from_env() -> Result<LoggingGuard, LoggingError>
{
    init_logging(&LoggingConfig::from_env())
}

/// Install the global subscriber.
///
/// ## Errors
///
/// Returns an error if:
/// - A global subscriber is already installed
/// - The log directory cannot be created
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard, LoggingError>
{
    let mut layers = vec![console_layer(config.format, config.filter())];

    let (guard, file_path) = match &config.file {
        Some(requested) => {
            let (layer, guard, path) = file_layer(requested, config.format, config.filter())?;
            layers.push(layer);
            (Some(guard), Some(path))
        }
        None => (None, None),
    };

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|err| LoggingError::InitializationFailed(err.to_string()))?;

    Ok(LoggingGuard {
        _file: guard,
        file_path,
    })
}

fn console_layer(format: LogFormat, filter: EnvFilter) -> BoxedLayer
{
    let layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_timer(ChronoUtc::rfc_3339())
        .with_writer(io::stderr);

    match format {
        LogFormat::Pretty => layer.with_ansi(true).with_filter(filter).boxed(),
        LogFormat::Json => layer
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_filter(filter)
            .boxed(),
    }
}

fn file_layer(requested: &Path, format: LogFormat, filter: EnvFilter) -> Result<(BoxedLayer, WorkerGuard, PathBuf), LoggingError>
{
    let (directory, file_name, appender) = if requested.as_os_str().to_string_lossy().ends_with('/') {
        // Directory: one dated file per run, never rolled
        std::fs::create_dir_all(requested)?;
        let file_name = dated_file_name(&Utc::now().format("%Y-%m-%d").to_string());
        let appender = tracing_appender::rolling::never(requested, &file_name);
        (requested.to_path_buf(), file_name, appender)
    } else {
        let directory = requested
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        std::fs::create_dir_all(&directory)?;
        let file_name = requested
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| LoggingError::InvalidFile(requested.display().to_string()))?;
        let appender = tracing_appender::rolling::daily(&directory, &file_name);
        (directory, file_name, appender)
    };

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_timer(ChronoUtc::rfc_3339())
        .with_ansi(false); // No ANSI in files

    let layer = match format {
        LogFormat::Pretty => layer.with_filter(filter).boxed(),
        LogFormat::Json => layer
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_filter(filter)
            .boxed(),
    };
    Ok((layer, guard, directory.join(file_name)))
}

fn dated_file_name(date: &str) -> String
{
    format!("{date}-symctx.log")
}

/// Logging initialization error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError
{
    /// The log file path has no file name
    #[error("Invalid log file: {0}")]
    InvalidFile(String),

    /// Failed to initialize logging
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),

    /// File logging error
    #[error("File logging error: {0}")]
    FileError(#[from] io::Error),
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_log_format_from_str()
    {
        assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("JSON").unwrap(), LogFormat::Json);
        assert_eq!(LogFormat::from_str("dev").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("prod").unwrap(), LogFormat::Json);
        assert!(LogFormat::from_str("invalid").is_err());
    }

    #[test]
    fn test_log_level_from_str()
    {
        assert_eq!(LogLevel::from_str("error").unwrap(), LogLevel::Error);
        assert_eq!(LogLevel::from_str("warning").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("dbg").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert!(LogLevel::from_str("loud").is_err());
    }

    #[test]
    fn test_log_level_to_tracing_level()
    {
        assert_eq!(Level::from(LogLevel::Error), Level::ERROR);
        assert_eq!(Level::from(LogLevel::Debug), Level::DEBUG);
        assert_eq!(Level::from(LogLevel::Trace), Level::TRACE);
    }

    #[test]
    fn test_config_from_vars()
    {
        let config = LoggingConfig::from_vars(Some("json"), Some("/var/log/symctx.log"));
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.file, Some(PathBuf::from("/var/log/symctx.log")));
        assert_eq!(config.level, None);

        let config = LoggingConfig::from_vars(Some("fancy"), Some(""));
        assert_eq!(config, LoggingConfig::default());
    }

    #[test]
    fn test_dated_file_name()
    {
        assert_eq!(dated_file_name("2026-10-19"), "2026-10-19-symctx.log");
    }
}
