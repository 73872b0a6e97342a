//! # Logging Utilities
//!
//! Logging infrastructure for objlens using `tracing`.
//!
//! Two setups are provided:
//! - Console logging for the `objlens` command line tool. Logs go to stderr
//!   because stdout carries rendered values.
//! - Session logging for hosts that embed the engine inside a debugger.
//!   Logs go only to a dated file under `~/.objlens/`, so the debugger's own
//!   console stays clean.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use objlens_utils::init_logging;
//!
//! // Reads RUST_LOG, OBJLENS_LOG_FORMAT and OBJLENS_LOG_FILE
//! init_logging().expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Log level filter (e.g., `RUST_LOG=debug`, `RUST_LOG=objlens_core=trace`)
//! - `OBJLENS_LOG_FORMAT`: Output format (`json` or `pretty`, default: `pretty`)
//! - `OBJLENS_LOG_FILE`: Optional path of an additional, daily rolled log file
//!
//! ## Examples
//!
//! ```rust,no_run
//! use objlens_utils::{LogFormat, LogLevel, init_logging_for_session, init_logging_with_level};
//!
//! // Explicit level on the console
//! init_logging_with_level(LogLevel::Debug, LogFormat::Pretty)
//!     .expect("Failed to initialize logging");
//!
//! // Or, inside a debugger host: file only
//! let path = init_logging_for_session(Some(LogLevel::Trace)).expect("Failed to initialize logging");
//! println!("logging to {}", path.display());
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{env, io};

use chrono::Utc;
use tracing::Level;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Environment variable selecting the output format
pub const LOG_FORMAT_ENV: &str = "OBJLENS_LOG_FORMAT";

/// Environment variable naming an additional log file
pub const LOG_FILE_ENV: &str = "OBJLENS_LOG_FILE";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat
{
    /// Pretty-printed, human-readable format (default)
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat
{
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "pretty" | "dev" | "development" => Ok(LogFormat::Pretty),
            "json" | "prod" | "production" => Ok(LogFormat::Json),
            _ => Err(LoggingError::InvalidFormat(s.to_string())),
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel
{
    Error,
    Warn,
    /// Default
    Info,
    Debug,
    /// Every bridge round trip and cache decision
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
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "error" | "err" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(LoggingError::InvalidLevel(s.to_string())),
        }
    }
}

/// Initialize console logging from the environment
///
/// - `RUST_LOG`: Level filter, `info` when unset
/// - `OBJLENS_LOG_FORMAT`: `json` or `pretty`, `pretty` when unset or invalid
/// - `OBJLENS_LOG_FILE`: Also log to this file, rolled daily
///
/// ## Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging() -> Result<(), LoggingError>
{
    let format = env::var(LOG_FORMAT_ENV)
        .ok()
        .and_then(|s| LogFormat::from_str(&s).ok())
        .unwrap_or_default();

    let default_level = env::var("RUST_LOG")
        .ok()
        .and_then(|s| s.parse::<LogLevel>().ok())
        .map_or(Level::INFO, Into::into);

    init_console(format, default_level)
}

/// Initialize console logging with an explicit level and format
///
/// `RUST_LOG` still wins when it holds a valid filter, so per-module
/// directives such as `objlens_core::inspector=trace` keep working.
///
/// ## Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging_with_level(level: LogLevel, format: LogFormat) -> Result<(), LoggingError>
{
    init_console(format, level.into())
}

/// Initialize file-only logging for a debugger session
///
/// Writes to `~/.objlens/YYYY-MM-DD-objlens-session.log`, or to the system
/// temp directory when `HOME` is not set. Returns the log file path.
///
/// ## Errors
///
/// Returns an error if the log directory cannot be created or a global
/// subscriber is already installed.
pub fn init_logging_for_session(level: Option<LogLevel>) -> Result<PathBuf, LoggingError>
{
    let home = env::var_os("HOME").map(PathBuf::from);
    let log_file = session_log_path(home.as_deref(), &Utc::now().format("%Y-%m-%d").to_string());
    if let Some(dir) = log_file.parent() {
        std::fs::create_dir_all(dir)?;
    }

    let filter = match level {
        Some(level) => EnvFilter::new(Level::from(level).to_string()),
        None => default_filter(Level::INFO),
    };

    let file_appender = tracing_appender::rolling::never(
        log_file.parent().unwrap_or_else(|| Path::new(".")),
        log_file.file_name().unwrap_or_default(),
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    // The session lives as long as the host process.
    std::mem::forget(guard);

    let layer = format_layer(LogFormat::Pretty, non_blocking, false).with_filter(filter).boxed();
    install(vec![layer])?;
    Ok(log_file)
}

/// Where the session log of `date` lives.
pub fn session_log_path(home: Option<&Path>, date: &str) -> PathBuf
{
    let file_name = format!("{date}-objlens-session.log");
    match home {
        Some(home) => home.join(".objlens").join(file_name),
        None => env::temp_dir().join(file_name),
    }
}

/// `RUST_LOG` if it parses, `default_level` otherwise.
fn default_filter(default_level: Level) -> EnvFilter
{
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level.to_string()))
}

fn init_console(format: LogFormat, default_level: Level) -> Result<(), LoggingError>
{
    let mut layers = vec![format_layer(format, io::stderr, true)
        .with_filter(default_filter(default_level))
        .boxed()];

    if let Some(file_path) = env::var_os(LOG_FILE_ENV).map(PathBuf::from) {
        let file_appender = tracing_appender::rolling::daily(
            file_path.parent().unwrap_or_else(|| Path::new(".")),
            file_path.file_name().unwrap_or_default(),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);
        layers.push(
            format_layer(format, non_blocking, false)
                .with_filter(default_filter(default_level))
                .boxed(),
        );
    }

    install(layers)
}

/// One fmt layer in `format` writing to `writer`.
fn format_layer<W>(format: LogFormat, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true)
        .with_timer(ChronoUtc::rfc_3339());

    match format {
        LogFormat::Pretty => layer.with_ansi(ansi).boxed(),
        LogFormat::Json => layer.json().with_current_span(true).with_span_list(true).boxed(),
    }
}

fn install(layers: Vec<BoxedLayer>) -> Result<(), LoggingError>
{
    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|err| LoggingError::InitializationFailed(err.to_string()))
}

/// Logging initialization error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError
{
    #[error("Invalid log format: {0}. Use 'pretty' or 'json'")]
    InvalidFormat(String),

    #[error("Invalid log level: {0}. Use 'error', 'warn', 'info', 'debug', or 'trace'")]
    InvalidLevel(String),

    /// A global subscriber is already installed
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),

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
        assert!(matches!(LogFormat::from_str("xml"), Err(LoggingError::InvalidFormat(s)) if s == "xml"));
    }

    #[test]
    fn test_log_level_from_str()
    {
        assert_eq!(LogLevel::from_str("error").unwrap(), LogLevel::Error);
        assert_eq!(LogLevel::from_str("warning").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("dbg").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert!(matches!(LogLevel::from_str("loud"), Err(LoggingError::InvalidLevel(_))));
    }

    #[test]
    fn test_log_level_to_tracing_level()
    {
        assert_eq!(Level::from(LogLevel::Error), Level::ERROR);
        assert_eq!(Level::from(LogLevel::Warn), Level::WARN);
        assert_eq!(Level::from(LogLevel::Info), Level::INFO);
        assert_eq!(Level::from(LogLevel::Debug), Level::DEBUG);
        assert_eq!(Level::from(LogLevel::Trace), Level::TRACE);
    }

    #[test]
    fn test_session_log_path()
    {
        let path = session_log_path(Some(Path::new("/home/dev")), "2026-10-19");
        assert_eq!(path, PathBuf::from("/home/dev/.objlens/2026-10-19-objlens-session.log"));

        let fallback = session_log_path(None, "2026-10-19");
        assert_eq!(fallback, env::temp_dir().join("2026-10-19-objlens-session.log"));
    }
}
