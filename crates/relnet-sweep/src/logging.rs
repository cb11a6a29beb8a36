//! Tracing subscriber setup for the command line.

use std::env;
use std::fs::{File, OpenOptions};
use std::io;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const TRACE_ENV: &str = "RELNET_TRACE";
pub const FORMAT_ENV: &str = "RELNET_LOG_FORMAT";
pub const FILE_ENV: &str = "RELNET_LOG_FILE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Result<Self, LoggingError> {
        if value.eq_ignore_ascii_case("pretty") {
            Ok(LogFormat::Pretty)
        } else if value.eq_ignore_ascii_case("json") {
            Ok(LogFormat::Json)
        } else {
            Err(LoggingError::InvalidFormat {
                format: value.to_string(),
            })
        }
    }
}

#[derive(Debug)]
pub enum LoggingError {
    InvalidFilter { filter: String, message: String },
    InvalidFormat { format: String },
    LogFile { path: String, message: String },
    Init(String),
}

impl LoggingError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            LoggingError::InvalidFilter { .. } => "LOG_INVALID_FILTER",
            LoggingError::InvalidFormat { .. } => "LOG_INVALID_FORMAT",
            LoggingError::LogFile { .. } => "LOG_FILE",
            LoggingError::Init(_) => "LOG_INIT",
        }
    }
}

impl std::fmt::Display for LoggingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoggingError::InvalidFilter { filter, message } => write!(
                f,
                "[{}] Invalid log filter '{}': {}",
                self.code(),
                filter,
                message
            ),
            LoggingError::InvalidFormat { format } => write!(
                f,
                "[{}] Invalid {} '{}' (expected 'json' or 'pretty')",
                self.code(),
                FORMAT_ENV,
                format
            ),
            LoggingError::LogFile { path, message } => {
                write!(f, "[{}] Failed to open log file {}: {}", self.code(), path, message)
            }
            LoggingError::Init(message) => {
                write!(f, "[{}] Failed to initialize logging: {}", self.code(), message)
            }
        }
    }
}

impl std::error::Error for LoggingError {}

/// Filter for `level`; `off` disables every event.
pub fn parse_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    if level.eq_ignore_ascii_case("off") {
        return Ok(EnvFilter::default().add_directive(LevelFilter::OFF.into()));
    }
    EnvFilter::try_new(level).map_err(|err| LoggingError::InvalidFilter {
        filter: level.to_string(),
        message: err.to_string(),
    })
}

fn open_log_file(path: &str) -> Result<File, LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| LoggingError::LogFile {
            path: path.to_string(),
            message: err.to_string(),
        })
}

fn map_init_err<E: std::fmt::Display>(err: E) -> LoggingError {
    LoggingError::Init(err.to_string())
}

/// Install the global subscriber.
///
/// When `level` is None, this reads `RELNET_TRACE`, defaulting to `off`.
/// Returns false if a subscriber is already configured.
pub fn init_logging(level: Option<&str>) -> Result<bool, LoggingError> {
    if tracing::dispatcher::has_been_set() {
        return Ok(false);
    }

    let level_value = level
        .map(str::to_string)
        .or_else(|| env::var(TRACE_ENV).ok())
        .unwrap_or_else(|| "off".to_string());
    let filter = parse_filter(&level_value)?;
    let format = LogFormat::parse(
        &env::var(FORMAT_ENV).unwrap_or_else(|_| "pretty".to_string()),
    )?;
    let log_file = env::var(FILE_ENV).ok();

    match format {
        LogFormat::Json => {
            let stderr_layer = tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .json();
            let base = tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer);
            if let Some(path) = log_file {
                let file_layer = tracing_subscriber::fmt::layer()
                    .with_writer(open_log_file(&path)?)
                    .with_ansi(false)
                    .json();
                base.with(file_layer).try_init().map_err(map_init_err)?;
            } else {
                base.try_init().map_err(map_init_err)?;
            }
        }
        LogFormat::Pretty => {
            let stderr_layer = tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .pretty();
            let base = tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer);
            if let Some(path) = log_file {
                let file_layer = tracing_subscriber::fmt::layer()
                    .with_writer(open_log_file(&path)?)
                    .with_ansi(false)
                    .pretty();
                base.with(file_layer).try_init().map_err(map_init_err)?;
            } else {
                base.try_init().map_err(map_init_err)?;
            }
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_names() {
        assert_eq!(LogFormat::parse("JSON").unwrap(), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty").unwrap(), LogFormat::Pretty);
        assert_eq!(
            LogFormat::parse("xml").unwrap_err().code(),
            "LOG_INVALID_FORMAT"
        );
    }

    #[test]
    fn test_filters() {
        assert!(parse_filter("off").is_ok());
        assert!(parse_filter("relnet_design=debug,info").is_ok());
        assert_eq!(
            parse_filter("relnet_design=loud").unwrap_err().code(),
            "LOG_INVALID_FILTER"
        );
    }
}
