//! Tracing subscriber setup for the `lpkit` binary.

use std::env;
use std::fs::{File, OpenOptions};
use std::io;
use tracing::Subscriber;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug)]
pub enum LoggingError {
    InvalidFilter { filter: String, reason: String },
    InvalidFormat { format: String },
    LogFile { path: String, reason: String },
    Init { reason: String },
}

impl LoggingError {
    pub fn code(&self) -> &'static str {
        match self {
            LoggingError::InvalidFilter { .. } => "LOG_INVALID_FILTER",
            LoggingError::InvalidFormat { .. } => "LOG_INVALID_FORMAT",
            LoggingError::LogFile { .. } => "LOG_FILE_OPEN_FAILED",
            LoggingError::Init { .. } => "LOG_INIT_FAILED",
        }
    }
}

impl std::fmt::Display for LoggingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoggingError::InvalidFilter { filter, reason } => {
                write!(f, "[{}] invalid log filter '{}': {}", self.code(), filter, reason)
            }
            LoggingError::InvalidFormat { format } => write!(
                f,
                "[{}] invalid LPKIT_LOG_FORMAT '{}' (expected 'json' or 'pretty')",
                self.code(),
                format
            ),
            LoggingError::LogFile { path, reason } => {
                write!(f, "[{}] failed to open log file {}: {}", self.code(), path, reason)
            }
            LoggingError::Init { reason } => {
                write!(f, "[{}] failed to initialize logging: {}", self.code(), reason)
            }
        }
    }
}

impl std::error::Error for LoggingError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Json,
}

fn parse_format(value: &str) -> Result<LogFormat, LoggingError> {
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

fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    if level.eq_ignore_ascii_case("off") {
        return Ok(EnvFilter::default().add_directive(LevelFilter::OFF.into()));
    }
    EnvFilter::try_new(level).map_err(|err| LoggingError::InvalidFilter {
        filter: level.to_string(),
        reason: err.to_string(),
    })
}

fn open_log_file(path: &str) -> Result<File, LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| LoggingError::LogFile {
            path: path.to_string(),
            reason: err.to_string(),
        })
}

fn map_init_err<E: std::fmt::Display>(err: E) -> LoggingError {
    LoggingError::Init {
        reason: err.to_string(),
    }
}

/// One fmt layer in `format`, writing to `writer`.
fn format_layer<S, W>(format: LogFormat, writer: W, ansi: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi);
    match format {
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Pretty => layer.pretty().boxed(),
    }
}

/// Install the global subscriber.
///
/// `level` wins over `LPKIT_TRACE`; with neither set logging is off.
/// Returns `false` when a subscriber was already installed.
pub fn init_logging(level: Option<&str>) -> Result<bool, LoggingError> {
    if tracing::dispatcher::has_been_set() {
        return Ok(false);
    }

    let level_value = level
        .map(str::to_string)
        .or_else(|| env::var("LPKIT_TRACE").ok())
        .unwrap_or_else(|| "off".to_string());
    let filter = build_filter(&level_value)?;
    let format = parse_format(
        &env::var("LPKIT_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
    )?;

    let mut layers = vec![format_layer(format, io::stderr, true)];
    if let Ok(path) = env::var("LPKIT_LOG_FILE") {
        layers.push(format_layer(format, open_log_file(&path)?, false));
    }
    tracing_subscriber::registry()
        .with(filter)
        .with(layers)
        .try_init()
        .map_err(map_init_err)?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!(parse_format("JSON").unwrap(), LogFormat::Json);
        assert_eq!(parse_format("pretty").unwrap(), LogFormat::Pretty);
        let err = parse_format("xml").unwrap_err();
        assert_eq!(err.code(), "LOG_INVALID_FORMAT");
        assert!(err.to_string().contains("xml"));
    }

    #[test]
    fn test_format_layer_for_each_format() {
        use tracing_subscriber::Registry;

        for format in [LogFormat::Pretty, LogFormat::Json] {
            let layer: Box<dyn Layer<Registry> + Send + Sync> =
                format_layer(format, io::sink, false);
            let subscriber = tracing_subscriber::registry().with(layer);
            tracing::subscriber::with_default(subscriber, || {
                tracing::info!(component = "cli", "layer smoke event");
            });
        }
    }

    #[test]
    fn test_build_filter() {
        assert!(build_filter("off").is_ok());
        assert!(build_filter("lpkit_highs=debug,info").is_ok());
        let err = build_filter("lpkit=loud").unwrap_err();
        assert_eq!(err.code(), "LOG_INVALID_FILTER");
    }
}
