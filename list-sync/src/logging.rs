//! Logging setup for noson list views
//!
//! Library code only emits `tracing` events. Applications pick how they are
//! rendered by calling one of the init functions once at startup. Each mode
//! maps to a single output layer carrying its own level filter.

use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

type OutputLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// How events are rendered to stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingMode {
    /// No subscriber installed; events are dropped
    Silent,
    /// One compact line per event, `info` and above
    Development,
    /// Pretty multi-line output with thread and source location, `debug` and above
    Debug,
    /// Newline-delimited JSON objects, `info` and above
    Json,
}

impl LoggingMode {
    /// Level used when neither `NOSON_LOG_LEVEL` nor `RUST_LOG` is set
    fn default_level(self) -> &'static str {
        match self {
            LoggingMode::Debug => "debug",
            _ => "info",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),
}

/// Install the global subscriber for `mode`
///
/// The level filter comes from `NOSON_LOG_LEVEL`, then `RUST_LOG`, then the
/// mode's default. Fails if a subscriber is already installed.
pub fn init_logging(mode: LoggingMode) -> Result<(), LoggingError> {
    let Some(layer) = output_layer(mode) else {
        return Ok(());
    };

    Registry::default()
        .with(layer)
        .try_init()
        .map_err(|e| LoggingError::TracingInit(e.to_string()))
}

fn output_layer(mode: LoggingMode) -> Option<OutputLayer> {
    let filter = level_filter(mode.default_level());
    let layer: OutputLayer = match mode {
        LoggingMode::Silent => return None,
        LoggingMode::Development => Box::new(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(filter),
        ),
        LoggingMode::Debug => Box::new(
            fmt::layer()
                .pretty()
                .with_thread_names(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr)
                .with_filter(filter),
        ),
        LoggingMode::Json => Box::new(
            fmt::layer()
                .json()
                .with_current_span(false)
                .with_writer(std::io::stderr)
                .with_filter(filter),
        ),
    };
    Some(layer)
}

/// Parse a mode name as accepted by `NOSON_LOG_MODE`
///
/// Unknown names select `Silent`.
pub fn mode_from_name(name: &str) -> LoggingMode {
    match name.trim().to_ascii_lowercase().as_str() {
        "development" | "dev" => LoggingMode::Development,
        "debug" => LoggingMode::Debug,
        "json" => LoggingMode::Json,
        _ => LoggingMode::Silent,
    }
}

/// Read `NOSON_LOG_MODE` and call `init_logging`
pub fn init_logging_from_env() -> Result<(), LoggingError> {
    let mode = std::env::var("NOSON_LOG_MODE")
        .map(|name| mode_from_name(&name))
        .unwrap_or(LoggingMode::Silent);

    init_logging(mode)
}

fn level_filter(fallback: &str) -> EnvFilter {
    ["NOSON_LOG_LEVEL", "RUST_LOG"]
        .iter()
        .find_map(|var| std::env::var(var).ok())
        .map(EnvFilter::new)
        .unwrap_or_else(|| EnvFilter::new(fallback))
}

pub fn is_initialized() -> bool {
    tracing::dispatcher::has_been_set()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_silent_mode_installs_nothing() {
        assert!(output_layer(LoggingMode::Silent).is_none());
        assert!(init_logging(LoggingMode::Silent).is_ok());
    }

    #[rstest]
    #[case(LoggingMode::Development)]
    #[case(LoggingMode::Debug)]
    #[case(LoggingMode::Json)]
    fn test_output_modes_build_a_layer(#[case] mode: LoggingMode) {
        assert!(output_layer(mode).is_some());
    }

    #[rstest]
    #[case("development", LoggingMode::Development)]
    #[case("dev", LoggingMode::Development)]
    #[case(" Debug ", LoggingMode::Debug)]
    #[case("JSON", LoggingMode::Json)]
    #[case("silent", LoggingMode::Silent)]
    #[case("loud", LoggingMode::Silent)]
    fn test_mode_from_name(#[case] name: &str, #[case] expected: LoggingMode) {
        assert_eq!(mode_from_name(name), expected);
    }

    #[test]
    fn test_default_levels() {
        assert_eq!(LoggingMode::Debug.default_level(), "debug");
        assert_eq!(LoggingMode::Json.default_level(), "info");
    }
}
