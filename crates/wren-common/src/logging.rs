//! Logging configuration and setup.
//!
//! Library crates only emit `tracing` events; binaries (and tests that want
//! output) install a subscriber with [`init_logging`] or [`try_init_logging`].

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format.
    #[default]
    Pretty,
    /// Compact single-line format.
    Compact,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level used when neither `filter` nor `RUST_LOG` is set.
    pub level: Level,
    /// Output format.
    pub format: LogFormat,
    /// Include source file location.
    pub include_location: bool,
    /// Custom filter string (e.g., "wren_html=trace,wren_css=debug").
    pub filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            format: LogFormat::Compact,
            include_location: false,
            filter: None,
        }
    }
}

impl LogConfig {
    /// Create a debug configuration.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            level: Level::DEBUG,
            format: LogFormat::Pretty,
            include_location: true,
            ..Default::default()
        }
    }

    /// Create a trace configuration.
    #[must_use]
    pub fn trace() -> Self {
        Self {
            level: Level::TRACE,
            ..Self::debug()
        }
    }

    /// Set a custom filter.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Build the `EnvFilter`: explicit filter first, then `RUST_LOG`, then
    /// the configured level.
    fn env_filter(&self) -> EnvFilter {
        let fallback = || EnvFilter::new(self.level.to_string());
        match &self.filter {
            Some(custom) => EnvFilter::try_new(custom).unwrap_or_else(|_| fallback()),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback()),
        }
    }
}

/// Errors from installing the global subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// A global subscriber was already installed.
    #[error("failed to install tracing subscriber: {0}")]
    AlreadyInitialized(#[from] tracing_subscriber::util::TryInitError),
}

/// Install the global subscriber, failing if one is already set.
///
/// # Errors
///
/// Returns [`LoggingError::AlreadyInitialized`] if a global subscriber exists.
pub fn try_init_logging(config: &LogConfig) -> Result<(), LoggingError> {
    let filter = config.env_filter();

    match config.format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .with_target(true)
                .with_file(config.include_location)
                .with_line_number(config.include_location)
                .with_writer(std::io::stderr);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()?;
        }
        LogFormat::Compact => {
            let fmt_layer = fmt::layer()
                .compact()
                .with_target(true)
                .with_writer(std::io::stderr);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()?;
        }
    }
    Ok(())
}

/// Install the global subscriber, ignoring the case where one already exists.
pub fn init_logging(config: &LogConfig) {
    if let Err(err) = try_init_logging(config) {
        tracing::debug!("{err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_default() {
        let config = LogConfig::default();
        assert_eq!(config.level, Level::WARN);
        assert_eq!(config.format, LogFormat::Compact);
        assert!(!config.include_location);
    }

    #[test]
    fn test_log_config_debug() {
        let config = LogConfig::debug();
        assert_eq!(config.level, Level::DEBUG);
        assert!(config.include_location);
    }

    #[test]
    fn test_log_config_trace_keeps_debug_layout() {
        let config = LogConfig::trace();
        assert_eq!(config.level, Level::TRACE);
        assert_eq!(config.format, LogFormat::Pretty);
    }

    #[test]
    fn test_log_config_with_filter() {
        let config = LogConfig::default().with_filter("wren_html=trace");
        assert_eq!(config.filter, Some("wren_html=trace".to_string()));
    }
}
