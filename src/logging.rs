//! Logging setup
//!
//! The library only emits `tracing` events; installing a subscriber is left to
//! the binary. `SLOT_LOG` takes precedence over the configured level and
//! accepts full `EnvFilter` directives (e.g. `slot_context::context=trace`).

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Environment variable holding filter directives
pub const LOG_ENV: &str = "SLOT_LOG";

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("invalid log directive '{directive}': {message}")]
    InvalidDirective { directive: String, message: String },
    #[error("failed to install log subscriber: {0}")]
    Init(String),
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    pub level: String,
    /// Colored output
    pub color: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            color: true,
        }
    }
}

impl LoggingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }
}

/// Install a stderr subscriber for the process
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = build_env_filter(config)?;
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(config.color);

    Registry::default()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))
}

/// Build the filter from `SLOT_LOG`, falling back to the configured level
fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return Ok(filter);
    }
    parse_filter(&config.level)
}

fn parse_filter(directive: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(directive).map_err(|e| LoggingError::InvalidDirective {
        directive: directive.to_string(),
        message: e.to_string(),
    })
}
