//! Structured logging.
//!
//! # Responsibilities
//! - Build the tracing subscriber from `LogConfig`
//! - Install it as the process-wide default
//! - Report fatal conditions through the same subscriber
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development
//! - The filter comes only from `LogConfig`; the subscriber never reads
//!   the process environment itself

use std::fmt::Display;

use thiserror::Error;
use tracing::Dispatch;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

use crate::config::LogConfig;

/// Errors raised while constructing the logger.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log level directive: {0}")]
    Filter(#[from] ParseError),

    #[error("unknown log format '{0}', expected 'pretty' or 'json'")]
    UnknownFormat(String),
}

/// Output format of the fmt layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(LoggingError::UnknownFormat(other.to_string())),
        }
    }
}

/// Handle to a configured subscriber.
#[derive(Clone)]
pub struct Logger {
    dispatch: Dispatch,
}

impl Logger {
    /// Build a logger from configuration without installing it.
    pub fn from_config(config: &LogConfig) -> Result<Self, LoggingError> {
        let format: LogFormat = config.format.parse()?;
        let filter = EnvFilter::try_new(&config.level)?;
        Ok(Self::build(filter, format))
    }

    /// Logger used before configuration is available. Fixed at `info`.
    pub fn bootstrap() -> Self {
        Self::build(EnvFilter::new("info"), LogFormat::Pretty)
    }

    fn build(filter: EnvFilter, format: LogFormat) -> Self {
        let registry = Registry::default().with(filter);
        let dispatch = match format {
            LogFormat::Pretty => Dispatch::new(
                registry.with(tracing_subscriber::fmt::layer().with_target(true)),
            ),
            LogFormat::Json => Dispatch::new(
                registry.with(tracing_subscriber::fmt::layer().json().with_current_span(true)),
            ),
        };
        Self { dispatch }
    }

    /// Make this logger the global default.
    ///
    /// Returns `false` when a global subscriber was already installed, in
    /// which case events keep flowing to that one.
    pub fn install(&self) -> bool {
        tracing::dispatcher::set_global_default(self.dispatch.clone()).is_ok()
    }

    /// Run `f` with this logger as the thread's default subscriber.
    pub fn in_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Emit an error event flagged as fatal. The caller decides how to exit.
    pub fn fatal(&self, message: &str, error: &dyn Display) {
        self.in_scope(|| tracing::error!(fatal = true, error = %error, "{}", message));
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}
