//! Application-level errors.

use thiserror::Error;

use crate::lifecycle::{LifecycleError, SubsystemError};
use crate::observability::LoggingError;

/// Everything `initialize`, `run` and `shutdown` can fail with.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("failed to construct logger: {0}")]
    Logger(#[from] LoggingError),

    #[error("failed to initialize subsystem '{name}': {source}")]
    Subsystem {
        name: &'static str,
        #[source]
        source: SubsystemError,
    },

    #[error("subsystem '{name}' failed: {source}")]
    Runtime {
        name: &'static str,
        #[source]
        source: SubsystemError,
    },

    #[error("shutdown incomplete, subsystems not stopped cleanly: {}", .failed.join(", "))]
    Shutdown { failed: Vec<&'static str> },
}
