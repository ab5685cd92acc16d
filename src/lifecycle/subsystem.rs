//! Subsystems started and stopped by the application.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::lifecycle::state::StateHandle;

/// Failure inside a subsystem.
#[derive(Debug, Error)]
pub enum SubsystemError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("subsystem '{0}' was already started")]
    AlreadyStarted(&'static str),

    #[error("serve loop failed: {0}")]
    Serve(#[source] std::io::Error),

    #[error("subsystem '{0}' stopped unexpectedly")]
    Stopped(&'static str),

    #[error("{0}")]
    Failed(String),
}

/// Channel through which running subsystems surface unrecoverable errors.
#[derive(Debug, Clone)]
pub struct FatalReporter {
    tx: mpsc::Sender<(&'static str, SubsystemError)>,
}

impl FatalReporter {
    pub(crate) fn channel() -> (Self, mpsc::Receiver<(&'static str, SubsystemError)>) {
        let (tx, rx) = mpsc::channel(8);
        (Self { tx }, rx)
    }

    /// Ask the application to shut down because `subsystem` failed.
    pub async fn report(&self, subsystem: &'static str, error: SubsystemError) {
        if self.tx.send((subsystem, error)).await.is_err() {
            tracing::debug!(subsystem, "Fatal error reported after run loop exited");
        }
    }
}

/// What a subsystem receives when it is started.
#[derive(Debug, Clone)]
pub struct SubsystemContext {
    pub fatal: FatalReporter,
    pub state: StateHandle,
}

/// A long-lived component owned by the application.
///
/// `start` must return once the subsystem is running (background work goes in
/// spawned tasks) and must refuse to start twice. `shutdown` is only called on
/// subsystems whose `start` succeeded.
#[async_trait]
pub trait Subsystem: Send + Sync {
    fn name(&self) -> &'static str;

    async fn start(&self, ctx: SubsystemContext) -> Result<(), SubsystemError>;

    async fn shutdown(&self) -> Result<(), SubsystemError>;
}
