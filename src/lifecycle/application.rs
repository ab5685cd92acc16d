//! The application lifecycle controller.
//!
//! # Responsibilities
//! - Load configuration and construct the logger
//! - Construct subsystems in dependency order
//! - Start them, wait for a termination signal or a fatal error
//! - Stop them in reverse order, each within a time budget
//!
//! # Design Decisions
//! - Fail fast: any initialization error is returned to the caller
//! - Subsystems start in order, not concurrently
//! - A subsystem that will not stop is logged and skipped
//! - Exiting the process is left to the entrypoint

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{ConfigService, EnvSource};
use crate::error::AppError;
use crate::http::HttpServer;
use crate::lifecycle::signals::shutdown_signal;
use crate::lifecycle::state::{LifecycleError, LifecycleState, StateHandle};
use crate::lifecycle::subsystem::{FatalReporter, Subsystem, SubsystemContext, SubsystemError};
use crate::observability::Logger;

/// Owns configuration, logger and subsystems for the life of the process.
pub struct Application {
    config: Arc<ConfigService>,
    logger: Logger,
    state: StateHandle,
    subsystems: Vec<Box<dyn Subsystem>>,
    /// Subsystems whose `start` succeeded, as a prefix of `subsystems`.
    started: usize,
    shutdown_timeout: Duration,
    shutdown_timeout_override: Option<Duration>,
    server_addr: Option<SocketAddr>,
}

impl Application {
    /// Application reading the process environment and `./.env`.
    pub fn new() -> Self {
        Self::with_config(ConfigService::from_process_env())
    }

    /// Application reading an injected environment, with no env file.
    pub fn with_env(env: Arc<dyn EnvSource>) -> Self {
        Self::with_config(ConfigService::new(env))
    }

    /// Application around a not yet loaded configuration service.
    ///
    /// Nothing is read until [`Application::initialize`].
    pub fn with_config(config: ConfigService) -> Self {
        Self {
            config: Arc::new(config),
            logger: Logger::bootstrap(),
            state: StateHandle::new(),
            subsystems: Vec::new(),
            started: 0,
            shutdown_timeout: Duration::ZERO,
            shutdown_timeout_override: None,
            server_addr: None,
        }
    }

    /// Use a fixed per-subsystem stop budget instead of the configured one.
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout_override = Some(timeout);
        self
    }

    /// Load configuration, build the logger and wire subsystems.
    pub async fn initialize(&mut self) -> Result<(), AppError> {
        let current = self.state.get();
        if current != LifecycleState::Uninitialized {
            return Err(LifecycleError::InvalidTransition {
                from: current,
                to: LifecycleState::Initialized,
            }
            .into());
        }

        let loading = Arc::make_mut(&mut self.config);
        self.logger.in_scope(|| loading.load_config());
        let config = Arc::clone(&self.config);

        let logger = Logger::from_config(config.log_config())?;
        if !logger.install() {
            tracing::debug!("Global subscriber already installed, keeping it");
        }
        self.logger = logger;

        tracing::info!(
            service = config.name(),
            db = ?config.db_config(),
            redis = ?config.redis_config(),
            server = ?config.server_config(),
            jaeger_agent = %config.jaeger_config().agent_endpoint(),
            env_file = ?config.env_file_status(),
            "Configuration loaded"
        );

        let server = HttpServer::bind(config.server_config())
            .await
            .map_err(|source| AppError::Subsystem {
                name: HttpServer::NAME,
                source,
            })?;
        let server_addr = server.local_addr();

        self.shutdown_timeout = self
            .shutdown_timeout_override
            .unwrap_or_else(|| Duration::from_secs(config.server_config().shutdown_timeout_secs));
        self.subsystems = vec![Box::new(server)];
        self.server_addr = Some(server_addr);
        self.state
            .transition(LifecycleState::Uninitialized, LifecycleState::Initialized)?;

        tracing::info!(
            subsystems = self.subsystems.len(),
            shutdown_timeout_ms = self.shutdown_timeout.as_millis() as u64,
            "Application initialized"
        );
        Ok(())
    }

    /// Add a subsystem; it starts after the built-in ones and stops before them.
    pub fn register(&mut self, subsystem: Box<dyn Subsystem>) -> Result<(), AppError> {
        let current = self.state.get();
        if current != LifecycleState::Initialized {
            return Err(LifecycleError::WrongState {
                operation: "register a subsystem",
                state: current,
            }
            .into());
        }
        tracing::debug!(subsystem = subsystem.name(), "Subsystem registered");
        self.subsystems.push(subsystem);
        Ok(())
    }

    /// Serve until SIGINT/SIGTERM or a fatal subsystem error.
    pub async fn run(&mut self) -> Result<(), AppError> {
        self.run_until(shutdown_signal()).await
    }

    /// Serve until `signal` resolves or a subsystem reports a fatal error.
    ///
    /// Always shuts down before returning. An error-triggered shutdown
    /// returns [`AppError::Runtime`].
    pub async fn run_until<F>(&mut self, signal: F) -> Result<(), AppError>
    where
        F: Future<Output = ()>,
    {
        match self.state.get() {
            LifecycleState::Uninitialized => return Err(LifecycleError::NotInitialized.into()),
            LifecycleState::Initialized => {}
            other => {
                return Err(LifecycleError::InvalidTransition {
                    from: other,
                    to: LifecycleState::Running,
                }
                .into())
            }
        }
        self.state
            .transition(LifecycleState::Initialized, LifecycleState::Running)?;

        let (fatal, mut fatal_rx) = FatalReporter::channel();
        let ctx = SubsystemContext {
            fatal,
            state: self.state.clone(),
        };

        let mut cause: Option<(&'static str, SubsystemError)> = None;
        for subsystem in &self.subsystems {
            let name = subsystem.name();
            match subsystem.start(ctx.clone()).await {
                Ok(()) => {
                    self.started += 1;
                    tracing::info!(subsystem = name, "Subsystem started");
                }
                Err(e) => {
                    tracing::error!(subsystem = name, error = %e, "Subsystem failed to start");
                    cause = Some((name, e));
                    break;
                }
            }
        }
        // Only subsystems hold reporters from here on.
        drop(ctx);

        if cause.is_none() {
            tracing::info!(subsystems = self.started, "Application running");
            tokio::pin!(signal);
            tokio::select! {
                _ = &mut signal => {
                    tracing::info!("Termination requested");
                }
                Some((name, error)) = fatal_rx.recv() => {
                    tracing::error!(subsystem = name, error = %error, "Fatal subsystem error");
                    cause = Some((name, error));
                }
            }
        }

        let shutdown = self.shutdown().await;
        match cause {
            Some((name, source)) => {
                if let Err(e) = shutdown {
                    tracing::error!(error = %e, "Shutdown after failure was incomplete");
                }
                Err(AppError::Runtime { name, source })
            }
            None => shutdown,
        }
    }

    /// Stop every started subsystem in reverse start order.
    ///
    /// A no-op once the application has stopped.
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        if self.state.get() == LifecycleState::Stopped {
            tracing::debug!("Shutdown already complete");
            return Ok(());
        }
        self.state
            .transition(LifecycleState::Running, LifecycleState::ShuttingDown)?;

        let budget = self.shutdown_timeout;
        tracing::info!(
            subsystems = self.started,
            timeout_ms = budget.as_millis() as u64,
            "Shutting down"
        );

        let mut failed = Vec::new();
        for subsystem in self.subsystems[..self.started].iter().rev() {
            let name = subsystem.name();
            match tokio::time::timeout(budget, subsystem.shutdown()).await {
                Ok(Ok(())) => tracing::info!(subsystem = name, "Subsystem stopped"),
                Ok(Err(e)) => {
                    tracing::error!(subsystem = name, error = %e, "Subsystem failed to stop");
                    failed.push(name);
                }
                Err(_) => {
                    tracing::warn!(
                        subsystem = name,
                        timeout_ms = budget.as_millis() as u64,
                        "Subsystem did not stop in time, skipping"
                    );
                    failed.push(name);
                }
            }
        }
        self.started = 0;

        self.state
            .transition(LifecycleState::ShuttingDown, LifecycleState::Stopped)?;
        tracing::info!("Shutdown complete");

        if failed.is_empty() {
            Ok(())
        } else {
            Err(AppError::Shutdown { failed })
        }
    }

    /// Logger for reporting, valid in every state.
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn config(&self) -> &Arc<ConfigService> {
        &self.config
    }

    pub fn state(&self) -> LifecycleState {
        self.state.get()
    }

    /// Address of the HTTP listener once initialized.
    pub fn server_addr(&self) -> Option<SocketAddr> {
        self.server_addr
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}
