//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Bind the listener during initialization (fail fast on bad address)
//! - Create the Axum Router with service endpoints
//! - Wire up middleware (tracing, timeout, request ID)
//! - Serve until the lifecycle asks it to stop
//! - Report an unexpected end of the serve loop as fatal

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::{AbortHandle, JoinHandle};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::lifecycle::{
    LifecycleState, Shutdown, StateHandle, Subsystem, SubsystemContext, SubsystemError,
};
use crate::version::BuildInfo;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Default per-request time limit.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// State injected into handlers.
#[derive(Clone)]
struct AppState {
    lifecycle: StateHandle,
    build: BuildInfo,
}

#[derive(Debug, Serialize)]
struct HealthStatus {
    status: &'static str,
    state: &'static str,
}

/// The serving subsystem.
pub struct HttpServer {
    local_addr: SocketAddr,
    listener: Mutex<Option<TcpListener>>,
    request_timeout: Duration,
    shutdown: Shutdown,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl HttpServer {
    pub const NAME: &'static str = "http";

    /// Bind the configured address. Serving starts in [`Subsystem::start`].
    pub async fn bind(config: &ServerConfig) -> Result<Self, SubsystemError> {
        let address = config.bind_address();
        let listener = TcpListener::bind(address.as_str())
            .await
            .map_err(|source| SubsystemError::Bind {
                address: address.clone(),
                source,
            })?;
        let local_addr = listener.local_addr().map_err(|source| SubsystemError::Bind {
            address: address.clone(),
            source,
        })?;

        tracing::debug!(address = %local_addr, "HTTP listener bound");

        Ok(Self {
            local_addr,
            listener: Mutex::new(Some(listener)),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            shutdown: Shutdown::new(),
            task: Mutex::new(None),
        })
    }

    /// Address actually bound (resolves port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState, request_timeout: Duration) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(X_REQUEST_ID)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown");
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        request_id = %request_id,
                    )
                }),
            )
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TimeoutLayer::new(request_timeout));

        Router::new()
            .route("/health", get(health_handler))
            .route("/version", get(version_handler))
            .with_state(state)
            .layer(middleware)
    }
}

#[async_trait]
impl Subsystem for HttpServer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn start(&self, ctx: SubsystemContext) -> Result<(), SubsystemError> {
        let listener = self
            .listener
            .lock()
            .await
            .take()
            .ok_or(SubsystemError::AlreadyStarted(Self::NAME))?;

        let state = AppState {
            lifecycle: ctx.state.clone(),
            build: BuildInfo::current(),
        };
        let router = Self::build_router(state, self.request_timeout);

        let stop = self.shutdown.clone();
        let stop_requested = self.shutdown.clone();
        let fatal = ctx.fatal;

        let handle = tokio::spawn(async move {
            let result = axum::serve(listener, router)
                .with_graceful_shutdown(async move { stop.wait().await })
                .await;

            match result {
                Ok(()) if stop_requested.is_triggered() => {
                    tracing::info!("HTTP server stopped");
                }
                Ok(()) => {
                    fatal
                        .report(HttpServer::NAME, SubsystemError::Stopped(HttpServer::NAME))
                        .await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "HTTP server failed");
                    fatal.report(HttpServer::NAME, SubsystemError::Serve(e)).await;
                }
            }
        });
        *self.task.lock().await = Some(handle);

        tracing::info!(address = %self.local_addr, "HTTP server starting");
        Ok(())
    }

    async fn shutdown(&self) -> Result<(), SubsystemError> {
        self.shutdown.trigger();

        let handle = self.task.lock().await.take();
        match handle {
            Some(handle) => join_serve_task(handle).await,
            None => Ok(()),
        }
    }
}

/// Aborts the serve task unless disarmed.
struct AbortOnDrop {
    handle: AbortHandle,
    armed: bool,
}

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        if self.armed {
            self.handle.abort();
            tracing::warn!("HTTP server did not stop in time, task aborted");
        }
    }
}

/// Wait for the serve task to finish.
///
/// Dropping this future (the stop budget ran out) aborts the task instead
/// of leaving it running detached.
async fn join_serve_task(handle: JoinHandle<()>) -> Result<(), SubsystemError> {
    let mut guard = AbortOnDrop {
        handle: handle.abort_handle(),
        armed: true,
    };
    let result = handle.await;
    guard.armed = false;
    result.map_err(|e| SubsystemError::Failed(format!("HTTP server task aborted: {e}")))
}

/// Liveness: 200 while running, 503 otherwise.
async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let current = state.lifecycle.get();
    if current == LifecycleState::Running {
        (
            StatusCode::OK,
            Json(HealthStatus {
                status: "ok",
                state: current.as_str(),
            }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthStatus {
                status: "unavailable",
                state: current.as_str(),
            }),
        )
    }
}

async fn version_handler(State(state): State<AppState>) -> Json<BuildInfo> {
    Json(state.build)
}
