//! REST API service bootstrap.
//!
//! # Architecture Overview
//!
//! ```text
//!   main.rs ──▶ cli ──(--version)──▶ version::BuildInfo ──▶ stdout, exit 0
//!      │
//!      ▼
//!   bootstrap::execute
//!      │
//!      ▼
//!   lifecycle::Application
//!      ├── initialize: config::ConfigService ─▶ observability::Logger ─▶ http::HttpServer::bind
//!      ├── run:        start subsystems ─▶ wait (signal | fatal error)
//!      └── shutdown:   stop subsystems in reverse order, bounded per subsystem
//! ```

pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod version;

pub use config::ConfigService;
pub use error::AppError;
pub use http::HttpServer;
pub use lifecycle::{Application, LifecycleState, Shutdown};
