//! HTTP serving subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup)
//!     → request ID assigned and propagated (x-request-id)
//!     → trace span per request
//!     → /health or /version handler
//! ```

pub mod server;

pub use server::{HttpServer, X_REQUEST_ID};
