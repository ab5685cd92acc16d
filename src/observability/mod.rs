//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events and spans (structured fields)
//!     → logging.rs subscriber (EnvFilter + fmt layer)
//!     → stdout (pretty or JSON lines)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows through HTTP spans
//! - The Jaeger agent endpoint is configuration only; no exporter is wired

pub mod logging;

pub use logging::{LogFormat, Logger, LoggingError};
