//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Initialize (application.rs):
//!     Load config → Build logger → Bind listeners → Initialized
//!
//! Run (application.rs):
//!     Start subsystems in order → Running
//!     → wait for signals.rs (SIGINT/SIGTERM) or a fatal subsystem error
//!
//! Shutdown (application.rs, shutdown.rs):
//!     ShuttingDown → stop subsystems in reverse order, each with a timeout
//!     → Stopped
//! ```
//!
//! # Design Decisions
//! - The state machine (state.rs) rejects skipped or repeated transitions
//! - Shutdown is idempotent and best-effort
//! - Shutdown has timeout: a stuck subsystem is skipped, not awaited forever

pub mod application;
pub mod shutdown;
pub mod signals;
pub mod state;
pub mod subsystem;

pub use application::Application;
pub use shutdown::Shutdown;
pub use signals::shutdown_signal;
pub use state::{LifecycleError, LifecycleState, StateHandle};
pub use subsystem::{FatalReporter, Subsystem, SubsystemContext, SubsystemError};
