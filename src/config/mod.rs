//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! .env file (optional, never overrides)
//!     → process environment
//!     → env.rs (EnvSource lookup)
//!     → loader.rs (per-key resolution with defaults)
//!     → schema.rs groups (db, redis, server, jaeger, log)
//!     → ConfigService (immutable, shared via Arc)
//! ```
//!
//! # Design Decisions
//! - Every setting has a default; loading never fails
//! - Malformed integers resolve to zero instead of failing startup
//! - The environment is injected so tests need not mutate process state

pub mod env;
pub mod loader;
pub mod schema;

pub use env::{load_env_file, EnvFileStatus, EnvSource, MapEnv, ProcessEnv};
pub use loader::{ConfigService, DEFAULT_ENV_FILE, SERVICE_NAME};
pub use schema::{DbConfig, JaegerConfig, LogConfig, RedisConfig, ServerConfig};
