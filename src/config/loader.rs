//! Configuration loading from the environment.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use crate::config::env::{load_env_file, EnvFileStatus, EnvSource, ProcessEnv};
use crate::config::schema::{DbConfig, JaegerConfig, LogConfig, RedisConfig, ServerConfig};

/// Name the service reports in logs and version output.
pub const SERVICE_NAME: &str = "rest-api-template";

/// Env file looked up in the working directory by default.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Every group, resolved together so a load is all-or-nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Groups {
    db: DbConfig,
    redis: RedisConfig,
    server: ServerConfig,
    jaeger: JaegerConfig,
    log: LogConfig,
}

/// Holds the typed configuration groups of the application.
///
/// Constructed empty; [`ConfigService::load_config`] fills every group from
/// the environment. Accessors return zero values until then.
#[derive(Clone)]
pub struct ConfigService {
    name: String,
    env: Arc<dyn EnvSource>,
    env_file: Option<PathBuf>,
    env_file_status: Option<EnvFileStatus>,
    groups: Groups,
    loaded: bool,
}

impl ConfigService {
    /// Service reading an injected environment, with no env file.
    pub fn new(env: Arc<dyn EnvSource>) -> Self {
        Self {
            name: SERVICE_NAME.to_string(),
            env,
            env_file: None,
            env_file_status: None,
            groups: Groups::default(),
            loaded: false,
        }
    }

    /// Service reading the process environment after an optional `.env`.
    pub fn from_process_env() -> Self {
        Self::new(Arc::new(ProcessEnv)).with_env_file(DEFAULT_ENV_FILE)
    }

    /// Load `path` into the process environment before resolving keys.
    pub fn with_env_file(mut self, path: impl AsRef<Path>) -> Self {
        self.env_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Initialize the configuration. Same as [`ConfigService::load_config`].
    pub fn init(&mut self) {
        self.load_config();
    }

    /// Resolve all groups from the environment.
    ///
    /// Every key falls back to a fixed default, so this cannot fail. Integer
    /// settings that do not parse resolve to `0`. `RUST_LOG`, when set,
    /// takes precedence over `LOG_LEVEL`.
    pub fn load_config(&mut self) {
        self.env_file_status = self.env_file.as_deref().map(load_env_file);

        let resolver = Resolver {
            env: self.env.as_ref(),
        };

        let groups = Groups {
            db: DbConfig {
                host: resolver.string("DB_HOST", "localhost"),
                port: resolver.string("DB_PORT", "3306"),
                user: resolver.string("DB_USER", "user"),
                password: resolver.string("DB_PASSWORD", "password"),
                name: resolver.string("DB_NAME", "mydatabase"),
            },
            redis: RedisConfig {
                host: resolver.string("REDIS_HOST", "localhost"),
                port: resolver.string("REDIS_PORT", "6379"),
                password: resolver.string("REDIS_PASSWORD", ""),
                db: resolver.integer("REDIS_DB", 0),
            },
            server: ServerConfig {
                address: resolver.string("SERVER_ADDR", ""),
                port: resolver.string("SERVER_PORT", "8080"),
                shutdown_timeout_secs: resolver.integer("SERVER_SHUTDOWN_TIMEOUT", 10),
            },
            jaeger: JaegerConfig {
                agent_host: resolver.string("JAEGER_AGENT_HOST", "localhost"),
                agent_port: resolver.string("JAEGER_AGENT_PORT", "6831"),
            },
            log: LogConfig {
                level: resolver
                    .env
                    .get("RUST_LOG")
                    .unwrap_or_else(|| resolver.string("LOG_LEVEL", "info")),
                format: resolver.string("LOG_FORMAT", "pretty"),
            },
        };

        self.groups = groups;
        self.loaded = true;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Outcome of the env file lookup of the last load, if one is configured.
    pub fn env_file_status(&self) -> Option<EnvFileStatus> {
        self.env_file_status
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn db_config(&self) -> &DbConfig {
        &self.groups.db
    }

    pub fn redis_config(&self) -> &RedisConfig {
        &self.groups.redis
    }

    pub fn server_config(&self) -> &ServerConfig {
        &self.groups.server
    }

    pub fn jaeger_config(&self) -> &JaegerConfig {
        &self.groups.jaeger
    }

    pub fn log_config(&self) -> &LogConfig {
        &self.groups.log
    }
}

impl std::fmt::Debug for ConfigService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigService")
            .field("name", &self.name)
            .field("env_file", &self.env_file)
            .field("env_file_status", &self.env_file_status)
            .field("loaded", &self.loaded)
            .field("db", &self.groups.db)
            .field("redis", &self.groups.redis)
            .field("server", &self.groups.server)
            .field("jaeger", &self.groups.jaeger)
            .field("log", &self.groups.log)
            .finish()
    }
}

/// Per-key lookup with defaulting.
struct Resolver<'a> {
    env: &'a dyn EnvSource,
}

impl Resolver<'_> {
    /// The variable's value when set (even if empty), else `default`.
    fn string(&self, key: &str, default: &str) -> String {
        self.env.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Integer variant of [`Resolver::string`]. Malformed values become zero.
    fn integer<T>(&self, key: &str, default: T) -> T
    where
        T: FromStr + Default,
    {
        match self.env.get(key) {
            None => default,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(key, value = %raw, "Malformed integer setting, using 0");
                T::default()
            }),
        }
    }
}
