//! Configuration group definitions.
//!
//! Each group is a flat set of settings resolved from the environment. The
//! `Default` impls are zero values (what a group holds before loading); the
//! documented fallbacks live in `loader.rs`.

use std::fmt;

use serde::{Deserialize, Serialize};

const REDACTED: &str = "***";

/// Relational database connection settings.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DbConfig {
    pub host: String,
    pub port: String,
    pub user: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub name: String,
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &REDACTED)
            .field("name", &self.name)
            .finish()
    }
}

/// Redis cache settings.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RedisConfig {
    pub host: String,
    pub port: String,
    #[serde(skip_serializing)]
    pub password: String,
    /// Logical database index.
    pub db: i64,
}

impl fmt::Debug for RedisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = if self.password.is_empty() { "" } else { REDACTED };
        f.debug_struct("RedisConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &password)
            .field("db", &self.db)
            .finish()
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind. Empty means all interfaces.
    pub address: String,
    pub port: String,
    /// Budget for stopping each subsystem during shutdown.
    pub shutdown_timeout_secs: u64,
}

impl ServerConfig {
    /// `address:port`, with an empty address bound to `0.0.0.0`.
    pub fn bind_address(&self) -> String {
        let host = if self.address.is_empty() {
            "0.0.0.0"
        } else {
            self.address.as_str()
        };
        format!("{}:{}", host, self.port)
    }
}

/// Jaeger agent settings for distributed tracing export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct JaegerConfig {
    pub agent_host: String,
    pub agent_port: String,
}

impl JaegerConfig {
    pub fn agent_endpoint(&self) -> String {
        format!("{}:{}", self.agent_host, self.agent_port)
    }
}

/// Log output settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `rest_api_template=debug`.
    pub level: String,
    /// `pretty` or `json`.
    pub format: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_values_before_load() {
        let db = DbConfig::default();
        assert!(db.host.is_empty());
        assert!(db.port.is_empty());
        assert_eq!(RedisConfig::default().db, 0);
        assert_eq!(ServerConfig::default().shutdown_timeout_secs, 0);
    }

    #[test]
    fn test_debug_redacts_passwords() {
        let db = DbConfig {
            password: "hunter2".into(),
            ..Default::default()
        };
        let printed = format!("{:?}", db);
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains(REDACTED));

        let redis = RedisConfig {
            password: "s3cret".into(),
            ..Default::default()
        };
        assert!(!format!("{:?}", redis).contains("s3cret"));
    }

    #[test]
    fn test_serialized_groups_omit_passwords() {
        let db = DbConfig {
            host: "localhost".into(),
            password: "hunter2".into(),
            ..Default::default()
        };
        let json = serde_json::to_string(&db).unwrap();
        assert!(json.contains("localhost"));
        assert!(!json.contains("hunter2"));
    }

    #[test]
    fn test_bind_address() {
        let mut server = ServerConfig {
            address: String::new(),
            port: "8080".into(),
            shutdown_timeout_secs: 10,
        };
        assert_eq!(server.bind_address(), "0.0.0.0:8080");
        server.address = "127.0.0.1".into();
        assert_eq!(server.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_agent_endpoint() {
        let jaeger = JaegerConfig {
            agent_host: "localhost".into(),
            agent_port: "6831".into(),
        };
        assert_eq!(jaeger.agent_endpoint(), "localhost:6831");
    }
}
