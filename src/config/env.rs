//! Environment sources for configuration resolution.
//!
//! The configuration service never reads `std::env` directly. It asks an
//! [`EnvSource`], so tests can run several configurations side by side
//! without touching the process environment.

use std::collections::HashMap;
use std::path::Path;

/// A read-only view of key/value environment settings.
pub trait EnvSource: Send + Sync {
    /// Look up a variable. `None` means unset.
    fn get(&self, key: &str) -> Option<String>;
}

/// The real process environment.
///
/// Values that are not valid UTF-8 are reported as unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// An in-memory environment.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) {
        self.vars.remove(key);
    }
}

impl<K, V> FromIterator<(K, V)> for MapEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl EnvSource for MapEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Result of trying to load an env file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvFileStatus {
    /// The file was read and its variables exported.
    Loaded,
    /// No file at the given path.
    Missing,
    /// The file exists but could not be parsed or read.
    Invalid,
}

/// Export the `KEY=value` pairs of an env file into the process environment.
///
/// Variables that are already set are left untouched. A missing or broken
/// file is not an error; the status is returned and logged.
pub fn load_env_file(path: &Path) -> EnvFileStatus {
    match dotenvy::from_path(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "Loaded env file");
            EnvFileStatus::Loaded
        }
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No env file present, skipping");
            EnvFileStatus::Missing
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Ignoring unreadable env file"
            );
            EnvFileStatus::Invalid
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_env_lookup() {
        let mut env = MapEnv::new().with("DB_HOST", "db.internal");
        assert_eq!(env.get("DB_HOST").as_deref(), Some("db.internal"));
        assert_eq!(env.get("DB_PORT"), None);

        env.remove("DB_HOST");
        assert_eq!(env.get("DB_HOST"), None);
    }

    #[test]
    fn test_map_env_keeps_empty_values() {
        let env: MapEnv = [("SERVER_ADDR", "")].into_iter().collect();
        assert_eq!(env.get("SERVER_ADDR").as_deref(), Some(""));
    }

    #[test]
    fn test_missing_env_file_is_not_an_error() {
        let path = std::env::temp_dir().join("rest-api-template-definitely-missing.env");
        assert_eq!(load_env_file(&path), EnvFileStatus::Missing);
    }
}
