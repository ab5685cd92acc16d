//! Build identification.
//!
//! The version comes from the package manifest. Commit and build date are
//! stamped at compile time through `BUILD_COMMIT` and `BUILD_DATE`.

use std::fmt;

use serde::Serialize;

use crate::config::SERVICE_NAME;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const COMMIT: &str = match option_env!("BUILD_COMMIT") {
    Some(commit) => commit,
    None => "none",
};

pub const BUILD_DATE: &str = match option_env!("BUILD_DATE") {
    Some(date) => date,
    None => "unknown",
};

/// Name, version, commit and build date of this binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub commit: &'static str,
    pub built: &'static str,
}

impl BuildInfo {
    pub const fn current() -> Self {
        Self {
            name: SERVICE_NAME,
            version: VERSION,
            commit: COMMIT,
            built: BUILD_DATE,
        }
    }
}

/// The three-line banner printed for `--version`.
impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.name, self.version)?;
        writeln!(f, "  commit: {}", self.commit)?;
        writeln!(f, "  built:  {}", self.built)
    }
}
