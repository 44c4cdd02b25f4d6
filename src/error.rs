//! Configuration error types
//!
//! The simulation itself has no failure path; only loading and validating
//! arena options can fail.

use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    /// Options file could not be read
    Io {
        path: String,
        source: std::io::Error,
    },

    /// Options text is not valid JSON for [`crate::ArenaOptions`]
    Parse(serde_json::Error),

    /// An option value is outside its usable range
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read options file '{}': {}", path, source)
            }
            ConfigError::Parse(e) => write!(f, "invalid options JSON: {}", e),
            ConfigError::Invalid { field, reason } => {
                write!(f, "option '{}' is invalid: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
