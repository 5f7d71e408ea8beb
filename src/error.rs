//! Error types for config loading.
//!
//! The simulation itself never fails; degenerate bodies are culled silently.
//! Only turning an external config document into a [`crate::WorldConfig`] can.

use std::fmt;

/// Errors that can occur while parsing or validating a world config.
#[derive(Debug)]
pub enum ConfigError {
    /// The document is not valid JSON for the config schema.
    Parse(serde_json::Error),
    /// A value parsed but lies outside its allowed range.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "Failed to parse world config: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid world config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}
