//! Error types for actions, persistence, and configuration.

use std::path::PathBuf;

use game_rules::ComponentError;
use thiserror::Error;

/// Outcome of an action that did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The action cannot be performed in the current game state. The reason
    /// is narrated to the player and the turn is not spent.
    #[error("{0}")]
    Impossible(String),
    /// The entity/component graph was misused by the caller.
    #[error(transparent)]
    Component(#[from] ComponentError),
}

impl ActionError {
    pub fn impossible(reason: impl Into<String>) -> Self {
        Self::Impossible(reason.into())
    }

    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Impossible(_))
    }
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save file i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("save data could not be encoded: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("save data is inconsistent: {0}")]
    Invalid(#[from] ComponentError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
