//! Unified error types for Daybell.

use thiserror::Error;

/// Result type alias using DaybellError.
pub type Result<T> = std::result::Result<T, DaybellError>;

#[derive(Error, Debug)]
pub enum DaybellError {
    // Source errors
    #[error("Provider error ({source_name}): {message}")]
    Provider { source_name: String, message: String },

    #[error("Not authenticated: {0}")]
    Auth(String),

    // Sink errors
    #[error("Delivery error: {0}")]
    Delivery(String),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("{0}")]
    Other(String),
}

impl DaybellError {
    pub fn provider(source_name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Provider {
            source_name: source_name.into(),
            message: msg.into(),
        }
    }

    pub fn delivery(msg: impl Into<String>) -> Self {
        Self::Delivery(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Re-tag any error as a failure of the named source.
    ///
    /// Adapters use this so the orchestrator always sees which source broke,
    /// whether the cause was auth, transport or decoding.
    pub fn from_source(source_name: &str, err: DaybellError) -> Self {
        match err {
            already @ DaybellError::Provider { .. } => already,
            other => Self::provider(source_name, other.to_string()),
        }
    }
}
