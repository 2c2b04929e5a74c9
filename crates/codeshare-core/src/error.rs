//! Error types for codeshare-core

use std::time::Duration;

use thiserror::Error;

use crate::retry::RetryError;
use crate::store::StoreError;

/// Result type alias using codeshare-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for codeshare
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration format
    #[error("Invalid configuration format: {message}")]
    InvalidConfig { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snippet identifier is empty or contains characters not allowed in a link
    #[error("Invalid snippet id: {id:?}")]
    InvalidSnippetId { id: String },

    /// Share origin or link could not be parsed
    #[error("Invalid share link {link}: {message}")]
    InvalidLink { link: String, message: String },

    /// The editor was not installed within the allowed wait
    #[error("Editor not ready after {}ms", .waited.as_millis())]
    EditorNotReady { waited: Duration },

    /// A share or load is already running in this session
    #[error("Another operation is already in progress")]
    Busy,

    /// Saving a snippet failed after all retries
    #[error("{message}")]
    ShareFailed {
        message: String,
        #[source]
        source: RetryError<StoreError>,
    },

    /// Loading a snippet failed after all retries
    #[error("{message}")]
    LoadFailed {
        message: String,
        #[source]
        source: RetryError<StoreError>,
    },
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an invalid snippet id error
    pub fn invalid_snippet_id(id: impl Into<String>) -> Self {
        Self::InvalidSnippetId { id: id.into() }
    }

    /// Create an invalid link error
    pub fn invalid_link(link: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidLink {
            link: link.into(),
            message: message.into(),
        }
    }

    /// The underlying retry failure, if this error came from the remote store
    pub fn retry_error(&self) -> Option<&RetryError<StoreError>> {
        match self {
            Self::ShareFailed { source, .. } | Self::LoadFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}
