//! Error types for the dynamic DNS updater
//!
//! Every step of a run maps its failures onto one of these variants. The
//! engine stops at the first error; nothing is retried.

use thiserror::Error;

/// Result type alias for updater operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the updater
#[derive(Error, Debug)]
pub enum Error {
    /// Credentials file missing, unreadable or malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level failure reaching the IP-echo service or the provider
    #[error("Network error: {0}")]
    Network(String),

    /// The IP-echo service answered with a non-success status
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Local cache file read/write failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid runtime settings
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create an upstream error
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    /// Create an I/O error that keeps the path in its message
    pub fn io(path: &std::path::Path, action: &str, err: std::io::Error) -> Self {
        Self::Io(std::io::Error::new(
            err.kind(),
            format!("{} '{}': {}", action, path.display(), err),
        ))
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether this error came from the credentials file
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Whether this error is a transport failure
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Whether this error is a non-success answer from the IP-echo service
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream(_))
    }

    /// Whether this error is a local file failure
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
