//! Error types for the aviation client
//!
//! - Transport failures (network, non-2xx, undecodable body)
//! - Configuration failures (missing key, unreadable config file)
//!
//! Per-item validation failures never surface here; see
//! [`aero_model::ValidationError`].

use crate::config::API_KEY_ENV;
use std::path::PathBuf;

/// Errors talking to the upstream service
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection, TLS or timeout failure
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("upstream returned {status} for {path}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Endpoint path (query omitted, it carries the API key)
        path: String,
    },

    /// Body was not valid JSON
    #[error("invalid JSON from upstream: {0}")]
    Decode(#[from] serde_json::Error),
}

impl TransportError {
    /// Create status error for path
    pub fn status(status: u16, path: impl Into<String>) -> Self {
        Self::Status {
            status,
            path: path.into(),
        }
    }
}

/// Errors loading client configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`ClientConfig`](crate::ClientConfig)
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Main client error type
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No API key configured
    #[error("OpenAIP API key is not configured (set {})", API_KEY_ENV)]
    MissingApiKey,

    /// Upstream failed and nothing was cached
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// Check if error is a configuration problem (not worth retrying)
    #[inline]
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingApiKey | Self::Config(_))
    }

    /// Check if error came from the network path
    #[inline]
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
