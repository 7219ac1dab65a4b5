//! Error types for the execution engine
//!
//! Provides error handling for:
//! - Transport failures (connection, timeout, non-2xx status)
//! - Engine operations, which surface transport errors unmodified
//! - Configuration loading

use std::path::PathBuf;

/// Errors from sending one request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Connection could not be established or was lost
    #[error("connection failed: {0}")]
    Connection(String),

    /// No response within the configured timeout
    #[error("request timed out")]
    Timeout,

    /// Server answered with a non-2xx status
    #[error("HTTP {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Server-provided detail, possibly empty
        message: String,
    },

    /// Response body was not valid JSON
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl TransportError {
    /// Create status error
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// HTTP status, for status errors
    #[inline]
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if retrying the same request may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Connection(_) | Self::Timeout => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Decode(_) => false,
        }
    }
}

/// Main engine error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Request failed; nothing was merged
    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),
}

impl EngineError {
    /// HTTP status of the failed request, if the server answered
    ///
    /// Lets callers tell "not found" (404) and "not authorized" (401/403)
    /// apart from other failures.
    #[inline]
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(e) => e.status_code(),
        }
    }

    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_retryable(),
        }
    }

    /// Check for a 404 answer
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Check for a 401 or 403 answer
    #[inline]
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}

/// Errors while loading [`CacheConfig`](crate::CacheConfig)
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

    /// File is not valid TOML for this config
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("invalid config value: {0}")]
    Invalid(String),
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
