//! HTTP Client error types.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Result type for HTTP client operations.
pub type Result<T> = std::result::Result<T, HttpClientError>;

/// Boxed codec error kept as the source of [`HttpClientError::Decode`]
/// and [`HttpClientError::Encode`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Exchange phase a locally enforced timeout fired in.
///
/// Connect and idle-read timeouts are enforced by reqwest itself and
/// surface as [`HttpClientError::Transport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutPhase {
    /// Waiting for response headers.
    Response,
    /// No outbound progress within the idle window.
    Write,
}

impl fmt::Display for TimeoutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Response => "response",
            Self::Write => "write",
        };
        f.write_str(name)
    }
}

/// HTTP client errors.
#[derive(Debug, Error)]
pub enum HttpClientError {
    /// The server answered with a 4xx or 5xx status.
    #[error("{message}")]
    RequestFailed {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// A timeout enforced by this crate fired.
    #[error("{phase} timeout after {after:?}")]
    Timeout {
        /// Phase the timeout fired in.
        phase: TimeoutPhase,
        /// Configured window.
        after: Duration,
    },

    /// Underlying transport error.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body could not be decoded into the requested type.
    #[error("Decode error: {0}")]
    Decode(#[source] BoxError),

    /// Request body could not be encoded.
    #[error("Encode error: {0}")]
    Encode(#[source] BoxError),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Header name or value rejected.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Client could not be constructed from its configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl HttpClientError {
    /// Check if this is a timeout error, whichever layer enforced it.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. }) || matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// Check if this is a connection error.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_connect())
    }

    /// Check if this failure came from status classification.
    pub fn is_request_failed(&self) -> bool {
        matches!(self, Self::RequestFailed { .. })
    }

    /// Get the HTTP status code if this is a classified failure.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for HttpClientError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(Box::new(e))
    }
}

impl From<http::header::InvalidHeaderValue> for HttpClientError {
    fn from(e: http::header::InvalidHeaderValue) -> Self {
        Self::InvalidHeader(e.to_string())
    }
}
