//! Error types for remote reads.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while reading from the conflict-events API.
///
/// Cloneable so one outcome can be handed to every caller waiting on a shared read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Transport-level failure (DNS, connection refused, TLS, reset).
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Reason phrase or body excerpt.
        message: String,
    },

    /// The body could not be parsed into the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The read did not finish within the allowed time.
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A required setting is missing; detected before any request is issued.
    #[error("not configured: {0}")]
    NotConfigured(String),
}

impl ApiError {
    /// Short message suitable for rendering inline next to the affected view.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Network(_) => "Could not reach the events API. Check your connection.",
            Self::Status { .. } => "The events API returned an error.",
            Self::Decode(_) => "The events API sent data in an unexpected format.",
            Self::Timeout(_) => "The events API took too long to respond.",
            Self::NotFound(_) => "The requested record was not found.",
            Self::NotConfigured(_) => "The events API is not configured.",
        }
    }

    /// Whether a manual retry has a chance of succeeding.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Decode(_) | Self::NotFound(_) | Self::NotConfigured(_) => false,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(Duration::ZERO)
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            Self::Network(err.to_string())
        }
    }
}
