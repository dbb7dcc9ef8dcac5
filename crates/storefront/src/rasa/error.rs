//! Error types for the Rasa client.

use thiserror::Error;

/// Errors that can occur when talking to the Rasa server.
#[derive(Debug, Error)]
pub enum RasaError {
    /// The server could not be reached (connection refused, DNS, timeout).
    #[error("Rasa server unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Rasa server returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body (truncated).
        body: String,
    },

    /// Any other HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not the expected JSON.
    #[error("parse error: {0}")]
    Parse(String),
}

impl RasaError {
    /// Classify a transport error from reqwest.
    #[must_use]
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Self::Unreachable(err)
        } else {
            Self::Http(err)
        }
    }

    /// Upstream status code, if the server answered.
    #[must_use]
    pub const fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server could not be reached at all.
    #[must_use]
    pub const fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable(_))
    }
}
