//! Failure taxonomy of remote API calls.

use std::collections::BTreeMap;
use thiserror::Error;

/// Field name → messages reported by the server on a 422 response.
pub type ServerFieldErrors = BTreeMap<String, Vec<String>>;

/// Errors returned by [`EventsApi`](super::EventsApi) and [`ContactApi`](super::ContactApi).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server rejected the payload (HTTP 422).
    #[error("validation failed ({} field(s))", errors.len())]
    Validation {
        /// Per-field messages; may name fields the client does not know.
        errors: ServerFieldErrors,
        /// Optional top-level message from the body.
        message: Option<String>,
    },

    /// Too many requests (HTTP 429).
    #[error("rate limited by server")]
    RateLimited,

    /// Any other non-success status.
    #[error("request failed with status {status}")]
    Status {
        status: u16,
        /// Top-level `message` from the body, when the server sent one.
        message: Option<String>,
    },

    /// The request never produced a response (connection, DNS, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// A success response whose body did not match the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status behind this error, if a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Validation { .. } => Some(422),
            Self::RateLimited => Some(429),
            Self::Status { status, .. } => Some(*status),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }

    /// Best human-readable message the server supplied, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Validation { message, .. } | Self::Status { message, .. } => message.as_deref(),
            Self::RateLimited | Self::Transport(_) | Self::Decode(_) => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Transport(error.to_string())
        }
    }
}
