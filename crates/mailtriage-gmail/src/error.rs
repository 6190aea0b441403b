//! Error types for Gmail API calls.

use serde::Deserialize;

/// Result type alias for Gmail operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Gmail reasons that signal a quota or rate limit rather than a real failure.
const RATE_LIMIT_REASONS: &[&str] = &["rateLimitExceeded", "userRateLimitExceeded"];

/// Errors returned by [`crate::GmailClient`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport failure, timeout, or undecodable response body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Gmail API error {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// First `errors[].reason`, when the body carried one.
        reason: Option<String>,
        /// Server-provided message or raw body.
        message: String,
    },
}

impl Error {
    /// Builds an [`Error::Api`] from a status code and the raw response body.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => Self::Api {
                status,
                reason: envelope.error.errors.into_iter().find_map(|e| e.reason),
                message: envelope.error.message,
            },
            Err(_) => Self::Api {
                status,
                reason: None,
                message: body.trim().to_string(),
            },
        }
    }

    /// HTTP status of an API error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(_) => None,
        }
    }

    /// True for HTTP 429, and for 403 responses Gmail tags as rate limiting.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Self::Api { status: 429, .. } => true,
            Self::Api {
                status: 403,
                reason: Some(reason),
                ..
            } => RATE_LIMIT_REASONS.contains(&reason.as_str()),
            _ => false,
        }
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    reason: Option<String>,
}
