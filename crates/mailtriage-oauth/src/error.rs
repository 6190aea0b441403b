//! Error types for `OAuth2` operations.

use std::io;
use std::path::PathBuf;

/// Result of an authorization step.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures while obtaining, renewing, or persisting a token.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Token file, secrets file, or redirect listener I/O.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The token endpoint could not be reached.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A token file or endpoint response is not the expected JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The authorization server refused the request.
    #[error("authorization server error {error}: {description}")]
    OAuth {
        /// `error` field, such as `invalid_grant`.
        error: String,
        /// `error_description` field or raw response body.
        description: String,
    },

    /// Renewal was asked of a token without a refresh token.
    #[error("token carries no refresh token")]
    NoRefreshToken,

    /// The user declined on the consent screen.
    #[error("user denied mailbox access")]
    AccessDenied,

    /// The redirect echoed a different `state` than the one sent.
    #[error("authorization state mismatch")]
    StateMismatch,

    /// The redirect could not be understood.
    #[error("invalid authorization redirect: {0}")]
    InvalidRedirect(String),

    /// The client secrets file is missing or unusable.
    #[error("invalid client secrets in {path}: {reason}")]
    InvalidSecrets {
        /// File that was read.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// The provider cannot be used as configured.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An endpoint URL does not parse.
    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),
}

impl Error {
    /// An [`Error::OAuth`] from an RFC 6749 error code and description.
    #[must_use]
    pub fn oauth_error(error: impl Into<String>, description: impl Into<String>) -> Self {
        Self::OAuth {
            error: error.into(),
            description: description.into(),
        }
    }

    /// Whether the stored grant is dead and only new consent can help.
    #[must_use]
    pub fn needs_consent(&self) -> bool {
        match self {
            Self::NoRefreshToken => true,
            Self::OAuth { error, .. } => error == "invalid_grant",
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_consent() {
        assert!(Error::NoRefreshToken.needs_consent());
        assert!(Error::oauth_error("invalid_grant", "revoked").needs_consent());
        assert!(!Error::oauth_error("http_503", "down").needs_consent());
        assert!(!Error::AccessDenied.needs_consent());
    }

    #[test]
    fn test_display() {
        let err = Error::oauth_error("invalid_client", "The OAuth client was not found.");
        assert_eq!(
            err.to_string(),
            "authorization server error invalid_client: The OAuth client was not found."
        );
    }
}
