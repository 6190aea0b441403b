//! Access tokens and token-endpoint payloads.

use crate::error::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A token this close to its expiry is already treated as expired.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// An access token and what is needed to renew it.
///
/// Serialized as is into the token file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Bearer credential sent to the API.
    pub access_token: String,
    /// Usually `Bearer`.
    #[serde(default = "bearer")]
    pub token_type: String,
    /// Absolute expiry; `None` means the server did not say.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Long-lived credential for renewing without consent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Scopes actually granted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

fn bearer() -> String {
    "Bearer".to_string()
}

impl Token {
    /// A token without expiry or refresh token.
    #[must_use]
    pub fn new(access_token: impl Into<String>, token_type: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: token_type.into(),
            expires_at: None,
            refresh_token: None,
            scope: None,
        }
    }

    /// Sets the refresh token.
    #[must_use]
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Sets the expiry.
    #[must_use]
    pub const fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Whether the token is expired, or will be within a minute, at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .is_some_and(|exp| now + Duration::seconds(EXPIRY_MARGIN_SECS) >= exp)
    }

    /// [`is_expired_at`](Self::is_expired_at) the current time.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Non-empty and not expired.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.access_token.is_empty() && !self.is_expired()
    }

    /// Carries a non-empty refresh token.
    #[must_use]
    pub fn is_refreshable(&self) -> bool {
        self.usable_refresh_token().is_some()
    }

    /// The refresh token, unless absent or empty.
    #[must_use]
    pub fn usable_refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref().filter(|t| !t.is_empty())
    }

    /// Keeps `previous`'s refresh token when this one came without any;
    /// Google only sends it on the first grant.
    #[must_use]
    pub fn inherit_refresh_token(mut self, previous: &Self) -> Self {
        if self.refresh_token.is_none() {
            self.refresh_token.clone_from(&previous.refresh_token);
        }
        self
    }
}

/// Successful token-endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// New access token.
    pub access_token: String,
    /// Token type.
    #[serde(default = "bearer")]
    pub token_type: String,
    /// Lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<u32>,
    /// Refresh token, on first grant.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Granted scopes.
    #[serde(default)]
    pub scope: Option<String>,
}

impl TokenResponse {
    /// Turns the relative lifetime into an absolute expiry from `issued_at`.
    ///
    /// # Errors
    ///
    /// Returns an error if the response carries an empty access token.
    pub fn into_token(self, issued_at: DateTime<Utc>) -> Result<Token> {
        if self.access_token.is_empty() {
            return Err(Error::oauth_error(
                "invalid_response",
                "token endpoint returned an empty access_token",
            ));
        }
        Ok(Token {
            access_token: self.access_token,
            token_type: self.token_type,
            expires_at: self
                .expires_in
                .map(|secs| issued_at + Duration::seconds(i64::from(secs))),
            refresh_token: self.refresh_token,
            scope: self.scope,
        })
    }
}

/// Error body of the token endpoint (RFC 6749 §5.2).
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    /// Error code such as `invalid_grant`.
    pub error: String,
    /// Human-readable detail.
    #[serde(default)]
    pub error_description: String,
}

impl From<ErrorResponse> for Error {
    fn from(response: ErrorResponse) -> Self {
        match response.error.as_str() {
            "access_denied" => Self::AccessDenied,
            _ => Self::oauth_error(response.error, response.error_description),
        }
    }
}
