//! Authorization server description.

use crate::error::{Error, Result};
use url::Url;

/// Read-only Gmail scope; listing and reading messages needs nothing more.
pub const GMAIL_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/gmail.readonly";

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Endpoints and scopes of an `OAuth2` authorization server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provider {
    /// Display name, used in logs.
    pub name: String,
    /// Authorization (consent) endpoint.
    pub auth_url: Url,
    /// Token endpoint.
    pub token_url: Url,
    /// Scopes requested at consent.
    pub scopes: Vec<String>,
    /// Ask for a refresh token at consent (Google's `access_type=offline`).
    pub offline_access: bool,
}

impl Provider {
    /// Describes a provider with no scopes.
    ///
    /// # Errors
    ///
    /// Returns an error if either URL does not parse.
    pub fn new(
        name: impl Into<String>,
        auth_url: impl AsRef<str>,
        token_url: impl AsRef<str>,
    ) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            auth_url: Url::parse(auth_url.as_ref())?,
            token_url: Url::parse(token_url.as_ref())?,
            scopes: Vec::new(),
            offline_access: false,
        })
    }

    /// Replaces the requested scopes.
    #[must_use]
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Requests offline access so that consent yields a refresh token.
    #[must_use]
    pub const fn with_offline_access(mut self) -> Self {
        self.offline_access = true;
        self
    }

    /// Google with read-only Gmail access and offline refresh tokens.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the built-in URLs are valid.
    pub fn google() -> Result<Self> {
        Self::google_with_endpoints(GOOGLE_AUTH_URL, GOOGLE_TOKEN_URL)
    }

    /// Google with the endpoints advertised in a `credentials.json` file.
    ///
    /// # Errors
    ///
    /// Returns an error if either URL is invalid.
    pub fn google_with_endpoints(
        auth_url: impl AsRef<str>,
        token_url: impl AsRef<str>,
    ) -> Result<Self> {
        Ok(Self::new("Google", auth_url, token_url)?
            .with_scopes([GMAIL_READONLY_SCOPE])
            .with_offline_access())
    }

    /// Space-separated scope parameter.
    #[must_use]
    pub fn scope_param(&self) -> String {
        self.scopes.join(" ")
    }

    /// Checks that consent can be requested.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] when no scope is configured.
    pub fn validate(&self) -> Result<()> {
        if self.scopes.iter().all(|s| s.trim().is_empty()) {
            return Err(Error::InvalidConfig(format!(
                "{} has no scopes configured",
                self.name
            )));
        }
        Ok(())
    }
}
