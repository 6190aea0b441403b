//! Credential provider backed by Google `OAuth2` files.

use super::session::CredentialProvider;
use crate::error::CredentialError;
use mailtriage_oauth::{ClientSecrets, LoopbackConsent, OAuthClient, Provider, Token, TokenStore};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Reads client secrets from `credentials.json` and keeps the user's token
/// in a JSON file.
///
/// The secrets file is only read when a token has to be refreshed or
/// obtained through consent.
#[derive(Debug, Clone)]
pub struct OAuthCredentialProvider {
    secrets_path: PathBuf,
    store: TokenStore,
    http: reqwest::Client,
    open_browser: bool,
}

impl OAuthCredentialProvider {
    /// Creates a provider for the given secrets and token files.
    pub fn new(
        secrets_path: impl Into<PathBuf>,
        token_path: impl Into<PathBuf>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            secrets_path: secrets_path.into(),
            store: TokenStore::new(token_path),
            http,
            open_browser: true,
        }
    }

    /// Prints the consent URL without launching a browser.
    #[must_use]
    pub const fn without_browser(mut self) -> Self {
        self.open_browser = false;
        self
    }

    /// Location of the client secrets file.
    #[must_use]
    pub fn secrets_path(&self) -> &Path {
        &self.secrets_path
    }

    fn client(&self) -> Result<OAuthClient, CredentialError> {
        let secrets =
            ClientSecrets::from_file(&self.secrets_path).map_err(CredentialError::Secrets)?;
        let provider = match (&secrets.auth_uri, &secrets.token_uri) {
            (Some(auth_uri), Some(token_uri)) => {
                Provider::google_with_endpoints(auth_uri, token_uri)
            }
            _ => Provider::google(),
        }
        .map_err(CredentialError::Secrets)?;

        Ok(OAuthClient::from_secrets(&secrets, provider).with_http_client(self.http.clone()))
    }
}

impl CredentialProvider for OAuthCredentialProvider {
    fn load(&self) -> Result<Option<Token>, CredentialError> {
        self.store.load().map_err(CredentialError::Store)
    }

    async fn refresh_or_reauthenticate(
        &self,
        stale: Option<Token>,
    ) -> Result<Token, CredentialError> {
        let client = self.client()?;
        if let Some(token) = stale.filter(Token::is_refreshable) {
            info!("refreshing mailbox token");
            match client.refresh_token(&token).await {
                Ok(renewed) => return Ok(renewed),
                Err(e) if e.needs_consent() => warn!("stored grant rejected: {e}"),
                Err(e) => return Err(CredentialError::Refresh(e)),
            }
        }

        info!("mailbox consent required");
        let consent = LoopbackConsent::new(client);
        let consent = if self.open_browser {
            consent
        } else {
            consent.without_browser()
        };
        consent.authorize().await.map_err(CredentialError::Consent)
    }

    fn store(&self, token: &Token) -> Result<(), CredentialError> {
        self.store.save(token).map_err(CredentialError::Store)
    }
}
