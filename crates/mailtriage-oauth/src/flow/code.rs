//! One authorization-code attempt for an installed application.

use super::{OAuthClient, PkceChallenge};
use crate::error::Result;
use crate::token::Token;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;
use url::Url;

/// Consent URL parameters and the secrets needed to redeem the code.
///
/// Every attempt gets its own PKCE verifier and CSRF `state`; neither is
/// reused across attempts.
#[derive(Debug)]
pub struct AuthorizationCodeFlow {
    client: OAuthClient,
    redirect_uri: String,
    pkce: PkceChallenge,
    state: String,
}

impl AuthorizationCodeFlow {
    /// Starts an attempt that redirects to `redirect_uri`.
    #[must_use]
    pub fn new(client: OAuthClient, redirect_uri: impl Into<String>) -> Self {
        Self {
            client,
            redirect_uri: redirect_uri.into(),
            pkce: PkceChallenge::generate(),
            state: random_state(),
        }
    }

    /// The CSRF `state` the redirect must echo.
    #[must_use]
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Where the authorization server sends the user back.
    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// URL the user opens to grant access.
    #[must_use]
    pub fn consent_url(&self) -> Url {
        let provider = &self.client.provider;
        let mut url = provider.auth_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("response_type", "code")
                .append_pair("client_id", &self.client.client_id)
                .append_pair("redirect_uri", &self.redirect_uri)
                .append_pair("scope", &provider.scope_param())
                .append_pair("state", &self.state)
                .append_pair("code_challenge", self.pkce.challenge())
                .append_pair("code_challenge_method", self.pkce.method());
            if provider.offline_access {
                // refresh tokens are only issued on a forced consent screen
                query
                    .append_pair("access_type", "offline")
                    .append_pair("prompt", "consent");
            }
        }
        url
    }

    /// Redeems the code returned on the redirect.
    ///
    /// # Errors
    ///
    /// Returns an error if the token endpoint rejects the code.
    pub async fn exchange_code(&self, code: &str) -> Result<Token> {
        self.client
            .exchange_code(code, &self.redirect_uri, self.pkce.verifier())
            .await
    }
}

fn random_state() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
