//! Talking to the token endpoint, and the interactive consent that feeds it.

mod code;
mod loopback;
mod pkce;

pub use code::AuthorizationCodeFlow;
pub use loopback::{LoopbackConsent, Redirect};
pub use pkce::PkceChallenge;

use crate::error::{Error, Result};
use crate::provider::Provider;
use crate::secrets::ClientSecrets;
use crate::token::{ErrorResponse, Token, TokenResponse};
use chrono::Utc;
use reqwest::Client;
use tracing::debug;

type FormFields<'a> = Vec<(&'static str, &'a str)>;

/// An installed application registered with a [`Provider`].
#[derive(Debug, Clone)]
pub struct OAuthClient {
    /// Application identifier issued by the provider.
    pub client_id: String,
    /// Installed-app secret; Google issues one even though it is not secret.
    pub client_secret: Option<String>,
    /// Where to authorize and redeem tokens.
    pub provider: Provider,
    http: Client,
}

impl OAuthClient {
    /// A public client with a default HTTP client.
    #[must_use]
    pub fn new(client_id: impl Into<String>, provider: Provider) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: None,
            provider,
            http: Client::new(),
        }
    }

    /// The client described by a `credentials.json` file.
    #[must_use]
    pub fn from_secrets(secrets: &ClientSecrets, provider: Provider) -> Self {
        Self {
            client_secret: secrets.client_secret.clone(),
            ..Self::new(&secrets.client_id, provider)
        }
    }

    /// Sets the client secret.
    #[must_use]
    pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(secret.into());
        self
    }

    /// Sends token requests through `http`, keeping its timeout.
    #[must_use]
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    /// Trades the refresh token of `token` for a new access token.
    ///
    /// The returned token keeps the old refresh token when the server
    /// does not rotate it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRefreshToken`] if `token` cannot be refreshed, or
    /// the token endpoint's error (`invalid_grant` once revoked).
    pub async fn refresh_token(&self, token: &Token) -> Result<Token> {
        let refresh_token = token.usable_refresh_token().ok_or(Error::NoRefreshToken)?;
        let mut form = vec![
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];
        self.identify(&mut form);

        debug!(provider = %self.provider.name, "refreshing access token");
        let renewed = self.request_token(&form).await?;
        Ok(renewed.inherit_refresh_token(token))
    }

    pub(crate) async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
        code_verifier: &str,
    ) -> Result<Token> {
        let mut form = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("code_verifier", code_verifier),
        ];
        self.identify(&mut form);

        debug!(provider = %self.provider.name, "redeeming authorization code");
        self.request_token(&form).await
    }

    fn identify<'a>(&'a self, form: &mut FormFields<'a>) {
        form.push(("client_id", &self.client_id));
        if let Some(secret) = &self.client_secret {
            form.push(("client_secret", secret));
        }
    }

    async fn request_token(&self, form: &FormFields<'_>) -> Result<Token> {
        let issued_at = Utc::now();
        let response = self
            .http
            .post(self.provider.token_url.clone())
            .form(form)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(refusal) => refusal.into(),
                Err(_) => Error::oauth_error(format!("http_{}", status.as_u16()), body),
            });
        }
        serde_json::from_str::<TokenResponse>(&body)?.into_token(issued_at)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_at(server: &MockServer) -> Provider {
        Provider::google_with_endpoints(
            format!("{}/auth", server.uri()),
            format!("{}/token", server.uri()),
        )
        .unwrap()
    }

    #[test]
    fn test_client_from_secrets() {
        let secrets = ClientSecrets {
            client_id: "id".to_string(),
            client_secret: Some("secret".to_string()),
            auth_uri: None,
            token_uri: None,
        };
        let client = OAuthClient::from_secrets(&secrets, Provider::google().unwrap());
        assert_eq!(client.client_id, "id");
        assert_eq!(client.client_secret.as_deref(), Some("secret"));
    }

    #[tokio::test]
    async fn test_refresh_keeps_refresh_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("client_secret=shh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "fresh",
                "token_type": "Bearer",
                "expires_in": 3599
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OAuthClient::new("id", provider_at(&server)).with_client_secret("shh");
        let stale = Token::new("stale", "Bearer").with_refresh_token("keep-me");

        let token = client.refresh_token(&stale).await.unwrap();
        assert_eq!(token.access_token, "fresh");
        assert_eq!(token.refresh_token.as_deref(), Some("keep-me"));
        assert!(token.is_valid());
    }

    #[tokio::test]
    async fn test_revoked_refresh_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "Token has been expired or revoked."
            })))
            .mount(&server)
            .await;

        let client = OAuthClient::new("id", provider_at(&server));
        let stale = Token::new("stale", "Bearer").with_refresh_token("revoked");

        let err = client.refresh_token(&stale).await.unwrap_err();
        assert!(matches!(err, Error::OAuth { ref error, .. } if error == "invalid_grant"));
    }

    #[tokio::test]
    async fn test_refresh_needs_refresh_token() {
        let client = OAuthClient::new("id", Provider::google().unwrap());
        let err = client
            .refresh_token(&Token::new("stale", "Bearer"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoRefreshToken));
    }

    #[tokio::test]
    async fn test_code_exchange_sends_verifier() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code_verifier=verifier"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "granted",
                "refresh_token": "1//r",
                "expires_in": 3599
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OAuthClient::new("id", provider_at(&server));
        let token = client
            .exchange_code("4/0Ab", "http://127.0.0.1:1/", "verifier")
            .await
            .unwrap();
        assert_eq!(token.access_token, "granted");
        assert!(token.is_refreshable());
    }

    #[tokio::test]
    async fn test_non_json_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let client = OAuthClient::new("id", provider_at(&server));
        let err = client
            .exchange_code("code", "http://127.0.0.1:1/", "verifier")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::OAuth { ref error, .. } if error == "http_503"));
    }
}
