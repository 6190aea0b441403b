//! Gmail REST client.

use crate::error::{Error, Result};
use crate::message::{Message, MessageList, MessageRef};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Production Gmail API root.
pub const DEFAULT_BASE_URL: &str = "https://gmail.googleapis.com/gmail/v1";

/// System label of the inbox.
pub const INBOX_LABEL: &str = "INBOX";

/// Thin client over the `users.messages` resource of the signed-in user.
#[derive(Debug, Clone)]
pub struct GmailClient {
    http: Client,
    base_url: String,
}

impl GmailClient {
    /// Creates a client against the production API.
    #[must_use]
    pub fn new(http: Client) -> Self {
        Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Points the client at another API root (a test server, a proxy).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Lists the most recent messages carrying `label`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    pub async fn list_messages(
        &self,
        access_token: &str,
        label: &str,
        max_results: u32,
    ) -> Result<Vec<MessageRef>> {
        debug!(label, max_results, "listing messages");
        let max_results = max_results.to_string();
        let response = self
            .http
            .get(format!("{}/users/me/messages", self.base_url))
            .bearer_auth(access_token)
            .query(&[("labelIds", label), ("maxResults", max_results.as_str())])
            .send()
            .await?;

        let list: MessageList = Self::decode(response).await?;
        Ok(list.messages)
    }

    /// Fetches one message with its full MIME structure.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    pub async fn get_message(&self, access_token: &str, id: &str) -> Result<Message> {
        debug!(id, "fetching message");
        let response = self
            .http
            .get(format!("{}/users/me/messages/{id}", self.base_url))
            .bearer_auth(access_token)
            .query(&[("format", "full")])
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::from_response(status.as_u16(), &body));
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GmailClient {
        GmailClient::new(Client::new()).with_base_url(format!("{}/gmail/v1/", server.uri()))
    }

    #[tokio::test]
    async fn test_list_messages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gmail/v1/users/me/messages"))
            .and(query_param("labelIds", "INBOX"))
            .and(query_param("maxResults", "3"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "messages": [
                    {"id": "a1", "threadId": "t1"},
                    {"id": "b2", "threadId": "t2"}
                ],
                "resultSizeEstimate": 2
            })))
            .expect(1)
            .mount(&server)
            .await;

        let refs = client_for(&server)
            .list_messages("tok", INBOX_LABEL, 3)
            .await
            .unwrap();
        let ids: Vec<_> = refs.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a1", "b2"]);
    }

    #[tokio::test]
    async fn test_list_empty_label() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gmail/v1/users/me/messages"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"resultSizeEstimate": 0})),
            )
            .mount(&server)
            .await;

        let refs = client_for(&server)
            .list_messages("tok", INBOX_LABEL, 5)
            .await
            .unwrap();
        assert!(refs.is_empty());
    }

    #[tokio::test]
    async fn test_get_message_full_format() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gmail/v1/users/me/messages/a1"))
            .and(query_param("format", "full"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "a1",
                "payload": {
                    "mimeType": "text/plain",
                    "headers": [{"name": "Subject", "value": "Imprimante"}],
                    "body": {"size": 2, "data": "b2s"}
                }
            })))
            .mount(&server)
            .await;

        let message = client_for(&server)
            .get_message("tok", "a1")
            .await
            .unwrap();
        assert_eq!(message.subject(), Some("Imprimante"));
        assert_eq!(message.plain_text_body().as_deref(), Some("ok"));
    }

    #[tokio::test]
    async fn test_rate_limit_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": {"code": 429, "message": "Too many requests",
                          "errors": [{"reason": "rateLimitExceeded"}]}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .list_messages("tok", INBOX_LABEL, 3)
            .await
            .unwrap_err();
        assert!(err.is_rate_limited());
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"code": 401, "message": "Invalid Credentials",
                          "errors": [{"reason": "authError"}]}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_message("tok", "a1")
            .await
            .unwrap_err();
        assert!(!err.is_rate_limited());
        assert_eq!(err.status(), Some(401));
    }
}
