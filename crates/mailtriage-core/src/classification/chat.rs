//! Chat-completion service abstraction and the OpenAI-compatible client.

use crate::error::ChatError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::debug;

/// Groq's OpenAI-compatible API root.
pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions.
    System,
    /// Data to act on.
    User,
}

/// One message of a chat request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    /// Author.
    pub role: Role,
    /// Text content.
    pub content: String,
}

impl ChatMessage {
    /// A system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// A user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A chat-completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    /// Model identifier.
    pub model: String,
    /// Conversation, oldest first.
    pub messages: Vec<ChatMessage>,
}

/// Something that turns a chat request into the text of the first reply.
pub trait ChatService {
    /// Sends `request` and returns the content of the first choice.
    ///
    /// # Errors
    ///
    /// Returns a [`ChatError`] on transport failure, a non-success status,
    /// or a response without usable content.
    fn complete(
        &self,
        request: ChatRequest,
    ) -> impl Future<Output = Result<String, ChatError>> + Send;
}

/// Client for `POST {api_base}/chat/completions`.
#[derive(Debug, Clone)]
pub struct OpenAiChatClient {
    http: reqwest::Client,
    api_key: String,
    api_base: String,
}

impl OpenAiChatClient {
    /// Creates a client against [`DEFAULT_API_BASE`].
    ///
    /// Timeouts are whatever `http` was built with.
    #[must_use]
    pub fn new(http: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Sets a custom API root.
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Debug, Deserialize)]
struct CompletionEnvelope {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl ChatService for OpenAiChatClient {
    async fn complete(&self, request: ChatRequest) -> Result<String, ChatError> {
        debug!(model = %request.model, "sending chat completion");
        let response = self
            .http
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map_or_else(|_| body.trim().to_string(), |e| e.error.message);
            return Err(ChatError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: CompletionEnvelope =
            serde_json::from_str(&body).map_err(|e| ChatError::Envelope(e.to_string()))?;

        envelope
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ChatError::EmptyReply)
    }
}
