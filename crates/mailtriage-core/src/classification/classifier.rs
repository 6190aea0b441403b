//! Ticket classifier.

use super::chat::{ChatMessage, ChatRequest, ChatService};
use super::model::ClassificationResult;
use super::parse::parse_reply;
use super::prompt::{system_prompt, user_prompt};
use crate::ticket::Ticket;
use tracing::{debug, warn};

/// Classifies tickets with a chat model.
///
/// Holds no per-call state; classifying the same ticket twice against a
/// deterministic model gives the same result.
#[derive(Debug, Clone)]
pub struct Classifier<C> {
    chat: C,
    model: String,
}

impl<C: ChatService + Sync> Classifier<C> {
    /// Creates a classifier that sends requests for `model` through `chat`.
    pub fn new(chat: C, model: impl Into<String>) -> Self {
        Self {
            chat,
            model: model.into(),
        }
    }

    /// The chat service.
    pub const fn chat(&self) -> &C {
        &self.chat
    }

    /// Model identifier sent with every request.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Chat request for `ticket`: the fixed instructions, then the ticket.
    #[must_use]
    pub fn request_for(&self, ticket: &Ticket) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(system_prompt()),
                ChatMessage::user(user_prompt(ticket)),
            ],
        }
    }

    /// Classifies one ticket. Failures are returned as
    /// [`ClassificationResult::Failed`], never raised.
    pub async fn classify(&self, ticket: &Ticket) -> ClassificationResult {
        let raw = match self.chat.complete(self.request_for(ticket)).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(ticket = %ticket.id, "chat service call failed: {e}");
                return ClassificationResult::failed(e.failure_reason());
            }
        };

        let result = parse_reply(&raw);
        match &result {
            ClassificationResult::Classified {
                category, urgency, ..
            } => debug!(ticket = %ticket.id, %category, %urgency, "classified"),
            ClassificationResult::Failed { reason } => {
                warn!(ticket = %ticket.id, %reason, raw = %raw, "unusable model reply");
            }
        }
        result
    }
}
