//! Scripted chat service.

use crate::classification::{ChatRequest, ChatService};
use crate::error::ChatError;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Mutex, PoisonError};

type Responder = Box<dyn Fn(&ChatRequest) -> Result<String, ChatError> + Send + Sync>;

/// A [`ChatService`] that answers from a script and records every request.
///
/// Queued replies are consumed first, in order. After that the responder
/// (if any) computes the reply, then the default reply is used. With none
/// of those left the call fails with [`ChatError::EmptyReply`].
///
/// ```rust,ignore
/// let chat = FakeChat::new()
///     .with_reply(r#"{"categorie": "demande_administrative", "urgence": "faible", "synthese": "x"}"#)
///     .with_error(ChatError::EmptyReply);
/// let classifier = Classifier::new(chat, "test-model");
/// ```
#[derive(Default)]
pub struct FakeChat {
    script: Mutex<VecDeque<Result<String, ChatError>>>,
    responder: Option<Responder>,
    default_reply: Option<String>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl fmt::Debug for FakeChat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeChat")
            .field("default_reply", &self.default_reply)
            .field("responder", &self.responder.as_ref().map(|_| "<fn>"))
            .finish_non_exhaustive()
    }
}

impl FakeChat {
    /// A chat service with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful reply.
    #[must_use]
    pub fn with_reply(self, reply: impl Into<String>) -> Self {
        self.push(Ok(reply.into()))
    }

    /// Queues a failure.
    #[must_use]
    pub fn with_error(self, error: ChatError) -> Self {
        self.push(Err(error))
    }

    /// Computes replies from the request once the queue is exhausted.
    #[must_use]
    pub fn with_responder<F>(mut self, responder: F) -> Self
    where
        F: Fn(&ChatRequest) -> Result<String, ChatError> + Send + Sync + 'static,
    {
        self.responder = Some(Box::new(responder));
        self
    }

    /// Reply used for every call once the queue is exhausted.
    #[must_use]
    pub fn with_default_reply(mut self, reply: impl Into<String>) -> Self {
        self.default_reply = Some(reply.into());
        self
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(self, reply: Result<String, ChatError>) -> Self {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
        self
    }

    fn answer(&self, request: &ChatRequest) -> Result<String, ChatError> {
        let scripted = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        if let Some(reply) = scripted {
            return reply;
        }
        if let Some(responder) = &self.responder {
            return responder(request);
        }
        self.default_reply.clone().ok_or(ChatError::EmptyReply)
    }
}

impl ChatService for FakeChat {
    async fn complete(&self, request: ChatRequest) -> Result<String, ChatError> {
        let reply = self.answer(&request);
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        reply
    }
}
