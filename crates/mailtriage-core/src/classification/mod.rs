//! Ticket classification: prompts, the chat call, and reply validation.

pub mod chat;
mod classifier;
mod model;
mod parse;
mod prompt;

pub use chat::{ChatMessage, ChatRequest, ChatService, OpenAiChatClient, Role};
pub use classifier::Classifier;
pub use model::{Category, ClassificationResult, FailureReason, Urgency};
pub use parse::parse_reply;
pub use prompt::{system_prompt, user_prompt};
