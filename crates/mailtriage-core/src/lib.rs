//! # mailtriage-core
//!
//! Support-ticket triage for a Gmail inbox.
//!
//! This crate provides:
//! - **Ticket acquisition** - Gmail inbox reading with an `OAuth2` session
//!   whose credential lifecycle is pluggable
//! - **Classification** - prompt construction, an OpenAI-compatible chat
//!   client, and strict validation of the model reply
//! - **Orchestration** - sample fallback for empty or rate-limited
//!   mailboxes, in-order classification
//! - **Configuration** - environment and `.env` loading
//! - **Test doubles** - fakes for the chat service, credentials, and source

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod classification;
pub mod config;
mod error;
pub mod orchestrator;
pub mod source;
pub mod testing;
pub mod ticket;

pub use classification::{
    Category, ChatService, ClassificationResult, Classifier, FailureReason, OpenAiChatClient,
    Urgency,
};
pub use config::Config;
pub use error::{ChatError, ConfigError, CredentialError, Error, Result, SourceError};
pub use orchestrator::{Orchestrator, TicketOrigin, TriageRun, TriagedTicket};
pub use source::{
    CredentialProvider, GmailTicketSource, OAuthCredentialProvider, Session, SessionState,
    TicketSource,
};
pub use ticket::{NO_SUBJECT, Ticket, sample_tickets};
