//! # mailtriage-gmail
//!
//! Just enough of the Gmail REST API (v1) to read an inbox:
//!
//! - `users.messages.list` restricted to one label
//! - `users.messages.get` with `format=full`
//! - subject lookup and depth-first plain-text body extraction
//!
//! Authentication is a bearer access token supplied by the caller; obtaining
//! it is the job of `mailtriage-oauth`.
//!
//! ## Example
//!
//! ```ignore
//! use mailtriage_gmail::GmailClient;
//!
//! let gmail = GmailClient::new(reqwest::Client::new());
//! for message_ref in gmail.list_messages(&token, "INBOX", 5).await? {
//!     let message = gmail.get_message(&token, &message_ref.id).await?;
//!     println!("{:?}", message.subject());
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod client;
mod error;
pub mod message;

pub use client::{DEFAULT_BASE_URL, GmailClient, INBOX_LABEL};
pub use error::{Error, Result};
pub use message::{Header, Message, MessagePart, MessagePartBody, MessageRef};
