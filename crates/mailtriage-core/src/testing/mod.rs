//! Test doubles for the injected capabilities.
//!
//! These stand in for the chat service, the credential store, and the
//! mailbox so the pipeline can be exercised without network access or a
//! browser.

mod fake_chat;
mod fake_credentials;
mod static_source;

pub use fake_chat::FakeChat;
pub use fake_credentials::FakeCredentials;
pub use static_source::StaticSource;
