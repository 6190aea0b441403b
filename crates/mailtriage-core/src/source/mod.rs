//! Ticket acquisition.

mod credentials;
mod gmail;
mod session;

pub use credentials::OAuthCredentialProvider;
pub use gmail::GmailTicketSource;
pub use session::{CredentialProvider, Session, SessionState};

use crate::error::SourceError;
use crate::ticket::Ticket;
use std::future::Future;
use std::num::NonZeroU32;

/// A bounded supply of tickets.
pub trait TicketSource {
    /// Fetches at most `max_count` tickets, newest first.
    ///
    /// A rate-limited provider yields an empty batch, not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] on credential, network, or API failure.
    fn fetch(
        &mut self,
        max_count: NonZeroU32,
    ) -> impl Future<Output = Result<Vec<Ticket>, SourceError>> + Send;
}
