//! Tickets from a Gmail inbox.

use super::TicketSource;
use super::session::{CredentialProvider, Session};
use crate::error::SourceError;
use crate::ticket::{NO_SUBJECT, Ticket};
use mailtriage_gmail::{GmailClient, INBOX_LABEL, Message};
use std::num::NonZeroU32;
use tracing::{debug, info, warn};

/// Reads the most recent inbox messages as tickets.
#[derive(Debug)]
pub struct GmailTicketSource<P> {
    client: GmailClient,
    session: Session<P>,
}

impl<P: CredentialProvider + Send + Sync> GmailTicketSource<P> {
    /// Creates a source; nothing is authorized until the first fetch.
    pub const fn new(client: GmailClient, session: Session<P>) -> Self {
        Self { client, session }
    }

    /// The mailbox session.
    pub const fn session(&self) -> &Session<P> {
        &self.session
    }

    async fn fetch_inbox(&mut self, max_count: NonZeroU32) -> Result<Vec<Ticket>, SourceError> {
        let access_token = self.session.access_token().await?;
        let refs = self
            .client
            .list_messages(&access_token, INBOX_LABEL, max_count.get())
            .await?;
        debug!(listed = refs.len(), "inbox listed");

        let limit = usize::try_from(max_count.get()).unwrap_or(usize::MAX);
        let mut tickets = Vec::with_capacity(refs.len().min(limit));
        for message_ref in refs.into_iter().take(limit) {
            let message = self
                .client
                .get_message(&access_token, &message_ref.id)
                .await?;
            tickets.push(ticket_from_message(message));
        }
        Ok(tickets)
    }
}

impl<P: CredentialProvider + Send + Sync> TicketSource for GmailTicketSource<P> {
    async fn fetch(&mut self, max_count: NonZeroU32) -> Result<Vec<Ticket>, SourceError> {
        match self.fetch_inbox(max_count).await {
            Ok(tickets) => {
                info!(count = tickets.len(), "fetched tickets from inbox");
                Ok(tickets)
            }
            Err(e) if e.is_rate_limited() => {
                warn!("mailbox rate limit reached, returning an empty batch: {e}");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}

/// Subject defaults to [`NO_SUBJECT`], body to the empty string.
fn ticket_from_message(message: Message) -> Ticket {
    let subject = message.subject().unwrap_or(NO_SUBJECT).to_string();
    let body = message.plain_text_body().unwrap_or_default();
    Ticket::new(message.id, subject, body)
}
