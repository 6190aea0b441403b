//! Fixed ticket source.

use crate::error::SourceError;
use crate::source::TicketSource;
use crate::ticket::Ticket;
use std::fmt;
use std::num::NonZeroU32;

type ErrorFactory = Box<dyn Fn() -> SourceError + Send + Sync>;

/// A [`TicketSource`] returning the same tickets on every fetch, truncated
/// to the requested count, or always failing.
pub struct StaticSource {
    tickets: Vec<Ticket>,
    error: Option<ErrorFactory>,
    requested: Vec<u32>,
}

impl fmt::Debug for StaticSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticSource")
            .field("tickets", &self.tickets)
            .field("failing", &self.error.is_some())
            .field("requested", &self.requested)
            .finish()
    }
}

impl StaticSource {
    /// Serves `tickets`; an empty vector models an empty mailbox.
    #[must_use]
    pub fn new(tickets: Vec<Ticket>) -> Self {
        Self {
            tickets,
            error: None,
            requested: Vec::new(),
        }
    }

    /// Fails every fetch with the error built by `error`.
    #[must_use]
    pub fn failing<F>(error: F) -> Self
    where
        F: Fn() -> SourceError + Send + Sync + 'static,
    {
        Self {
            tickets: Vec::new(),
            error: Some(Box::new(error)),
            requested: Vec::new(),
        }
    }

    /// `max_count` of every fetch so far.
    #[must_use]
    pub fn requested(&self) -> &[u32] {
        &self.requested
    }
}

impl TicketSource for StaticSource {
    async fn fetch(&mut self, max_count: NonZeroU32) -> Result<Vec<Ticket>, SourceError> {
        self.requested.push(max_count.get());
        if let Some(error) = &self.error {
            return Err(error());
        }
        let limit = usize::try_from(max_count.get()).unwrap_or(usize::MAX);
        Ok(self.tickets.iter().take(limit).cloned().collect())
    }
}
