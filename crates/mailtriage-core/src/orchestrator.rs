//! Fetch, fall back, classify.

use crate::classification::{ChatService, ClassificationResult, Classifier};
use crate::error::SourceError;
use crate::source::TicketSource;
use crate::ticket::{Ticket, sample_tickets};
use std::num::NonZeroU32;
use tracing::{info, warn};

/// Where the tickets of a run came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketOrigin {
    /// The mailbox.
    Mailbox,
    /// The built-in samples, because the mailbox yielded nothing.
    Samples,
}

/// A ticket with its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriagedTicket {
    /// The input ticket.
    pub ticket: Ticket,
    /// Its classification.
    pub result: ClassificationResult,
}

/// Output of one [`Orchestrator::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriageRun {
    /// Where the tickets came from.
    pub origin: TicketOrigin,
    /// One entry per ticket, in fetch order.
    pub entries: Vec<TriagedTicket>,
}

impl TriageRun {
    /// Number of tickets that could not be classified.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.entries.iter().filter(|e| !e.result.is_classified()).count()
    }
}

/// Drives a [`TicketSource`] and a [`Classifier`].
#[derive(Debug)]
pub struct Orchestrator<S, C> {
    source: S,
    classifier: Classifier<C>,
}

impl<S, C> Orchestrator<S, C>
where
    S: TicketSource + Send,
    C: ChatService + Sync,
{
    /// Creates an orchestrator.
    pub const fn new(source: S, classifier: Classifier<C>) -> Self {
        Self { source, classifier }
    }

    /// The ticket source.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// The classifier.
    pub const fn classifier(&self) -> &Classifier<C> {
        &self.classifier
    }

    /// Fetches up to `max_count` tickets, substitutes the samples when none
    /// arrive, and classifies each one in order.
    ///
    /// # Errors
    ///
    /// Returns the source's error if the fetch fails. Classification
    /// failures are reported per ticket instead.
    pub async fn run(&mut self, max_count: NonZeroU32) -> Result<TriageRun, SourceError> {
        let fetched = self.source.fetch(max_count).await?;

        let (origin, tickets) = if fetched.is_empty() {
            info!("no tickets in the mailbox, using the built-in samples");
            (TicketOrigin::Samples, sample_tickets())
        } else {
            (TicketOrigin::Mailbox, fetched)
        };

        let mut entries = Vec::with_capacity(tickets.len());
        for ticket in tickets {
            let result = self.classifier.classify(&ticket).await;
            entries.push(TriagedTicket { ticket, result });
        }

        let run = TriageRun { origin, entries };
        let failures = run.failures();
        if failures > 0 {
            warn!(failures, total = run.entries.len(), "some tickets were not classified");
        }
        info!(origin = ?run.origin, total = run.entries.len(), "triage run complete");
        Ok(run)
    }
}
