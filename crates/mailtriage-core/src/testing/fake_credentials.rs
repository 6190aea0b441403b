//! In-memory credential provider.

use crate::error::CredentialError;
use crate::source::CredentialProvider;
use mailtriage_oauth::Token;
use std::sync::{Mutex, PoisonError};

/// A [`CredentialProvider`] that keeps the "persisted" token in memory.
///
/// `refresh_or_reauthenticate` hands out the token configured with
/// [`with_issued`](Self::with_issued), or fails as if consent were denied.
#[derive(Debug, Default)]
pub struct FakeCredentials {
    stored: Mutex<Option<Token>>,
    issued: Option<Token>,
    loads: Mutex<usize>,
    renewals: Mutex<Vec<Option<Token>>>,
    saved: Mutex<Vec<Token>>,
}

impl FakeCredentials {
    /// Nothing stored, nothing to issue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Token returned by `load`.
    #[must_use]
    pub fn with_stored(self, token: Token) -> Self {
        *self.stored.lock().unwrap_or_else(PoisonError::into_inner) = Some(token);
        self
    }

    /// Token returned by every refresh or consent.
    #[must_use]
    pub fn with_issued(mut self, token: Token) -> Self {
        self.issued = Some(token);
        self
    }

    /// Number of `load` calls.
    pub fn loads(&self) -> usize {
        *self.loads.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Argument of every `refresh_or_reauthenticate` call.
    pub fn renewals(&self) -> Vec<Option<Token>> {
        self.renewals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Every token passed to `store`.
    pub fn saved(&self) -> Vec<Token> {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CredentialProvider for FakeCredentials {
    fn load(&self) -> Result<Option<Token>, CredentialError> {
        *self.loads.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(self
            .stored
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    async fn refresh_or_reauthenticate(
        &self,
        stale: Option<Token>,
    ) -> Result<Token, CredentialError> {
        self.renewals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(stale);
        self.issued
            .clone()
            .ok_or(CredentialError::Consent(mailtriage_oauth::Error::AccessDenied))
    }

    fn store(&self, token: &Token) -> Result<(), CredentialError> {
        *self.stored.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(token.clone());
        Ok(())
    }
}
