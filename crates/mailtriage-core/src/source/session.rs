//! Mailbox session and credential lifecycle.

use crate::error::CredentialError;
use mailtriage_oauth::Token;
use std::future::Future;
use tracing::{debug, info};

/// Where mailbox credentials come from and go to.
pub trait CredentialProvider {
    /// Reads the persisted credential, `None` if there is none yet.
    ///
    /// # Errors
    ///
    /// Returns an error if a persisted credential exists but is unreadable.
    fn load(&self) -> Result<Option<Token>, CredentialError>;

    /// Whether `token` can be used as is.
    fn is_valid(&self, token: &Token) -> bool {
        token.is_valid()
    }

    /// Refreshes `stale` if it carries a refresh token, otherwise runs
    /// interactive consent.
    ///
    /// # Errors
    ///
    /// Returns an error if neither path yields a credential.
    fn refresh_or_reauthenticate(
        &self,
        stale: Option<Token>,
    ) -> impl Future<Output = Result<Token, CredentialError>> + Send;

    /// Persists a newly obtained credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential cannot be written.
    fn store(&self, token: &Token) -> Result<(), CredentialError>;
}

/// Lifecycle stage of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing has been looked up yet.
    Unauthenticated,
    /// A persisted credential was found but not yet checked.
    CredentialLoaded,
    /// No usable credential and no way to refresh one.
    InteractiveConsentRequired,
    /// A valid credential is held.
    Authorized,
}

/// Authorization state of one mailbox for the lifetime of the process.
#[derive(Debug)]
pub struct Session<P> {
    provider: P,
    state: SessionState,
    token: Option<Token>,
}

impl<P: CredentialProvider + Send + Sync> Session<P> {
    /// Creates an unauthenticated session.
    pub const fn new(provider: P) -> Self {
        Self {
            provider,
            state: SessionState::Unauthenticated,
            token: None,
        }
    }

    /// Current lifecycle stage.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// The credential provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns a bearer token, authorizing first if needed.
    ///
    /// A held token that is still valid is reused without touching the
    /// provider. Any newly obtained token is stored before it is returned.
    ///
    /// # Errors
    ///
    /// Returns a [`CredentialError`] if no valid credential can be obtained.
    /// The session then starts over on the next call.
    pub async fn access_token(&mut self) -> Result<String, CredentialError> {
        match self.authorize().await {
            Ok(access_token) => Ok(access_token),
            Err(e) => {
                self.state = SessionState::Unauthenticated;
                self.token = None;
                Err(e)
            }
        }
    }

    async fn authorize(&mut self) -> Result<String, CredentialError> {
        if self.state == SessionState::Unauthenticated {
            self.token = self.provider.load()?;
            self.state = if self.token.is_some() {
                SessionState::CredentialLoaded
            } else {
                SessionState::InteractiveConsentRequired
            };
            debug!(state = ?self.state, "credential lookup done");
        }

        if let Some(token) = self.token.as_ref().filter(|t| self.provider.is_valid(t)) {
            let access_token = token.access_token.clone();
            self.state = SessionState::Authorized;
            return Ok(access_token);
        }

        let stale = self.token.take();
        if !stale.as_ref().is_some_and(Token::is_refreshable) {
            self.state = SessionState::InteractiveConsentRequired;
        }
        info!(state = ?self.state, "obtaining a new mailbox credential");

        let token = self.provider.refresh_or_reauthenticate(stale).await?;
        self.provider.store(&token)?;

        let access_token = token.access_token.clone();
        self.token = Some(token);
        self.state = SessionState::Authorized;
        Ok(access_token)
    }
}
