//! Error types for the triage pipeline.

use crate::classification::FailureReason;

/// Result type alias for pipeline setup and runs.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal pipeline errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Startup configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The ticket batch could not be fetched.
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl Error {
    /// Process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Source(_) => 1,
        }
    }
}

/// Invalid or missing configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("{0} is not set (environment or .env file)")]
    Missing(&'static str),

    /// A variable has a value that cannot be used.
    #[error("{var}={value:?} is invalid: {reason}")]
    Invalid {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// The mailbox credential could not be obtained or persisted.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// Client secrets file missing or unreadable.
    #[error("cannot read client secrets: {0}")]
    Secrets(#[source] mailtriage_oauth::Error),

    /// Token file unreadable or unwritable.
    #[error("token store failure: {0}")]
    Store(#[source] mailtriage_oauth::Error),

    /// The token endpoint refused the refresh.
    #[error("token refresh failed: {0}")]
    Refresh(#[source] mailtriage_oauth::Error),

    /// Interactive consent failed or was denied.
    #[error("consent failed: {0}")]
    Consent(#[source] mailtriage_oauth::Error),
}

/// Fetching tickets failed for a reason other than rate limiting.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// No usable credential.
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// The mailbox API failed.
    #[error("mailbox error: {0}")]
    Mailbox(#[from] mailtriage_gmail::Error),
}

impl SourceError {
    /// Whether the mailbox refused the request because of quota.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Mailbox(e) if e.is_rate_limited())
    }
}

/// A chat-completion call failed.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// Connection failure or timeout.
    #[error("chat transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status.
    #[error("chat API error {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Server-provided message or raw body.
        message: String,
    },

    /// The response body was not a completion envelope.
    #[error("undecodable chat response: {0}")]
    Envelope(String),

    /// The response carried no choice or empty content.
    #[error("chat response has no content")]
    EmptyReply,
}

impl ChatError {
    /// How this error is reported on the ticket.
    #[must_use]
    pub const fn failure_reason(&self) -> FailureReason {
        match self {
            Self::Transport(_) => FailureReason::ServiceUnreachable,
            Self::Api { status, .. } => FailureReason::ServiceRejected { status: *status },
            Self::Envelope(_) | Self::EmptyReply => FailureReason::MalformedOutput,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(Error::from(ConfigError::Missing("GROQ_API_KEY")).exit_code(), 2);
        let source = SourceError::Mailbox(mailtriage_gmail::Error::from_response(500, "boom"));
        assert_eq!(Error::from(source).exit_code(), 1);
    }

    #[test]
    fn test_rate_limit_detection() {
        let limited = SourceError::Mailbox(mailtriage_gmail::Error::from_response(429, ""));
        assert!(limited.is_rate_limited());

        let denied = SourceError::Credential(CredentialError::Consent(
            mailtriage_oauth::Error::AccessDenied,
        ));
        assert!(!denied.is_rate_limited());
    }

    #[test]
    fn test_chat_failure_reasons() {
        assert_eq!(
            ChatError::Api {
                status: 503,
                message: String::new()
            }
            .failure_reason(),
            FailureReason::ServiceRejected { status: 503 }
        );
        assert_eq!(
            ChatError::EmptyReply.failure_reason(),
            FailureReason::MalformedOutput
        );
    }

    #[test]
    fn test_missing_key_message() {
        let err = ConfigError::Missing("GROQ_API_KEY");
        assert!(err.to_string().contains("GROQ_API_KEY"));
    }
}
