//! Runtime configuration from the environment.

use crate::classification::chat::{DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::error::ConfigError;
use std::env;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Chat service API key.
pub const API_KEY_VAR: &str = "GROQ_API_KEY";
/// Model identifier override.
pub const MODEL_VAR: &str = "MAILTRIAGE_MODEL";
/// Chat API root override.
pub const API_BASE_VAR: &str = "MAILTRIAGE_API_BASE";
/// Path of the OAuth client secrets.
pub const CREDENTIALS_VAR: &str = "MAILTRIAGE_CREDENTIALS";
/// Path of the persisted token.
pub const TOKEN_VAR: &str = "MAILTRIAGE_TOKEN";
/// HTTP timeout in seconds.
pub const TIMEOUT_VAR: &str = "MAILTRIAGE_TIMEOUT_SECS";

/// Tickets fetched per run.
pub const BATCH_SIZE: NonZeroU32 = NonZeroU32::MIN.saturating_add(2);

const DEFAULT_CREDENTIALS_PATH: &str = "credentials.json";
const DEFAULT_TOKEN_PATH: &str = "token.json";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything the pipeline needs to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Bearer key for the chat service.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Chat API root.
    pub api_base: String,
    /// OAuth client secrets file.
    pub credentials_path: PathBuf,
    /// Token file.
    pub token_path: PathBuf,
    /// Timeout applied to every HTTP request.
    pub timeout: Duration,
    /// Tickets fetched per run.
    pub batch_size: NonZeroU32,
}

impl Config {
    /// Loads `.env` from the working directory if present, then reads the
    /// process environment. Variables already set are not overridden.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the API key is missing or an override is
    /// invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "loaded .env"),
            Err(e) if e.not_found() => debug!("no .env file"),
            Err(e) => debug!("ignoring unreadable .env: {e}"),
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Blank values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the API key is missing or an override is
    /// invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_key = get(API_KEY_VAR).ok_or(ConfigError::Missing(API_KEY_VAR))?;

        let timeout = match get(TIMEOUT_VAR) {
            Some(value) => parse_timeout(&value)?,
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            api_key,
            model: get(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base: get(API_BASE_VAR).unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            credentials_path: get(CREDENTIALS_VAR)
                .map_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_PATH), PathBuf::from),
            token_path: get(TOKEN_VAR)
                .map_or_else(|| PathBuf::from(DEFAULT_TOKEN_PATH), PathBuf::from),
            timeout,
            batch_size: BATCH_SIZE,
        })
    }
}

fn parse_timeout(value: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: &str| ConfigError::Invalid {
        var: TIMEOUT_VAR,
        value: value.to_string(),
        reason: reason.to_string(),
    };
    match value.parse::<u64>() {
        Ok(0) => Err(invalid("must be at least 1 second")),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(invalid(&e.to_string())),
    }
}
