//! Client secrets downloaded from the Google Cloud console.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// OAuth client registration for an installed application.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSecrets {
    /// Client ID.
    pub client_id: String,
    /// Client secret, absent for public clients.
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Authorization endpoint advertised in the file.
    #[serde(default)]
    pub auth_uri: Option<String>,
    /// Token endpoint advertised in the file.
    #[serde(default)]
    pub token_uri: Option<String>,
}

#[derive(Deserialize)]
struct SecretsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

impl ClientSecrets {
    /// Reads a `credentials.json` file (`installed` or `web` section).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or holds no usable client.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| Error::InvalidSecrets {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_json(&contents).map_err(|reason| Error::InvalidSecrets {
            path: path.to_path_buf(),
            reason,
        })
    }

    fn from_json(contents: &str) -> std::result::Result<Self, String> {
        let file: SecretsFile = serde_json::from_str(contents).map_err(|e| e.to_string())?;
        let secrets = file
            .installed
            .or(file.web)
            .ok_or_else(|| "neither an `installed` nor a `web` client".to_string())?;
        if secrets.client_id.is_empty() {
            return Err("client_id is empty".to_string());
        }
        Ok(secrets)
    }
}
