//! Token persistence in a local JSON file.
//!
//! The file is opened, read or written, and closed on every call; no handle
//! or lock outlives the call.

use crate::error::Result;
use crate::token::Token;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};
use tracing::debug;

/// JSON file holding the last authorized [`Token`].
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Creates a store backed by `path`. Nothing is touched until first use.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the token file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored token, `None` when no file exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Option<Token>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = serde_json::from_str(&contents)?;
                debug!(path = %self.path.display(), "loaded stored token");
                Ok(Some(token))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no stored token");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Replaces the stored token. On Unix the file is readable by its
    /// owner only.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, token: &Token) -> Result<()> {
        let json = serde_json::to_string_pretty(token)?;
        let mut file = owner_only(OpenOptions::new().write(true).create(true).truncate(true))
            .open(&self.path)?;
        #[cfg(unix)]
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
        file.write_all(json.as_bytes())?;
        debug!(path = %self.path.display(), "stored token");
        Ok(())
    }
}

#[cfg(unix)]
fn owner_only(options: &mut OpenOptions) -> &mut OpenOptions {
    options.mode(0o600)
}

#[cfg(not(unix))]
const fn owner_only(options: &mut OpenOptions) -> &mut OpenOptions {
    options
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::Error;
    use chrono::{Duration, Utc};
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token.json"));
        let token = Token::new("access", "Bearer")
            .with_refresh_token("refresh")
            .with_expires_at(Utc::now() + Duration::hours(1));

        store.save(&token).unwrap();
        assert_eq!(store.load().unwrap(), Some(token));
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token.json"));
        store.save(&Token::new("old", "Bearer")).unwrap();
        store.save(&Token::new("new", "Bearer")).unwrap();
        assert_eq!(store.load().unwrap().unwrap().access_token, "new");
    }

    #[test]
    fn test_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("token.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(TokenStore::new(path).load(), Err(Error::Json(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_token_file_is_owner_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("token.json");
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        TokenStore::new(&path)
            .save(&Token::new("access", "Bearer").with_refresh_token("1//r"))
            .unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        let fresh = dir.path().join("fresh.json");
        TokenStore::new(&fresh).save(&Token::new("a", "Bearer")).unwrap();
        assert_eq!(fs::metadata(&fresh).unwrap().permissions().mode() & 0o777, 0o600);
    }
}
