//! # mailtriage-oauth
//!
//! `OAuth2` authorization for installed (desktop/CLI) applications that read
//! a mailbox on the user's behalf.
//!
//! ## Features
//!
//! - **Authorization Code Flow** with PKCE and CSRF `state`
//! - **Loopback consent**: opens the browser and captures the redirect on
//!   `127.0.0.1`
//! - **Token management**: refresh, expiration checking, JSON persistence
//! - **Client secrets**: reads Google's `credentials.json`
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailtriage_oauth::{ClientSecrets, LoopbackConsent, OAuthClient, Provider, TokenStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let secrets = ClientSecrets::from_file("credentials.json")?;
//!     let client = OAuthClient::from_secrets(&secrets, Provider::google()?);
//!     let store = TokenStore::new("token.json");
//!
//!     let token = match store.load()? {
//!         Some(token) if token.is_valid() => token,
//!         Some(token) if token.is_refreshable() => client.refresh_token(&token).await?,
//!         _ => LoopbackConsent::new(client).authorize().await?,
//!     };
//!     store.save(&token)?;
//!
//!     println!("Access token: {}", token.access_token);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
pub mod flow;
pub mod provider;
pub mod secrets;
pub mod store;
pub mod token;

pub use error::{Error, Result};
pub use flow::{AuthorizationCodeFlow, LoopbackConsent, OAuthClient, PkceChallenge};
pub use provider::Provider;
pub use secrets::ClientSecrets;
pub use store::TokenStore;
pub use token::Token;
