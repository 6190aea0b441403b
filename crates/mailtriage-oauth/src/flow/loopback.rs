//! Interactive consent through a loopback redirect (RFC 8252 §7.3).
//!
//! A one-shot HTTP listener on `127.0.0.1` receives the authorization
//! redirect, so the user never has to copy a code by hand.

use super::{AuthorizationCodeFlow, OAuthClient};
use crate::error::{Error, Result};
use crate::token::Token;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::time;
use tracing::{debug, info, warn};
use url::Url;

/// How long one connection may take to deliver its request.
const REQUEST_READ_TIMEOUT: Duration = Duration::from_secs(10);

const SUCCESS_PAGE: &str = "<html><body><h1>Authorization complete</h1>\
<p>You can close this window and return to the terminal.</p></body></html>";

const FAILURE_PAGE: &str = "<html><body><h1>Authorization failed</h1>\
<p>Return to the terminal for details.</p></body></html>";

/// Runs the authorization code flow against a local redirect listener.
#[derive(Debug)]
pub struct LoopbackConsent {
    client: OAuthClient,
    open_browser: bool,
}

impl LoopbackConsent {
    /// Creates a consent runner for the given client.
    #[must_use]
    pub const fn new(client: OAuthClient) -> Self {
        Self {
            client,
            open_browser: true,
        }
    }

    /// Only prints the consent URL instead of launching a browser.
    #[must_use]
    pub const fn without_browser(mut self) -> Self {
        self.open_browser = false;
        self
    }

    /// Asks the user for consent and exchanges the resulting code for a token.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider has no scopes, the listener cannot
    /// be bound, the user denies access, the redirect is forged, or the code
    /// exchange fails.
    pub async fn authorize(self) -> Result<Token> {
        self.client.provider.validate()?;

        let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
        let port = listener.local_addr()?.port();
        let open_browser = self.open_browser;
        let flow = AuthorizationCodeFlow::new(self.client, format!("http://127.0.0.1:{port}/"));

        present(&flow.consent_url(), open_browser);

        let redirect = accept_redirect(&listener, REQUEST_READ_TIMEOUT).await?;
        let code = redirect.into_code(flow.state())?;

        info!("authorization granted, exchanging code");
        flow.exchange_code(&code).await
    }
}

fn present(consent_url: &Url, open_browser: bool) {
    eprintln!("Open this URL in your browser to authorize mailbox access:\n\n{consent_url}\n");
    if open_browser {
        if let Err(e) = opener::open(consent_url.as_str()) {
            warn!("could not launch a browser: {e}");
        }
    }
}

/// Query parameters carried by the authorization redirect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Redirect {
    /// Authorization code.
    pub code: Option<String>,
    /// Echoed CSRF state.
    pub state: Option<String>,
    /// Error code when the user or server refused.
    pub error: Option<String>,
}

impl Redirect {
    /// Parses an HTTP request line such as `GET /?code=abc&state=xyz HTTP/1.1`.
    ///
    /// Returns `Ok(None)` for requests that are not the redirect itself
    /// (the browser asking for `/favicon.ico`, for instance).
    ///
    /// # Errors
    ///
    /// Returns an error if the line is not an HTTP request line.
    pub fn from_request_line(line: &str) -> Result<Option<Self>> {
        let mut parts = line.split_whitespace();
        let (Some(_method), Some(target)) = (parts.next(), parts.next()) else {
            return Err(Error::InvalidRedirect(line.trim().to_string()));
        };

        let url = Url::parse("http://127.0.0.1")?.join(target)?;
        if url.path() != "/" {
            return Ok(None);
        }

        let mut redirect = Self::default();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "code" => redirect.code = Some(value.into_owned()),
                "state" => redirect.state = Some(value.into_owned()),
                "error" => redirect.error = Some(value.into_owned()),
                _ => {}
            }
        }
        Ok(Some(redirect))
    }

    /// Checks the redirect against the state we sent and yields the code.
    ///
    /// # Errors
    ///
    /// Returns an error if access was denied, the state does not match,
    /// or no code is present.
    pub fn into_code(self, expected_state: &str) -> Result<String> {
        match self.error.as_deref() {
            Some("access_denied") => return Err(Error::AccessDenied),
            Some(other) => return Err(Error::oauth_error(other, "authorization refused")),
            None => {}
        }
        if self.state.as_deref() != Some(expected_state) {
            return Err(Error::StateMismatch);
        }
        self.code
            .filter(|c| !c.is_empty())
            .ok_or_else(|| Error::InvalidRedirect("redirect carries no code".into()))
    }
}

/// Waits for the browser to hit the redirect URI and answers it.
///
/// Connections that send nothing, send garbage, or stay silent for
/// `read_timeout` are dropped and the listener keeps waiting.
pub(crate) async fn accept_redirect(
    listener: &TcpListener,
    read_timeout: Duration,
) -> Result<Redirect> {
    loop {
        let (stream, peer) = listener.accept().await?;
        debug!(%peer, "redirect listener connection");

        match time::timeout(read_timeout, serve_connection(stream)).await {
            Ok(Ok(Some(redirect))) => return Ok(redirect),
            Ok(Ok(None)) => {}
            Ok(Err(e)) => debug!(%peer, "dropping connection: {e}"),
            Err(_) => debug!(%peer, "dropping idle connection"),
        }
    }
}

async fn serve_connection(stream: TcpStream) -> Result<Option<Redirect>> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).await? == 0 {
        return Ok(None);
    }
    drain_headers(&mut reader).await?;

    match Redirect::from_request_line(&request_line) {
        Ok(Some(redirect)) => {
            let page = if redirect.code.is_some() {
                SUCCESS_PAGE
            } else {
                FAILURE_PAGE
            };
            write_response(&mut write_half, "200 OK", page).await?;
            Ok(Some(redirect))
        }
        Ok(None) => {
            write_response(&mut write_half, "404 Not Found", "").await?;
            Ok(None)
        }
        Err(e) => {
            debug!("unparseable request: {e}");
            write_response(&mut write_half, "400 Bad Request", "").await?;
            Ok(None)
        }
    }
}

async fn drain_headers<R>(reader: &mut R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 || line.trim().is_empty() {
            return Ok(());
        }
    }
}

async fn write_response<W>(writer: &mut W, status: &str, body: &str) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    writer.write_all(response.as_bytes()).await?;
    writer.shutdown().await?;
    Ok(())
}
