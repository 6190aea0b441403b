//! Gmail message resources and body extraction.

use base64::Engine;
use base64::alphabet::URL_SAFE;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::Deserialize;
use tracing::warn;

/// Gmail sends base64url, sometimes padded and sometimes not.
const BODY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Entry of a `users.messages.list` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRef {
    /// Immutable message id.
    pub id: String,
    /// Thread the message belongs to.
    #[serde(default)]
    pub thread_id: String,
}

/// Body of a `users.messages.list` response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MessageList {
    /// Absent when the label is empty.
    #[serde(default)]
    pub messages: Vec<MessageRef>,
}

/// A message fetched with `format=full`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Immutable message id.
    pub id: String,
    /// Thread id.
    #[serde(default)]
    pub thread_id: String,
    /// Labels applied to the message.
    #[serde(default)]
    pub label_ids: Vec<String>,
    /// Short excerpt computed by Gmail.
    #[serde(default)]
    pub snippet: String,
    /// Parsed MIME structure.
    #[serde(default)]
    pub payload: Option<MessagePart>,
}

/// One node of the MIME tree.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePart {
    /// Part id within the message (`""` for the root).
    #[serde(default)]
    pub part_id: String,
    /// MIME type, e.g. `text/plain` or `multipart/alternative`.
    #[serde(default)]
    pub mime_type: String,
    /// Attachment filename, empty for inline parts.
    #[serde(default)]
    pub filename: String,
    /// Headers of this part (the root carries the RFC 2822 headers).
    #[serde(default)]
    pub headers: Vec<Header>,
    /// Body of a leaf part.
    #[serde(default)]
    pub body: Option<MessagePartBody>,
    /// Child parts of a multipart node.
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

/// A single header.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Header {
    /// Header name as sent.
    pub name: String,
    /// Raw header value.
    pub value: String,
}

/// Body data of a part.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePartBody {
    /// Set when the data must be fetched separately.
    #[serde(default)]
    pub attachment_id: Option<String>,
    /// Size in bytes.
    #[serde(default)]
    pub size: u64,
    /// Base64url-encoded content.
    #[serde(default)]
    pub data: Option<String>,
}

impl Message {
    /// Value of the first root header named `name` (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.payload.as_ref()?.header(name)
    }

    /// The `Subject` header.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.header("Subject")
    }

    /// First `text/plain` part with data, depth-first, decoded as UTF-8.
    ///
    /// Invalid UTF-8 is replaced rather than rejected.
    #[must_use]
    pub fn plain_text_body(&self) -> Option<String> {
        self.payload.as_ref()?.find_text("text/plain")
    }
}

impl MessagePart {
    /// Value of the first header named `name` (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// Whether this part's MIME type is `mime_type`, ignoring case and parameters.
    #[must_use]
    pub fn is_type(&self, mime_type: &str) -> bool {
        self.mime_type
            .split(';')
            .next()
            .is_some_and(|t| t.trim().eq_ignore_ascii_case(mime_type))
    }

    /// Decoded body bytes of this part, if it has inline data.
    #[must_use]
    pub fn decoded_data(&self) -> Option<Vec<u8>> {
        let data = self.body.as_ref()?.data.as_deref()?;
        match BODY_ENGINE.decode(data.trim()) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!(part_id = %self.part_id, "undecodable body data: {e}");
                None
            }
        }
    }

    /// Pre-order search for the first part of `mime_type` that has data.
    fn find_text(&self, mime_type: &str) -> Option<String> {
        if self.is_type(mime_type) {
            if let Some(bytes) = self.decoded_data() {
                return Some(String::from_utf8_lossy(&bytes).into_owned());
            }
        }
        self.parts.iter().find_map(|part| part.find_text(mime_type))
    }
}
