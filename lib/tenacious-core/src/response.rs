//! HTTP response handling.
//!
//! - [`Response`] is what a transport returns for one attempt.
//! - [`Resp`] is what a send returns: the content of the last attempt with
//!   lazily decoded text and JSON helpers.
//!
//! # Example
//!
//! ```ignore
//! let resp = req.post().await?;
//! let user: User = resp.json()?;
//! println!("{}", resp.text());
//! ```

use std::collections::HashMap;
use std::sync::OnceLock;

use bytes::Bytes;

// ============================================================================
// Transport Response
// ============================================================================

/// HTTP response with status, headers, and body.
#[derive(Debug, Clone)]
pub struct Response<B = Bytes> {
    status: u16,
    headers: HashMap<String, String>,
    body: B,
}

impl<B> Response<B> {
    /// Creates a new response.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>, body: B) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Response body.
    #[must_use]
    pub const fn body(&self) -> &B {
        &self.body
    }

    /// Consume into body.
    #[must_use]
    pub fn into_body(self) -> B {
        self.body
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

// ============================================================================
// Response Envelope
// ============================================================================

/// The response handed back by a send.
///
/// Built from the last attempt, whether it succeeded or not. When that
/// attempt failed at the transport level there is no underlying response and
/// the content is empty.
#[derive(Debug, Default)]
pub struct Resp {
    content: Bytes,
    raw: Option<Response<Bytes>>,
    text: OnceLock<String>,
}

impl Resp {
    /// Wraps the last transport response, if any.
    #[must_use]
    pub fn new(raw: Option<Response<Bytes>>) -> Self {
        let content = raw
            .as_ref()
            .map(|response| response.body().clone())
            .unwrap_or_default();
        Self {
            content,
            raw,
            text: OnceLock::new(),
        }
    }

    /// Raw response content.
    #[must_use]
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Underlying transport response.
    #[must_use]
    pub fn raw(&self) -> Option<&Response<Bytes>> {
        self.raw.as_ref()
    }

    /// HTTP status code, if a response was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.raw.as_ref().map(Response::status)
    }

    /// Single response header by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.raw.as_ref().and_then(|response| response.header(name))
    }

    /// A response was received and its status is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.raw.as_ref().is_some_and(Response::is_success)
    }

    /// Content decoded as text.
    ///
    /// Invalid UTF-8 sequences are replaced. The text is decoded on the first
    /// call and cached for the following ones.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text
            .get_or_init(|| String::from_utf8_lossy(&self.content).into_owned())
    }

    /// Deserialize the content as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::JsonDeserialization`] if the content does not
    /// match `T`.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> crate::Result<T> {
        crate::from_json(&self.content)
    }

    /// Deserialize the content as JSON into an existing value.
    ///
    /// `target` is left untouched on failure.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::JsonDeserialization`] if the content does not
    /// match `T`.
    pub fn json_into<T: serde::de::DeserializeOwned>(&self, target: &mut T) -> crate::Result<()> {
        *target = self.json()?;
        Ok(())
    }
}
