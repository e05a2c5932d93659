//! Error types for tenacious.

use derive_more::{Display, Error, From};

use crate::Resp;

/// Main error type for tenacious operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// Reading the response body failed.
    #[display("response read error: {_0}")]
    #[from(skip)]
    Read(#[error(not(source))] String),

    /// Invalid request configuration.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// The proxy URL could not be parsed or is not an `http://host[:port]` proxy.
    #[display("invalid proxy URL '{url}': {reason}")]
    #[from(skip)]
    InvalidProxy {
        /// Proxy URL as configured.
        url: String,
        /// What is wrong with it.
        reason: String,
    },

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// Every attempt of a send failed.
    #[display("request failed after {attempts} attempt(s): {message}")]
    #[from(skip)]
    ExhaustedRetries {
        /// Number of attempts made.
        attempts: u32,
        /// Last failure reason, with method and URL.
        message: String,
        /// Response of the last attempt.
        #[error(not(source))]
        response: Box<Resp>,
    },
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create a response read error.
    #[must_use]
    pub fn read(message: impl Into<String>) -> Self {
        Self::Read(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create an invalid proxy error.
    #[must_use]
    pub fn invalid_proxy(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidProxy {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an exhausted retries error carrying the last response.
    #[must_use]
    pub fn exhausted(attempts: u32, message: impl Into<String>, response: Resp) -> Self {
        Self::ExhaustedRetries {
            attempts,
            message: message.into(),
            response: Box::new(response),
        }
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` if reading the response body failed.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        matches!(self, Self::Read(_))
    }

    /// Returns `true` if a send ran out of attempts.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        matches!(self, Self::ExhaustedRetries { .. })
    }

    /// Returns `true` for malformed base, path or proxy URLs.
    #[must_use]
    pub const fn is_invalid_url(&self) -> bool {
        matches!(self, Self::InvalidUrl(_) | Self::InvalidProxy { .. })
    }

    /// Response of the last attempt, for exhausted sends.
    #[must_use]
    pub fn response(&self) -> Option<&Resp> {
        match self {
            Self::ExhaustedRetries { response, .. } => Some(response),
            _ => None,
        }
    }

    /// Consume into the response of the last attempt, for exhausted sends.
    #[must_use]
    pub fn into_response(self) -> Option<Resp> {
        match self {
            Self::ExhaustedRetries { response, .. } => Some(*response),
            _ => None,
        }
    }
}
