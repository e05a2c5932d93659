//! JSON bodies and their content types.

use std::fmt;

use crate::{Entry, Error, Result};

/// MIME type of a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// `application/json`
    Json,
    /// `application/x-www-form-urlencoded`
    FormUrlEncoded,
    /// `text/plain`
    PlainText,
}

impl ContentType {
    /// The MIME type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
            Self::PlainText => "text/plain",
        }
    }

    /// The `Content-Type` header entry, ready to push onto header [`crate::Vals`].
    #[must_use]
    pub fn header(self) -> Entry {
        Entry::new("Content-Type", self.as_str())
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serialize a value into a JSON request body.
///
/// # Errors
///
/// Returns [`Error::JsonSerialization`] if `value` cannot be represented as
/// JSON, e.g. a map with non-string keys.
///
/// ```
/// use std::collections::BTreeMap;
/// use tenacious_core::to_json;
///
/// let limits = BTreeMap::from([("max", 5), ("min", 1)]);
/// assert_eq!(to_json(&limits).expect("serializable"), r#"{"max":5,"min":1}"#);
/// ```
pub fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Error::from)
}

/// Decode a JSON response body.
///
/// Failures name the path of the offending field, e.g. `data.items[2].price`.
///
/// # Errors
///
/// Returns [`Error::JsonDeserialization`] on malformed JSON or a shape
/// mismatch.
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| Error::json_deserialization(e.path().to_string(), e.inner().to_string()))
}
