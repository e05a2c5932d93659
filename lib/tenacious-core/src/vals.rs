//! Ordered request parameters.
//!
//! [`Vals`] is an ordered sequence of key/value pairs used for query strings,
//! headers, form bodies and simple JSON bodies. Unlike a map it keeps the
//! insertion order and allows duplicate keys.
//!
//! # Example
//!
//! ```
//! use tenacious_core::Vals;
//!
//! let params = Vals::new().with("q", "rust http").with("page", 2);
//! assert_eq!(params.url_encode(), "q=rust+http&page=2");
//! assert_eq!(params.to_json(), r#"{"q":"rust http","page":2}"#);
//! ```

use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters escaped in a query component: everything except the unreserved set.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a query component, spaces become `+`.
fn query_escape(input: &str) -> String {
    utf8_percent_encode(input, QUERY_COMPONENT)
        .to_string()
        .replace("%20", "+")
}

/// Render a string as a quoted, escaped JSON string.
fn json_string(input: &str) -> String {
    serde_json::Value::String(input.to_owned()).to_string()
}

/// Detects pre-rendered JSON objects (`{...}`) and arrays (`[...]`).
fn is_raw_json(value: &str) -> bool {
    (value.starts_with('{') && value.ends_with('}'))
        || (value.starts_with('[') && value.ends_with(']'))
}

// ============================================================================
// Value
// ============================================================================

/// The value side of an [`Entry`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Text; rendered verbatim in JSON when it looks like an object or array.
    Text(String),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    Uint(u64),
    /// Floating point number.
    Float(f64),
    /// Boolean.
    Bool(bool),
}

impl Value {
    /// Returns the text if this is a [`Value::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns `true` for text holding a pre-rendered JSON object or array.
    #[must_use]
    pub fn is_raw_json(&self) -> bool {
        self.as_text().is_some_and(is_raw_json)
    }

    fn to_json(&self) -> String {
        match self {
            Self::Text(text) if is_raw_json(text) => text.clone(),
            Self::Text(text) => json_string(text),
            Self::Float(value) if !value.is_finite() => "null".to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Int(value) => write!(f, "{value}"),
            Self::Uint(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

macro_rules! value_from_int {
    ($variant:ident as $target:ty: $($source:ty),+) => {
        $(
            impl From<$source> for Value {
                fn from(value: $source) -> Self {
                    Self::$variant(<$target>::from(value))
                }
            }
        )+
    };
}

value_from_int!(Int as i64: i8, i16, i32, i64);
value_from_int!(Uint as u64: u8, u16, u32, u64);

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Self::Uint(u64::try_from(value).unwrap_or(u64::MAX))
    }
}

// ============================================================================
// Entry
// ============================================================================

/// A single `key: value` pair of [`Vals`].
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Parameter name.
    pub key: String,
    /// Parameter value.
    pub value: Value,
}

impl Entry {
    /// Creates a new entry.
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// The `Content-Type: application/json` header entry.
    #[must_use]
    pub fn content_type_json() -> Self {
        crate::ContentType::Json.header()
    }

    fn url_encode(&self) -> String {
        format!(
            "{}={}",
            query_escape(&self.key),
            query_escape(&self.value.to_string())
        )
    }

    fn to_json(&self) -> String {
        format!("{}:{}", json_string(&self.key), self.value.to_json())
    }
}

impl<K: Into<String>, V: Into<Value>> From<(K, V)> for Entry {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}

// ============================================================================
// Vals
// ============================================================================

/// Ordered key/value parameters.
///
/// None of the rendering methods mutate the receiver, and [`Vals::extend`]
/// returns a new sequence, so a `Vals` can be freely shared between requests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vals(Vec<Entry>);

impl Vals {
    /// Creates an empty sequence.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a pair, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(key, value);
        self
    }

    /// Appends a pair.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.push(Entry::new(key, value));
    }

    /// Appends an existing entry.
    pub fn push_entry(&mut self, entry: Entry) {
        self.0.push(entry);
    }

    /// Number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` when there are no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the entries in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.0.iter()
    }

    /// First value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| &entry.value)
    }

    /// Returns a new sequence holding `self` followed by `other`.
    ///
    /// The receiver is left untouched.
    #[must_use]
    pub fn extend(&self, other: &Self) -> Self {
        self.0.iter().chain(other.0.iter()).cloned().collect()
    }

    /// Encodes the pairs as `k1=v1&k2=v2`, percent-encoding keys and values.
    #[must_use]
    pub fn url_encode(&self) -> String {
        self.0
            .iter()
            .map(Entry::url_encode)
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Renders the pairs as a JSON object, keeping their order.
    ///
    /// Text values that look like a JSON object or array (for instance the
    /// output of another `to_json` call) are embedded as-is, without being
    /// validated. Other text is quoted, numbers and booleans are literal.
    #[must_use]
    pub fn to_json(&self) -> String {
        let pairs = self
            .0
            .iter()
            .map(Entry::to_json)
            .collect::<Vec<_>>()
            .join(",");
        format!("{{{pairs}}}")
    }
}

impl fmt::Display for Vals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let segments = self
            .0
            .iter()
            .map(Entry::to_json)
            .collect::<Vec<_>>()
            .join(" ");
        f.write_str(&segments)
    }
}

impl<E: Into<Entry>> FromIterator<E> for Vals {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Vals {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl From<Vec<Entry>> for Vals {
    fn from(entries: Vec<Entry>) -> Self {
        Self(entries)
    }
}

impl IntoIterator for Vals {
    type Item = Entry;
    type IntoIter = std::vec::IntoIter<Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Vals {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
