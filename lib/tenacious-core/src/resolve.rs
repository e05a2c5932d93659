//! Full URL resolution from a base URL, a path and query parameters.

use url::Url;

use crate::{Result, Vals};

/// Resolve `path` against `base` and apply `query`.
///
/// `path` follows standard reference resolution: an absolute path replaces
/// the base path, a relative one is resolved against it. When `query` is
/// `Some` (even empty) it replaces any query string carried by `path`;
/// with `None` the query embedded in `path` is kept.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidUrl`] if `base` is not an absolute URL or
/// `path` is not a valid URL reference.
///
/// # Example
///
/// ```
/// use tenacious_core::{Vals, build_url};
///
/// let url = build_url("http://example.org", "get", Some(&Vals::from([("c", "d")])))?;
/// assert_eq!(url.as_str(), "http://example.org/get?c=d");
/// # Ok::<(), tenacious_core::Error>(())
/// ```
pub fn build_url(base: &str, path: &str, query: Option<&Vals>) -> Result<Url> {
    let base = Url::parse(base)?;
    let mut url = base.join(path)?;

    if let Some(query) = query {
        let encoded = query.url_encode();
        url.set_query((!encoded.is_empty()).then_some(encoded.as_str()));
    }

    Ok(url)
}
