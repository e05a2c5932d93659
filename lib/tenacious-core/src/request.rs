//! Transport-ready HTTP requests.
//!
//! A [`Request`] is what an [`crate::HttpClient`] receives: an absolute URL,
//! headers with cookies already folded in, an optional body, and the
//! per-request timeout and proxy overrides.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use tenacious_core::{Cookie, Method, Request};
//! use bytes::Bytes;
//!
//! let request = Request::<Bytes>::builder(Method::Get, "https://api.example.com".parse().unwrap())
//!     .header("Accept", "application/json")
//!     .cookie(&Cookie::new("session", "abc"))
//!     .timeout(Duration::from_secs(5))
//!     .build();
//!
//! assert_eq!(request.header("Cookie"), Some("session=abc"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use url::Url;

use crate::Method;

/// A request cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
}

impl Cookie {
    /// Creates a new cookie.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// An HTTP request with method, URL, headers, optional body and transport overrides.
#[derive(Debug, Clone)]
pub struct Request<B = Bytes> {
    method: Method,
    url: Url,
    headers: HashMap<String, String>,
    body: Option<B>,
    timeout: Option<Duration>,
    proxy: Option<Url>,
}

impl<B> Request<B> {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, url: Url) -> RequestBuilder<B> {
        RequestBuilder::new(method, url)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Request URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Mutable access to headers.
    #[must_use]
    pub fn headers_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.headers
    }

    /// Single header value by name, case-insensitive.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> Option<&B> {
        self.body.as_ref()
    }

    /// Timeout for this request, overriding the transport default.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Proxy this request must go through.
    #[must_use]
    pub const fn proxy(&self) -> Option<&Url> {
        self.proxy.as_ref()
    }

    /// Consume into (method, url, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (Method, Url, HashMap<String, String>, Option<B>) {
        (self.method, self.url, self.headers, self.body)
    }
}

/// Builder for constructing [`Request`] instances.
#[derive(Debug, Clone)]
pub struct RequestBuilder<B = Bytes> {
    method: Method,
    url: Url,
    headers: HashMap<String, String>,
    body: Option<B>,
    timeout: Option<Duration>,
    proxy: Option<Url>,
}

impl<B> RequestBuilder<B> {
    /// Creates a new builder.
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HashMap::new(),
            body: None,
            timeout: None,
            proxy: None,
        }
    }

    /// Sets a header, replacing any previous value under the same name.
    ///
    /// Names compare case-insensitively: `x-key` replaces `X-Key`.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|key, _| !key.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
        self
    }

    /// Sets multiple headers, in order.
    #[must_use]
    pub fn headers(self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        headers
            .into_iter()
            .fold(self, |builder, (name, value)| builder.header(name, value))
    }

    /// Adds a cookie to the `Cookie` header, whatever case it was set with.
    #[must_use]
    pub fn cookie(mut self, cookie: &Cookie) -> Self {
        let pair = cookie.to_string();
        match self
            .headers
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case("Cookie"))
        {
            Some((_, existing)) => {
                existing.push_str("; ");
                existing.push_str(&pair);
            }
            None => {
                self.headers.insert("Cookie".to_string(), pair);
            }
        }
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: B) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets the timeout for this request.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Routes this request through a proxy.
    #[must_use]
    pub fn proxy(mut self, proxy: Url) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Builds the [`Request`].
    #[must_use]
    pub fn build(self) -> Request<B> {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
            timeout: self.timeout,
            proxy: self.proxy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("https://api.example.com/users").expect("valid URL")
    }

    #[test]
    fn request_builder_basic() {
        let request = Request::<Bytes>::builder(Method::Get, url())
            .header("Accept", "application/json")
            .build();

        assert_eq!(request.method(), Method::Get);
        assert_eq!(request.url().as_str(), "https://api.example.com/users");
        assert_eq!(request.header("Accept"), Some("application/json"));
        assert!(request.body().is_none());
        assert!(request.timeout().is_none());
        assert!(request.proxy().is_none());
    }

    #[test]
    fn header_set_replaces() {
        let request = Request::<Bytes>::builder(Method::Get, url())
            .header("X-Token", "first")
            .header("X-Token", "second")
            .build();

        assert_eq!(request.header("X-Token"), Some("second"));
    }

    #[test]
    fn header_set_ignores_name_case() {
        let request = Request::<Bytes>::builder(Method::Post, url())
            .headers([
                ("content-type".to_string(), "text/plain".to_string()),
                ("X-Key".to_string(), "a".to_string()),
                ("x-key".to_string(), "b".to_string()),
            ])
            .header("Content-Type", "application/json")
            .build();

        assert_eq!(request.headers().len(), 2);
        assert_eq!(request.header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(request.header("X-Key"), Some("b"));
    }

    #[test]
    fn cookie_joins_lowercase_header() {
        let request = Request::<Bytes>::builder(Method::Get, url())
            .header("cookie", "a=1")
            .cookie(&Cookie::new("b", "2"))
            .build();

        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.header("Cookie"), Some("a=1; b=2"));
    }

    #[test]
    fn cookies_are_joined() {
        let request = Request::<Bytes>::builder(Method::Get, url())
            .cookie(&Cookie::new("CookieName1", "CookieVal1"))
            .cookie(&Cookie::new("CookieName2", "CookieVal2"))
            .build();

        assert_eq!(
            request.header("Cookie"),
            Some("CookieName1=CookieVal1; CookieName2=CookieVal2")
        );
    }

    #[test]
    fn cookie_appends_to_explicit_header() {
        let request = Request::<Bytes>::builder(Method::Get, url())
            .header("Cookie", "a=1")
            .cookie(&Cookie::new("b", "2"))
            .build();

        assert_eq!(request.header("Cookie"), Some("a=1; b=2"));
    }

    #[test]
    fn request_builder_with_overrides() {
        let proxy = Url::parse("http://proxy.local:3128").expect("valid URL");
        let body = Bytes::from("n1=v1");
        let request = Request::builder(Method::Post, url())
            .body(body.clone())
            .timeout(Duration::from_secs(2))
            .proxy(proxy.clone())
            .build();

        assert_eq!(request.method(), Method::Post);
        assert_eq!(request.body(), Some(&body));
        assert_eq!(request.timeout(), Some(Duration::from_secs(2)));
        assert_eq!(request.proxy(), Some(&proxy));
    }
}
