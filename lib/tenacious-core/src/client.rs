//! The transport trait.
//!
//! [`HttpClient`] is the only thing a request needs from the network layer:
//! execute one fully built [`Request`] and hand back the buffered
//! [`Response`], or a transport error. The `tenacious` crate ships a
//! hyper-based implementation; tests and custom stacks can provide their own.

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;

use crate::{Request, Response, Result};

/// Core HTTP client trait.
///
/// Implementations must honour the per-request [`Request::timeout`] and
/// [`Request::proxy`] overrides without changing their shared configuration,
/// since one client is usually shared by many requests.
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// The body must be fully read before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason:
    /// - Network errors ([`crate::Error::Connection`])
    /// - TLS errors ([`crate::Error::Tls`])
    /// - Timeouts ([`crate::Error::Timeout`])
    /// - Body read failures ([`crate::Error::Read`])
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send;
}

impl<C: HttpClient> HttpClient for &C {
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send {
        (**self).execute(request)
    }
}

impl<C: HttpClient> HttpClient for Arc<C> {
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send {
        (**self).execute(request)
    }
}
