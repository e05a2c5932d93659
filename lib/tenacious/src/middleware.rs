//! Per-attempt request middleware.
//!
//! A [`Middleware`] runs on the sending task right before every attempt and
//! may rewrite anything in the [`RequestSpec`]: headers, params, body, even
//! the retry policy. Typical uses are signing requests with a fresh timestamp
//! or rotating a token between retries.
//!
//! ```ignore
//! use tenacious::{Req, RequestSpec};
//!
//! let mut req = Req::new(client, "https://api.example.com")
//!     .middleware(|spec: &mut RequestSpec| {
//!         spec.headers.push("X-Request-Time", now_millis());
//!     });
//! ```

use crate::RequestSpec;

/// Hook invoked before each attempt of [`crate::Req::send`].
///
/// Middleware run in registration order. Registering any middleware makes
/// the request rebuild from its [`RequestSpec`] on every attempt.
pub trait Middleware: Send + Sync {
    /// Adjust the request for the upcoming attempt.
    fn before_attempt(&self, spec: &mut RequestSpec);
}

impl<F> Middleware for F
where
    F: Fn(&mut RequestSpec) + Send + Sync,
{
    fn before_attempt(&self, spec: &mut RequestSpec) {
        self(spec);
    }
}
