//! Per-exchange logging with `tracing`.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use bytes::Bytes;
use tower::{Layer, Service};
use tracing::{Instrument, Level, debug, info, span, warn};

use crate::{Error, Request, Response, Result};

/// Layer that logs each exchange handed to the transport.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer {
    level: LogLevel,
}

/// Verbosity of [`LoggingLayer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Headers, body sizes and transport overrides.
    Debug,
    /// One line per exchange.
    #[default]
    Info,
}

impl LoggingLayer {
    /// Info-level logging.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Debug-level logging.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            level: LogLevel::Debug,
        }
    }

    /// The configured verbosity.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            level: self.level,
        }
    }
}

/// Service produced by [`LoggingLayer`].
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
    level: LogLevel,
}

impl<S> Service<Request<Bytes>> for Logging<S>
where
    S: Service<Request<Bytes>, Response = Response<Bytes>, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        let method = request.method();
        let url = request.url().to_string();
        let level = self.level;

        let span = span!(Level::DEBUG, "exchange", %method, %url);

        match level {
            LogLevel::Debug => debug!(
                headers = ?request.headers(),
                body_len = request.body().map_or(0, Bytes::len),
                timeout = ?request.timeout(),
                proxy = request.proxy().map(url::Url::as_str),
                "dispatching"
            ),
            LogLevel::Info => info!(%method, %url, "dispatching"),
        }

        let mut inner = self.inner.clone();
        Box::pin(
            async move {
                let start = Instant::now();
                let result = inner.call(request).await;
                let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

                match (&result, level) {
                    (Ok(response), LogLevel::Debug) => debug!(
                        status = response.status(),
                        body_len = response.body().len(),
                        headers = ?response.headers(),
                        elapsed_ms,
                        "exchange completed"
                    ),
                    (Ok(response), LogLevel::Info) => {
                        info!(status = response.status(), elapsed_ms, "exchange completed");
                    }
                    // a retry may still recover from this
                    (Err(err), _) => warn!(error = %err, elapsed_ms, "exchange failed"),
                }

                result
            }
            .instrument(span),
        )
    }
}
