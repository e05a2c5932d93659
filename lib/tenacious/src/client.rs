//! The hyper-util transport behind [`crate::Req`].

use std::collections::HashMap;
use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{Client, ResponseFuture, connect::HttpConnector},
    rt::TokioExecutor,
};
use tower::util::BoxCloneSyncService;
use tower::{Layer, ServiceExt};
use tower_service::Service;
use url::Url;

use crate::{
    ClientConfig, Error, Request, Response, Result,
    connector::{https_connector, proxy_connector},
    layer::LoggingLayer,
};

/// Type-erased transport stack.
///
/// `Sync` so a [`HyperClient`] can be shared by reference across tasks.
pub type BoxedService = BoxCloneSyncService<Request<Bytes>, Response<Bytes>, Error>;

/// Future returned by the transport stack.
pub type ServiceFuture = Pin<Box<dyn Future<Output = Result<Response<Bytes>>> + Send + 'static>>;

/// The innermost service: talks to hyper directly.
#[derive(Clone)]
struct RawHyperClient {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    config: ClientConfig,
}

impl RawHyperClient {
    fn new(config: ClientConfig) -> Self {
        let connector = https_connector(&config);

        let inner = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.max_idle_per_host)
            .build(connector);

        Self { inner, config }
    }

    fn build_hyper_request(request: Request<Bytes>) -> Result<http::Request<Full<Bytes>>> {
        let (method, url, headers, body) = request.into_parts();

        let body = body.map_or_else(Full::default, Full::new);
        let mut hyper_request = http::Request::builder()
            .method(http::Method::from(method))
            .uri(url.as_str())
            .body(body)
            .map_err(|e| Error::invalid_request(e.to_string()))?;

        // insert, not append: one value per name whatever its case
        let wire = hyper_request.headers_mut();
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::invalid_request(format!("header {name:?}: {e}")))?;
            let value = HeaderValue::from_str(&value)
                .map_err(|e| Error::invalid_request(format!("header {name}: {e}")))?;
            wire.insert(name, value);
        }

        Ok(hyper_request)
    }

    fn extract_headers(headers: &http::HeaderMap) -> HashMap<String, String> {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }

    /// Dispatch through a throwaway client tunnelling to `proxy`.
    ///
    /// The pooled client is left untouched so concurrent requests
    /// without a proxy keep going direct.
    fn dispatch_via_proxy(
        &self,
        proxy: &Url,
        request: http::Request<Full<Bytes>>,
    ) -> Result<ResponseFuture> {
        let connector = proxy_connector(proxy, &self.config)?;
        let client: Client<_, Full<Bytes>> = Client::builder(TokioExecutor::new())
            .pool_max_idle_per_host(0)
            .build(connector);
        Ok(client.request(request))
    }

    async fn execute(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
        let timeout = request.timeout().unwrap_or(self.config.default_timeout);
        let proxy = request.proxy().cloned();
        let hyper_request = Self::build_hyper_request(request)?;

        let pending = match &proxy {
            Some(proxy) => self.dispatch_via_proxy(proxy, hyper_request)?,
            None => self.inner.request(hyper_request),
        };

        // the timeout covers the whole exchange, body included
        let exchange = async {
            let response = pending.await.map_err(Self::map_hyper_error)?;
            let status = response.status().as_u16();
            let response_headers = Self::extract_headers(response.headers());

            let body = response
                .into_body()
                .collect()
                .await
                .map_err(|e| Error::read(error_chain(&e)))?
                .to_bytes();

            Ok(Response::new(status, response_headers, body))
        };

        tokio::time::timeout(timeout, exchange)
            .await
            .map_err(|_| Error::Timeout)?
    }

    #[allow(clippy::needless_pass_by_value)]
    fn map_hyper_error(err: hyper_util::client::legacy::Error) -> Error {
        transport_error(err.is_connect(), error_chain(&err))
    }
}

/// Connect failures stay connection errors even when the chain mentions TLS.
fn transport_error(is_connect: bool, msg: String) -> Error {
    if is_connect {
        return Error::connection(msg);
    }

    let lower = msg.to_ascii_lowercase();
    if lower.contains("tls") || lower.contains("certificate") || lower.contains("ssl") {
        return Error::tls(msg);
    }

    Error::connection(msg)
}

/// Display an error together with its sources, `outer: inner: root`.
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}

impl Service<Request<Bytes>> for RawHyperClient {
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        let client = self.clone();
        Box::pin(async move { client.execute(request).await })
    }
}

/// HTTP client using hyper-util with connection pooling, TLS, per-request
/// proxies and Tower layer support.
///
/// One `HyperClient` is meant to be shared: clones share the same pool.
///
/// # Example
///
/// ```ignore
/// use tenacious::HyperClient;
/// use std::time::Duration;
///
/// let client = HyperClient::builder()
///     .connect_timeout(Duration::from_secs(5))
///     .with_logging()
///     .build();
/// ```
#[derive(Clone)]
pub struct HyperClient {
    service: BoxedService,
    config: ClientConfig,
}

impl std::fmt::Debug for HyperClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HyperClient {
    /// A client with [`ClientConfig::default`] and no layers.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// A client with `config` and no layers.
    #[must_use]
    pub fn with_config(config: ClientConfig) -> Self {
        let raw = RawHyperClient::new(config.clone());
        Self::with_service(BoxCloneSyncService::new(raw), config)
    }

    fn with_service(service: BoxedService, config: ClientConfig) -> Self {
        Self { service, config }
    }

    /// Start configuring a client with layers.
    #[must_use]
    pub fn builder() -> HyperClientBuilder {
        HyperClientBuilder::default()
    }

    /// The transport settings.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl Default for HyperClient {
    fn default() -> Self {
        Self::new()
    }
}

impl tenacious_core::HttpClient for HyperClient {
    async fn execute(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
        self.service.clone().oneshot(request).await
    }
}

impl Service<Request<Bytes>> for HyperClient {
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.service.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        self.service.call(request)
    }
}

/// Builder for [`HyperClient`].
///
/// ```ignore
/// use std::time::Duration;
/// use tenacious::HyperClient;
/// use tenacious::layer::LoggingLayer;
///
/// let client = HyperClient::builder()
///     .connect_timeout(Duration::from_secs(3))
///     .layer(LoggingLayer::debug())
///     .build();
/// ```
#[derive(Default)]
pub struct HyperClientBuilder {
    config: ClientConfig,
    wrappers: Vec<Box<dyn FnOnce(BoxedService) -> BoxedService + Send>>,
}

impl std::fmt::Debug for HyperClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperClientBuilder")
            .field("config", &self.config)
            .field("layers", &self.wrappers.len())
            .finish()
    }
}

impl HyperClientBuilder {
    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Fallback timeout for requests that carry none.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_default_timeout(timeout);
        self
    }

    /// TCP connect timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_connect_timeout(timeout);
        self
    }

    /// Idle connections kept per host.
    #[must_use]
    pub fn max_idle_per_host(mut self, count: usize) -> Self {
        self.config = self.config.with_max_idle_per_host(count);
        self
    }

    /// Idle connection timeout.
    #[must_use]
    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_pool_idle_timeout(timeout);
        self
    }

    /// Wrap the transport in a Tower layer.
    ///
    /// The first layer added sits closest to the network. Layers see each
    /// attempt of a retried request on its own.
    #[must_use]
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: Layer<BoxedService> + Send + 'static,
        L::Service: Service<Request<Bytes>, Response = Response<Bytes>, Error = Error>
            + Clone
            + Send
            + Sync
            + 'static,
        <L::Service as Service<Request<Bytes>>>::Future: Send,
    {
        self.wrappers
            .push(Box::new(move |service| BoxCloneSyncService::new(layer.layer(service))));
        self
    }

    /// Log each exchange at info level.
    #[must_use]
    pub fn with_logging(self) -> Self {
        self.layer(LoggingLayer::new())
    }

    /// Log each exchange at debug level, headers included.
    #[must_use]
    pub fn with_debug_logging(self) -> Self {
        self.layer(LoggingLayer::debug())
    }

    /// Build the client.
    #[must_use]
    pub fn build(self) -> HyperClient {
        let raw = RawHyperClient::new(self.config.clone());
        let service = self
            .wrappers
            .into_iter()
            .fold(BoxCloneSyncService::new(raw), |service, wrap| wrap(service));

        HyperClient::with_service(service, self.config)
    }
}
