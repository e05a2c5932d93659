//! Retrying HTTP client for REST API consumers.
//!
//! A [`Req`] describes one call: base URL, path, ordered query/form
//! parameters ([`Vals`]), headers, cookies, body, proxy and a declarative
//! [`RetryPolicy`]. [`Req::send`] rebuilds and re-dispatches it until an
//! attempt succeeds or the policy is exhausted, running each registered
//! [`Middleware`] before every attempt.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use tenacious::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! struct Ticker {
//!     last: String,
//! }
//!
//! let client = HyperClient::new();
//! let mut req = Req::new(&client, "https://api.example.com/")
//!     .path("v1/ticker")
//!     .params(Vals::from([("pair", "BTCUSD")]))
//!     .retry(
//!         RetryPolicy::default()
//!             .with_attempts(5)
//!             .with_delay(Duration::from_millis(250)),
//!     );
//!
//! let ticker: Ticker = req.get().await?.json()?;
//! ```
//!
//! When every attempt fails, the error still carries the last response:
//!
//! ```ignore
//! match req.get().await {
//!     Ok(resp) => println!("{}", resp.text()),
//!     Err(err) => {
//!         if let Some(resp) = err.response() {
//!             eprintln!("last status: {:?}", resp.status());
//!         }
//!     }
//! }
//! ```

mod client;
mod config;
mod connector;
pub mod layer;
mod middleware;
pub mod prelude;
mod req;

pub use client::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};
pub use config::ClientConfig;
pub use connector::{https_connector, proxy_connector};
pub use middleware::Middleware;
pub use req::{DEFAULT_TIMEOUT, Req, RequestSpec};

// Re-export tower for layer composition
pub use tower;

pub use tenacious_core::{
    ContentType, Cookie, Entry, Error, HttpClient, Method, Request, RequestBuilder, Resp,
    Response, Result, RetryPolicy, Vals, Value, build_url, from_json, should_retry_on_status,
    should_retry_on_text_marker, to_json,
};

// Re-export http types for status codes and headers
pub use tenacious_core::{StatusCode, header};
