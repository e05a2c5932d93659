//! Tower layers for [`crate::HyperClient`].
//!
//! Layers wrap the transport and therefore see every attempt of a retried
//! request individually. Register them with
//! [`crate::HyperClientBuilder::layer`]:
//!
//! ```ignore
//! use tenacious::HyperClient;
//! use tenacious::layer::LoggingLayer;
//!
//! let client = HyperClient::builder()
//!     .layer(LoggingLayer::debug())
//!     .build();
//! ```
//!
//! Any `tower::Layer` over [`crate::BoxedService`] works, including the
//! ones from `tower` itself.

mod logging;

pub use logging::{LogLevel, Logging, LoggingLayer};
