//! Core types and traits for the tenacious retrying HTTP client.
//!
//! This crate provides the transport-independent building blocks:
//! - [`Vals`] - ordered key/value parameters with URL-encoded and JSON renderings
//! - [`build_url`] - base URL + path + query resolution
//! - [`RetryPolicy`], [`should_retry_on_status`], [`should_retry_on_text_marker`] - retry decisions
//! - [`Method`] - HTTP method enum
//! - [`Request`] and [`RequestBuilder`] - transport-ready requests
//! - [`Response`] - buffered transport response
//! - [`Resp`] - response envelope returned by a send
//! - [`Error`] and [`Result`] - error handling
//! - [`HttpClient`] - transport trait

mod body;
mod client;
mod error;
mod method;
mod policy;
pub mod prelude;
mod request;
mod resolve;
mod response;
mod vals;

pub use body::{ContentType, from_json, to_json};
pub use client::HttpClient;
pub use error::{Error, Result};
pub use method::Method;
pub use policy::{RetryPolicy, should_retry_on_status, should_retry_on_text_marker};
pub use request::{Cookie, Request, RequestBuilder};
pub use resolve::build_url;
pub use response::{Resp, Response};
pub use vals::{Entry, Vals, Value};

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
