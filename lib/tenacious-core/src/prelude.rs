//! Prelude module for convenient imports.
//!
//! ```ignore
//! use tenacious_core::prelude::*;
//! ```

pub use crate::{
    ContentType, Cookie, Entry, Error, HttpClient, Method, Request, RequestBuilder, Resp,
    Response, Result, RetryPolicy, Vals, Value, build_url, from_json, to_json,
};
