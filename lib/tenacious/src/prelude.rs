//! Prelude module for convenient imports.
//!
//! ```ignore
//! use tenacious::prelude::*;
//! ```

pub use crate::{
    ClientConfig, Cookie, Entry, Error, HttpClient, HyperClient, Method, Middleware, Req,
    RequestSpec, Resp, Result, RetryPolicy, StatusCode, Vals, Value,
};
pub use serde::{Deserialize, Serialize};
