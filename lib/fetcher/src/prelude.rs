//! Prelude module for convenient imports.
//!
//! ```ignore
//! use fetcher::prelude::*;
//! ```

pub use crate::{
    ApiError, Body, ClientConfig, Endpoint, Error, Fetcher, Form, HttpClient, HyperClient,
    Interceptor, Method, Part, Payload, RequestOptions, Result, build_path, compose,
    query_string,
};
pub use serde::{Deserialize, Serialize};
