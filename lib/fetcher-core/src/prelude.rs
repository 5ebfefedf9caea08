//! Prelude module for convenient imports.
//!
//! ```ignore
//! use fetcher_core::prelude::*;
//! ```

pub use crate::{
    ApiError, Body, Error, Form, HttpClient, Interceptor, Method, Part, Payload, RequestOptions,
    Result, build_path, compose, query_string,
};
