//! Core types and traits for the fetcher HTTP layer.
//!
//! This crate holds everything that does not depend on a concrete transport:
//! - [`build_path`] - Join path segments, keeping a trailing query string
//! - [`RequestOptions`] and [`Body`] - What a caller (or an interceptor) asks for
//! - [`Request`] and [`Response`] - What goes over the wire
//! - [`Payload`] - A classified response body
//! - [`ApiError`], [`Error`] and [`Result`] - Error handling
//! - [`HttpClient`] - The network primitive
//! - [`Interceptor`], [`Chain`] and [`compose`] - Request option hooks
//! - [`Form`] and [`Part`] - Multipart bodies
//! - [`StatusCode`] and [`header`] - Re-exported from the `http` crate

mod body;
mod client;
mod error;
pub mod interceptor;
mod method;
mod multipart;
mod path;
mod payload;
pub mod prelude;
mod request;
mod response;

pub use body::{Body, ContentType, from_json, query_string, to_form, to_json};
pub use client::HttpClient;
pub use error::{ApiError, Error, NO_INFO, NON_SERIALIZABLE, Result};
pub use interceptor::{Chain, InterceptFuture, Interceptor, SharedInterceptor, compose};
pub use method::Method;
pub use multipart::{Form, Part};
pub use path::build_path;
pub use payload::Payload;
pub use request::{Request, RequestBuilder, RequestOptions};
pub use response::Response;

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
