//! Base-URL bound HTTP fetchers with interceptors and structured API errors.
//!
//! A [`Fetcher`] binds a base URL, default headers and an optional
//! [`Interceptor`]. [`Fetcher::path`] joins path segments into an
//! [`Endpoint`], and each call on it returns a classified [`Payload`]:
//! parsed JSON, raw text, or [`Payload::NoContent`] for a `204`. Non-2xx
//! responses become [`Error::Api`] carrying an [`ApiError`].
//!
//! # Example
//!
//! ```no_run
//! use fetcher::prelude::*;
//! use fetcher::interceptors::BearerAuth;
//!
//! #[derive(Debug, Deserialize)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! # async fn run() -> fetcher::Result<()> {
//! let api = Fetcher::new("https://api.example.com")?
//!     .with_interceptor(BearerAuth::new("token"));
//!
//! match api.path(["users", "42"]).fetch::<User>(RequestOptions::get()).await {
//!     Ok(user) => println!("{} is #{}", user.name, user.id),
//!     Err(Error::Api(error)) if error.is_not_found() => println!("no such user"),
//!     Err(error) => return Err(error),
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod connector;
mod fetcher;
pub mod interceptors;
pub mod middleware;
pub mod prelude;

pub use client::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_USER_AGENT};
pub use connector::https_connector;
pub use fetcher::{BaseFetcher, Endpoint, Fetcher, UNKNOWN_API_ERROR};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use fetcher_core::{
    ApiError, Body, Chain, ContentType, Error, Form, HttpClient, InterceptFuture, Interceptor,
    Method, NO_INFO, NON_SERIALIZABLE, Part, Payload, Request, RequestBuilder, RequestOptions,
    Response, Result, SharedInterceptor, build_path, compose, from_json, interceptor,
    query_string, to_form, to_json,
};

// Re-export http types for status codes and headers
pub use fetcher_core::{StatusCode, header};

pub use url;
