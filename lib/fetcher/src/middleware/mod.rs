//! Tower middleware for [`HyperClient`](crate::HyperClient).
//!
//! Layers wrap the raw transport and see every [`Request`](crate::Request)
//! after the fetcher has merged headers and run its interceptor. Add them
//! with [`HyperClientBuilder::layer`](crate::HyperClientBuilder::layer):
//!
//! ```ignore
//! use fetcher::HyperClient;
//! use fetcher::middleware::{ConcurrencyLimitLayer, LoggingLayer};
//!
//! let client = HyperClient::builder()
//!     .layer(LoggingLayer::debug())
//!     .layer(ConcurrencyLimitLayer::new(8))
//!     .build();
//! ```
//!
//! Redirects are followed by [`FollowRedirectLayer`], which the client
//! installs innermost unless
//! [`max_redirects`](crate::HyperClientBuilder::max_redirects) is `0`.

mod follow_redirect;
mod logging;

pub use follow_redirect::{DEFAULT_MAX_REDIRECTS, FollowRedirect, FollowRedirectLayer};
pub use logging::{LogLevel, Logging, LoggingLayer};

pub use tower::limit::ConcurrencyLimitLayer;
pub use tower::{Layer, ServiceBuilder};
