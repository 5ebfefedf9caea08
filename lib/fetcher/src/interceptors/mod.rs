//! Built-in interceptors.
//!
//! Each one implements [`Interceptor`](crate::Interceptor) and can be set on a
//! [`Fetcher`](crate::Fetcher) directly or combined with
//! [`compose!`](crate::compose!):
//!
//! ```
//! use fetcher::compose;
//! use fetcher::interceptors::{BearerAuth, LoggingInterceptor, SetHeader};
//!
//! let chain = compose!(
//!     SetHeader::new("X-Client", "dashboard"),
//!     BearerAuth::new("secret"),
//!     LoggingInterceptor::new(),
//! );
//! assert_eq!(chain.len(), 3);
//! ```

mod auth;
mod header;
mod logging;

pub use auth::{BasicAuth, BearerAuth};
pub use header::SetHeader;
pub use logging::LoggingInterceptor;
