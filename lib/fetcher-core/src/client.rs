//! The network primitive.
//!
//! [`HttpClient`] is the only place where bytes leave the process. The
//! fetcher executor is generic over it, so tests can swap the real transport
//! for a recording stub.

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;

use crate::{Request, Response, Result};

/// Core HTTP client trait.
///
/// Implementations return every response, whatever its status: turning
/// non-2xx responses into [`ApiError`](crate::ApiError)s is the executor's
/// job. Only transport failures are errors here.
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be completed:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send;
}

impl<C: HttpClient> HttpClient for Arc<C> {
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send {
        C::execute(self, request)
    }
}
