//! Round-trip logging for the transport.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use bytes::Bytes;
use tower::{Layer, Service};
use tracing::{Instrument, Level, debug, info, span, warn};

use crate::{Error, Request, Response, Result};

/// Layer logging every round trip through `tracing`.
///
/// # Example
///
/// ```ignore
/// use fetcher::HyperClient;
/// use fetcher::middleware::LoggingLayer;
///
/// let client = HyperClient::builder().layer(LoggingLayer::debug()).build();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer {
    level: LogLevel,
}

/// Verbosity of [`LoggingLayer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Request headers and body size at debug level.
    Debug,
    /// Method, URL and outcome at info level.
    #[default]
    Info,
}

impl LoggingLayer {
    /// Create a logging layer at info level.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a logging layer at debug level.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            level: LogLevel::Debug,
        }
    }

    /// The configured verbosity.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            level: self.level,
        }
    }
}

/// Service produced by [`LoggingLayer`].
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
    level: LogLevel,
}

impl<S> Service<Request<Bytes>> for Logging<S>
where
    S: Service<Request<Bytes>, Response = Response<Bytes>, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        let method = request.method();
        let url = request.url().to_string();
        let level = self.level;

        let span = span!(Level::INFO, "http_request", %method, %url);

        // The clone is not ready; keep the service that was polled.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(
            async move {
                let start = Instant::now();

                match level {
                    LogLevel::Debug => debug!(
                        headers = ?request.headers(),
                        body_len = request.body().map_or(0, Bytes::len),
                        "sending request"
                    ),
                    LogLevel::Info => info!("sending request"),
                }

                let result = inner.call(request).await;
                let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

                match &result {
                    Ok(response) if response.is_success() => {
                        info!(status = response.status(), elapsed_ms, "response received");
                    }
                    Ok(response) => {
                        warn!(status = response.status(), elapsed_ms, "HTTP error response");
                    }
                    Err(err) => warn!(error = %err, elapsed_ms, "transport failure"),
                }

                result
            }
            .instrument(span),
        )
    }
}
