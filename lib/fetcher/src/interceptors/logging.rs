//! Request option logging.

use tracing::{Level, debug, info};

use crate::{InterceptFuture, Interceptor, RequestOptions};

/// Logs the outgoing options and passes them through unchanged.
///
/// Header values are logged as-is: place it before auth interceptors in a
/// chain to keep credentials out of the logs.
#[derive(Debug, Clone, Copy)]
pub struct LoggingInterceptor {
    level: Level,
}

impl Default for LoggingInterceptor {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingInterceptor {
    /// Log at info level.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Log at debug level.
    #[must_use]
    pub const fn debug() -> Self {
        Self {
            level: Level::DEBUG,
        }
    }

    /// The configured level.
    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }
}

impl Interceptor for LoggingInterceptor {
    fn intercept(&self, options: RequestOptions) -> InterceptFuture<'_> {
        let method = options.method;
        let headers = &options.headers;
        let body = options.body.as_ref().map(|body| match body {
            crate::Body::Text(_) => "text",
            crate::Body::Bytes(_) => "bytes",
            crate::Body::Json(_) => "json",
            crate::Body::Form(_) => "form",
            crate::Body::Multipart(_) => "multipart",
        });

        if self.level == Level::DEBUG {
            debug!(%method, ?headers, ?body, "request options");
        } else {
            info!(%method, ?headers, ?body, "request options");
        }

        Box::pin(async move { Ok(options) })
    }
}
