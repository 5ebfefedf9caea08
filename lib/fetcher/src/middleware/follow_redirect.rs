//! Redirect following.
//!
//! 3xx responses with a `Location` header are followed until a final
//! response, up to a maximum count. A redirect without `Location` is returned
//! as-is.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use tower::{Layer, Service, ServiceExt};
use url::Url;

use crate::{Error, Method, Request, Response, Result};

/// Default maximum number of redirects to follow.
pub const DEFAULT_MAX_REDIRECTS: usize = 20;

/// Headers describing a body, dropped when a redirect drops the body.
const BODY_HEADERS: [&str; 4] = [
    "content-type",
    "content-encoding",
    "content-language",
    "content-location",
];

/// Layer that follows HTTP redirects.
///
/// [`HyperClient`](crate::HyperClient) installs it by default, see
/// [`ClientConfigBuilder::max_redirects`](crate::ClientConfigBuilder::max_redirects).
#[derive(Debug, Clone, Copy)]
pub struct FollowRedirectLayer {
    max_redirects: usize,
}

impl Default for FollowRedirectLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl FollowRedirectLayer {
    /// Follow up to [`DEFAULT_MAX_REDIRECTS`] redirects.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_max_redirects(DEFAULT_MAX_REDIRECTS)
    }

    /// Follow up to `max_redirects` redirects.
    #[must_use]
    pub const fn with_max_redirects(max_redirects: usize) -> Self {
        Self { max_redirects }
    }

    /// Maximum number of redirects followed.
    #[must_use]
    pub const fn max_redirects(&self) -> usize {
        self.max_redirects
    }
}

impl<S> Layer<S> for FollowRedirectLayer {
    type Service = FollowRedirect<S>;

    fn layer(&self, inner: S) -> Self::Service {
        FollowRedirect {
            inner,
            max_redirects: self.max_redirects,
        }
    }
}

/// Service produced by [`FollowRedirectLayer`].
#[derive(Debug, Clone)]
pub struct FollowRedirect<S> {
    inner: S,
    max_redirects: usize,
}

fn is_redirect(status: u16) -> bool {
    matches!(status, 301 | 302 | 303 | 307 | 308)
}

/// Method of the redirected request.
///
/// `303` turns anything but `GET`/`HEAD` into `GET`, `301`/`302` turn `POST`
/// into `GET`; everything else keeps its method.
fn redirect_method(status: u16, original: Method) -> Method {
    match (status, original) {
        (303, Method::Get | Method::Head) => original,
        (303, _) | (301 | 302, Method::Post) => Method::Get,
        _ => original,
    }
}

/// Request sent to `location`, or `None` when the response carries no `Location`.
fn next_request(
    request: &Request<Bytes>,
    response: &Response<Bytes>,
) -> Option<Result<Request<Bytes>>> {
    let location = response.header("location")?;
    let url = match request.url().join(location) {
        Ok(url) => url,
        Err(err) => return Some(Err(Error::InvalidUrl(err))),
    };

    let method = redirect_method(response.status(), request.method());
    let keep_body = method == request.method();
    let cross_origin = url.origin() != request.url().origin();

    let headers = request
        .headers()
        .iter()
        .filter(|(name, _)| {
            keep_body
                || !BODY_HEADERS
                    .iter()
                    .any(|header| name.eq_ignore_ascii_case(header))
        })
        .filter(|(name, _)| !(cross_origin && name.eq_ignore_ascii_case("authorization")))
        .map(|(name, value)| (name.clone(), value.clone()));

    let mut builder = Request::builder(method, url).headers(headers);
    if keep_body && let Some(body) = request.body() {
        builder = builder.body(body.clone());
    }
    Some(Ok(builder.build()))
}

impl<S> Service<Request<Bytes>> for FollowRedirect<S>
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
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let max_redirects = self.max_redirects;

        Box::pin(async move {
            let mut current = request;
            let mut redirects = 0;

            loop {
                let response = inner.ready().await?.call(current.clone()).await?;
                if !is_redirect(response.status()) {
                    return Ok(response);
                }
                let Some(next) = next_request(&current, &response) else {
                    return Ok(response);
                };
                if redirects >= max_redirects {
                    return Err(Error::TooManyRedirects { max: max_redirects });
                }

                current = next?;
                redirects += 1;
                tracing::debug!(
                    status = response.status(),
                    location = %current.url(),
                    redirects,
                    "following redirect"
                );
            }
        })
    }
}
