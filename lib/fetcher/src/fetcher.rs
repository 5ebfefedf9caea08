//! Base-URL bound fetchers.
//!
//! [`BaseFetcher`] is the executor: it merges default and per-call headers,
//! runs the interceptor, sends the request through an [`HttpClient`] and
//! classifies the response into a [`Payload`] or an [`ApiError`].
//!
//! [`Fetcher`] is the factory built on top of it. It hands out [`Endpoint`]s
//! bound to a path built with [`build_path`]:
//!
//! ```no_run
//! use fetcher::{Fetcher, RequestOptions};
//!
//! # async fn run() -> fetcher::Result<()> {
//! let api = Fetcher::new("https://api.example.com")?;
//! let users = api.path(["users", "?page=2"]);
//!
//! let payload = users.call().await?;
//! let created = users.send(RequestOptions::post().text(r#"{"name":"Ada"}"#)).await?;
//! # let _ = (payload, created);
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{Instrument, debug, debug_span, warn};

use crate::{
    ApiError, ContentType, HttpClient, HyperClient, Interceptor, Payload, Request,
    RequestOptions, Response, Result, SharedInterceptor, build_path, from_json,
};

/// Message of an [`ApiError`] when neither the body nor the status line gives one.
pub const UNKNOWN_API_ERROR: &str = "Unknown API error";

// ============================================================================
// Executor
// ============================================================================

/// Executes requests against a fixed base URL.
///
/// Cloning is cheap: headers and the interceptor are shared.
#[derive(Clone)]
pub struct BaseFetcher<C = HyperClient> {
    client: C,
    base_url: Arc<str>,
    default_headers: Arc<HashMap<String, String>>,
    interceptor: Option<SharedInterceptor>,
}

impl<C> fmt::Debug for BaseFetcher<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseFetcher")
            .field("base_url", &self.base_url)
            .field("default_headers", &self.default_headers)
            .field("has_interceptor", &self.interceptor.is_some())
            .finish_non_exhaustive()
    }
}

impl<C> BaseFetcher<C> {
    /// Create an executor without default headers or interceptor.
    ///
    /// A trailing `/` on `base_url` is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`](crate::Error::InvalidUrl) if `base_url`
    /// is not an absolute URL.
    pub fn new(client: C, base_url: &str) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/');
        url::Url::parse(base_url)?;

        Ok(Self {
            client,
            base_url: Arc::from(base_url),
            default_headers: Arc::default(),
            interceptor: None,
        })
    }

    /// Add a header sent with every request unless the call overrides it.
    #[must_use]
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let headers = Arc::make_mut(&mut self.default_headers);
        headers.retain(|key, _| !key.eq_ignore_ascii_case(&name));
        headers.insert(name, value.into());
        self
    }

    /// Set the interceptor, replacing any previous one.
    #[must_use]
    pub fn with_interceptor<I: Interceptor + 'static>(self, interceptor: I) -> Self {
        self.with_shared_interceptor(Arc::new(interceptor))
    }

    /// Set an already shared interceptor, replacing any previous one.
    #[must_use]
    pub fn with_shared_interceptor(mut self, interceptor: SharedInterceptor) -> Self {
        self.interceptor = Some(interceptor);
        self
    }

    /// The base URL, without trailing `/`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Headers added to every request.
    #[must_use]
    pub fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// The underlying network client.
    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }
}

impl<C: HttpClient> BaseFetcher<C> {
    /// Fetch `base_url + pathname`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidUrl`](crate::Error::InvalidUrl) if the joined URL does not parse
    /// - any error returned by the interceptor, before anything is sent
    /// - transport errors from the client
    /// - [`Error::Api`](crate::Error::Api) for a non-2xx response
    /// - [`Error::JsonDeserialization`](crate::Error::JsonDeserialization) for
    ///   a malformed JSON body on a successful response
    pub async fn fetch(&self, pathname: &str, options: RequestOptions) -> Result<Payload> {
        let url = format!("{}{pathname}", self.base_url);
        let span = debug_span!("fetch", method = %options.method, url = %url);

        self.execute(url, options).instrument(span).await
    }

    async fn execute(&self, url: String, options: RequestOptions) -> Result<Payload> {
        let target = url::Url::parse(&url)?;

        let mut options = options.with_default_headers(&self.default_headers);
        if let Some(interceptor) = &self.interceptor {
            options = interceptor.intercept(options).await?;
        }

        debug!(method = %options.method, headers = ?options.headers, "sending request");
        let response = self
            .client
            .execute(Request::from_options(target, options))
            .await?;

        classify(&url, response)
    }
}

fn classify(url: &str, response: Response<Bytes>) -> Result<Payload> {
    let status = response.status();

    if !response.is_success() {
        let info = error_info(&response);
        let message = info
            .as_ref()
            .and_then(|info| info.get("message"))
            .and_then(message_text)
            .or_else(|| {
                Some(response.status_text())
                    .filter(|text| !text.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| UNKNOWN_API_ERROR.to_string());

        warn!(status, %message, "API error");
        return Err(ApiError::new(message, url, status, info).into());
    }

    if response.is_no_content() {
        debug!(status, "no content");
        return Ok(Payload::NoContent);
    }

    debug!(status, "response received");
    if response.is_json() {
        Ok(Payload::Json(from_json(response.body())?))
    } else {
        Ok(Payload::Text(response.text()))
    }
}

/// A usable `message` field: a non-empty string, a non-zero number or `true`.
fn message_text(message: &Value) -> Option<String> {
    match message {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) if number.as_f64().is_some_and(|n| n.abs() > 0.0) => {
            Some(number.to_string())
        }
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Raw info attached to an error response.
///
/// JSON bodies are parsed; an empty one is no info, a malformed one is kept
/// as text. Other bodies are kept as text.
fn error_info(response: &Response<Bytes>) -> Option<Value> {
    let body = response.body();
    if response.is_json() {
        if body.is_empty() {
            return None;
        }
        if let Ok(value) = serde_json::from_slice(body) {
            return Some(value);
        }
    }
    Some(Value::String(response.text()))
}

// ============================================================================
// Factory
// ============================================================================

/// Factory of [`Endpoint`]s sharing one base URL, header set and interceptor.
///
/// # Example
///
/// ```no_run
/// use fetcher::{Fetcher, interceptors::BearerAuth};
///
/// # async fn run() -> fetcher::Result<()> {
/// let api = Fetcher::new("https://api.example.com/v1")?
///     .with_interceptor(BearerAuth::new("token"));
///
/// let user: serde_json::Value = api.path(["users", "42"]).fetch(Default::default()).await?;
/// # let _ = user;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Fetcher<C = HyperClient> {
    base: BaseFetcher<C>,
}

impl Fetcher<HyperClient> {
    /// JSON fetcher over a default [`HyperClient`].
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::json(HyperClient::new(), base_url)
    }

    /// Multipart fetcher over a default [`HyperClient`].
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL.
    pub fn new_multipart(base_url: &str) -> Result<Self> {
        Self::multipart(HyperClient::new(), base_url)
    }
}

impl<C> Fetcher<C> {
    /// Fetcher sending `Content-Type: application/json` by default.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL.
    pub fn json(client: C, base_url: &str) -> Result<Self> {
        let base = BaseFetcher::new(client, base_url)?
            .with_default_header(ContentType::HEADER, ContentType::Json.as_str());
        Ok(Self { base })
    }

    /// Fetcher without default headers, for multipart uploads.
    ///
    /// A [`Form`](crate::Form) body brings its own `multipart/form-data`
    /// content type with the boundary.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL.
    pub fn multipart(client: C, base_url: &str) -> Result<Self> {
        Ok(Self {
            base: BaseFetcher::new(client, base_url)?,
        })
    }

    /// Set the interceptor, replacing any previous one.
    ///
    /// Use [`compose`](crate::compose) to run several.
    #[must_use]
    pub fn with_interceptor<I: Interceptor + 'static>(self, interceptor: I) -> Self {
        Self {
            base: self.base.with_interceptor(interceptor),
        }
    }

    /// Set an already shared interceptor, replacing any previous one.
    #[must_use]
    pub fn with_shared_interceptor(self, interceptor: SharedInterceptor) -> Self {
        Self {
            base: self.base.with_shared_interceptor(interceptor),
        }
    }

    /// Add a fixed default header.
    #[must_use]
    pub fn with_default_header(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            base: self.base.with_default_header(name, value),
        }
    }

    /// The underlying executor.
    #[must_use]
    pub const fn base(&self) -> &BaseFetcher<C> {
        &self.base
    }
}

impl<C: Clone> Fetcher<C> {
    /// Endpoint for the path joined from `segments`.
    ///
    /// A final segment starting with `?` is kept as the query string.
    #[must_use]
    pub fn path<I, S>(&self, segments: I) -> Endpoint<C>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Endpoint {
            fetcher: self.base.clone(),
            pathname: build_path(segments),
        }
    }
}

/// A fetcher bound to one pathname.
#[derive(Debug, Clone)]
pub struct Endpoint<C = HyperClient> {
    fetcher: BaseFetcher<C>,
    pathname: String,
}

impl<C> Endpoint<C> {
    /// The joined pathname, query included.
    #[must_use]
    pub fn pathname(&self) -> &str {
        &self.pathname
    }

    /// The full URL this endpoint targets.
    #[must_use]
    pub fn url(&self) -> String {
        format!("{}{}", self.fetcher.base_url(), self.pathname)
    }
}

impl<C: HttpClient> Endpoint<C> {
    /// Send a request with the given options.
    ///
    /// # Errors
    ///
    /// See [`BaseFetcher::fetch`].
    pub async fn send(&self, options: RequestOptions) -> Result<Payload> {
        self.fetcher.fetch(&self.pathname, options).await
    }

    /// Send a `GET` without headers or body.
    ///
    /// # Errors
    ///
    /// See [`BaseFetcher::fetch`].
    pub async fn call(&self) -> Result<Payload> {
        self.send(RequestOptions::default()).await
    }

    /// Send a request and deserialize the payload.
    ///
    /// A text payload deserializes as a JSON string and no content as `null`,
    /// so `Option<T>` accepts a `204`.
    ///
    /// # Errors
    ///
    /// See [`BaseFetcher::fetch`]; also fails if the payload does not match `T`.
    pub async fn fetch<T: DeserializeOwned>(&self, options: RequestOptions) -> Result<T> {
        self.send(options).await?.into_typed()
    }
}
