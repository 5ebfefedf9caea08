//! Outgoing requests.
//!
//! [`RequestOptions`] is what callers and interceptors work with: a method,
//! headers and an optional body, without a URL. The executor resolves it into
//! a [`Request`] bound to a full URL before handing it to an
//! [`HttpClient`](crate::HttpClient).
//!
//! # Example
//!
//! ```
//! use fetcher_core::{Method, RequestOptions};
//!
//! let options = RequestOptions::post()
//!     .header("X-Request-ID", "123")
//!     .text("hello");
//!
//! assert_eq!(options.method, Method::Post);
//! assert_eq!(options.header_value("x-request-id"), Some("123"));
//! ```

use std::collections::HashMap;

use bytes::Bytes;

use crate::{Body, Form, Method};

/// Per-call request options.
///
/// Header names are matched ASCII case-insensitively by the helpers on this
/// type; the spelling of the last writer is kept.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// HTTP method.
    pub method: Method,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Option<Body>,
}

impl RequestOptions {
    /// Options for the given method, without headers or body.
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// `GET` options.
    #[must_use]
    pub fn get() -> Self {
        Self::new(Method::Get)
    }

    /// `POST` options.
    #[must_use]
    pub fn post() -> Self {
        Self::new(Method::Post)
    }

    /// `PUT` options.
    #[must_use]
    pub fn put() -> Self {
        Self::new(Method::Put)
    }

    /// `PATCH` options.
    #[must_use]
    pub fn patch() -> Self {
        Self::new(Method::Patch)
    }

    /// `DELETE` options.
    #[must_use]
    pub fn delete() -> Self {
        Self::new(Method::Delete)
    }

    /// Set a header, replacing any header with the same name in any case.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_header(name, value);
        self
    }

    /// Set several headers.
    #[must_use]
    pub fn headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self.insert_header(name, value);
        }
        self
    }

    /// Set the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set a plain text body.
    #[must_use]
    pub fn text(self, text: impl Into<String>) -> Self {
        self.body(Body::Text(text.into()))
    }

    /// Set a raw binary body.
    #[must_use]
    pub fn bytes(self, bytes: impl Into<Bytes>) -> Self {
        self.body(Body::Bytes(bytes.into()))
    }

    /// Set a multipart body.
    #[must_use]
    pub fn multipart(self, form: Form) -> Self {
        self.body(Body::Multipart(form))
    }

    /// Set a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn json<T: serde::Serialize>(self, value: &T) -> crate::Result<Self> {
        Ok(self.body(Body::Json(crate::to_json(value)?)))
    }

    /// Set a form URL-encoded body.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn form<T: serde::Serialize>(self, value: &T) -> crate::Result<Self> {
        Ok(self.body(Body::Form(crate::to_form(value)?)))
    }

    /// Header value by name, ignoring ASCII case.
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Insert a header, replacing any header with the same name in any case.
    pub fn insert_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.remove_header(&name);
        self.headers.insert(name, value.into());
    }

    /// Remove a header by name, ignoring ASCII case.
    pub fn remove_header(&mut self, name: &str) -> Option<String> {
        let key = self
            .headers
            .keys()
            .find(|key| key.eq_ignore_ascii_case(name))
            .cloned()?;
        self.headers.remove(&key)
    }

    /// Fill in default headers; headers already set on these options win.
    #[must_use]
    pub fn with_default_headers(mut self, defaults: &HashMap<String, String>) -> Self {
        for (name, value) in defaults {
            if self.header_value(name).is_none() {
                self.headers.insert(name.clone(), value.clone());
            }
        }
        self
    }
}

/// An HTTP request with method, URL, headers, and optional body.
#[derive(Debug, Clone)]
pub struct Request<B = Bytes> {
    method: Method,
    url: url::Url,
    headers: HashMap<String, String>,
    body: Option<B>,
}

impl<B> Request<B> {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, url: url::Url) -> RequestBuilder<B> {
        RequestBuilder::new(method, url)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Request URL.
    #[must_use]
    pub fn url(&self) -> &url::Url {
        &self.url
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Mutable access to headers.
    #[must_use]
    pub fn headers_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.headers
    }

    /// Single header value by name, ignoring ASCII case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> Option<&B> {
        self.body.as_ref()
    }

    /// Consume into (method, url, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (Method, url::Url, HashMap<String, String>, Option<B>) {
        (self.method, self.url, self.headers, self.body)
    }
}

/// Builder for constructing [`Request`] instances.
#[derive(Debug, Clone)]
pub struct RequestBuilder<B = Bytes> {
    method: Method,
    url: url::Url,
    headers: HashMap<String, String>,
    body: Option<B>,
}

impl<B> RequestBuilder<B> {
    /// Creates a new builder.
    #[must_use]
    pub fn new(method: Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets multiple headers.
    #[must_use]
    pub fn headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: B) -> Self {
        self.body = Some(body);
        self
    }

    /// Builds the [`Request`].
    #[must_use]
    pub fn build(self) -> Request<B> {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Request<Bytes> {
    /// Resolve options against a URL.
    ///
    /// A body that declares a content type (JSON, form, multipart) sets the
    /// `Content-Type` header only when the options carry none.
    #[must_use]
    pub fn from_options(url: url::Url, options: RequestOptions) -> Self {
        let RequestOptions {
            method,
            mut headers,
            body,
        } = options;

        let has_content_type = headers
            .keys()
            .any(|key| key.eq_ignore_ascii_case(crate::ContentType::HEADER));
        if !has_content_type
            && let Some(content_type) = body.as_ref().and_then(Body::content_type)
        {
            headers.insert(crate::ContentType::HEADER.to_string(), content_type);
        }

        Self {
            method,
            url,
            headers,
            body: body.map(Body::into_bytes),
        }
    }
}
