//! Request bodies and serialization helpers.

use bytes::Bytes;

use crate::{Form, Result};

/// Content types the fetch layer reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// `application/json`
    Json,
    /// `application/x-www-form-urlencoded`
    FormUrlEncoded,
}

impl ContentType {
    /// Header name for content types.
    pub const HEADER: &'static str = "Content-Type";

    /// Get the MIME type string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
        }
    }

    /// Returns `true` if a `Content-Type` header value declares this type.
    ///
    /// Parameters such as `; charset=utf-8` are ignored.
    #[must_use]
    pub fn matches(&self, header_value: &str) -> bool {
        header_value
            .to_ascii_lowercase()
            .contains(self.as_str())
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of an outgoing request.
#[derive(Debug, Clone)]
pub enum Body {
    /// Plain text, sent as-is.
    Text(String),
    /// Raw bytes, sent as-is.
    Bytes(Bytes),
    /// Serialized JSON.
    Json(Bytes),
    /// Form URL-encoded pairs.
    Form(String),
    /// Multipart form data, declaring its own boundary.
    Multipart(Form),
}

impl Body {
    /// Content type this body declares, if it declares one.
    ///
    /// Text and byte bodies leave the content type to the caller.
    #[must_use]
    pub fn content_type(&self) -> Option<String> {
        match self {
            Self::Text(_) | Self::Bytes(_) => None,
            Self::Json(_) => Some(ContentType::Json.to_string()),
            Self::Form(_) => Some(ContentType::FormUrlEncoded.to_string()),
            Self::Multipart(form) => Some(form.content_type()),
        }
    }

    /// Encode into the bytes sent on the wire.
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        match self {
            Self::Text(text) | Self::Form(text) => Bytes::from(text),
            Self::Bytes(bytes) | Self::Json(bytes) => bytes,
            Self::Multipart(form) => form.into_body().1,
        }
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<Form> for Body {
    fn from(form: Form) -> Self {
        Self::Multipart(form)
    }
}

/// Serialize a value to JSON bytes.
///
/// # Example
///
/// ```
/// use fetcher_core::to_json;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct User { name: String }
///
/// let bytes = to_json(&User { name: "Alice".to_string() }).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"name":"Alice"}"#);
/// ```
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Into::into)
}

/// Serialize a value to a form URL-encoded string.
pub fn to_form<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_urlencoded::to_string(value).map_err(Into::into)
}

/// Build a `?`-prefixed query string from a serializable value.
///
/// `None` fields are skipped, sequences repeat their key
/// (`tags=a&tags=b`), and an empty result gives an empty string so the
/// output can always be passed as the last path segment.
///
/// # Example
///
/// ```
/// use fetcher_core::{build_path, query_string};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Page {
///     page: u32,
///     #[serde(skip_serializing_if = "Option::is_none")]
///     search: Option<String>,
///     tags: Vec<String>,
/// }
///
/// let query = query_string(&Page { page: 2, search: None, tags: vec!["a".into(), "b".into()] })
///     .expect("serialize");
/// assert_eq!(query, "?page=2&tags=a&tags=b");
/// assert_eq!(build_path(["posts", query.as_str()]), "/posts?page=2&tags=a&tags=b");
/// ```
pub fn query_string<T: serde::Serialize>(value: &T) -> Result<String> {
    let query = serde_html_form::to_string(value)?;
    if query.is_empty() {
        Ok(query)
    } else {
        Ok(format!("?{query}"))
    }
}

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// # Example
///
/// ```
/// use fetcher_core::from_json;
/// use serde::Deserialize;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// struct User { name: String }
///
/// let user: User = from_json(br#"{"name":"Alice"}"#).expect("deserialize");
/// assert_eq!(user, User { name: "Alice".to_string() });
/// ```
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        crate::Error::json_deserialization(e.path().to_string(), e.inner().to_string())
    })
}
