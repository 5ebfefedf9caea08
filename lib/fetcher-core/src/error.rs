//! Error types for fetcher.
//!
//! Every non-2xx response becomes exactly one [`ApiError`], wrapped in
//! [`Error::Api`]. Transport and codec failures keep their own variants.

use std::backtrace::Backtrace;
use std::fmt;
use std::sync::Arc;

use derive_more::{Display, Error, From};
use serde::ser::SerializeStruct;
use serde_json::Value;

/// Log string used when an error carries no info payload.
pub const NO_INFO: &str = "No additional info";

/// Log string used when an info payload cannot be rendered as JSON.
pub const NON_SERIALIZABLE: &str = "[Non-Serializable Object]";

// ============================================================================
// Structured API Error
// ============================================================================

/// Structured failure for an HTTP call that did not succeed.
///
/// Carries the message, the URL that was called, the response status and the
/// raw payload returned by the server. The human-readable [`log`](Self::log)
/// string is computed once, at construction.
///
/// # Example
///
/// ```
/// use fetcher_core::ApiError;
/// use serde_json::json;
///
/// let err = ApiError::new(
///     "User not found",
///     "https://api.example.com/users/999",
///     404,
///     Some(json!({ "message": "User not found" })),
/// );
///
/// assert!(err.is_not_found());
/// assert!(err.is_client_error());
/// assert_eq!(err.message(), "User not found");
/// ```
#[derive(Debug, Clone)]
pub struct ApiError {
    message: String,
    url: String,
    status: u16,
    info: Option<Value>,
    log: String,
    stack: Arc<Backtrace>,
}

impl ApiError {
    /// Error name, as reported in serialized output.
    pub const NAME: &'static str = "APIError";

    /// Create a new API error.
    #[must_use]
    pub fn new(
        message: impl Into<String>,
        url: impl Into<String>,
        status: u16,
        info: Option<Value>,
    ) -> Self {
        let log = format_log(info.as_ref());
        Self {
            message: message.into(),
            url: url.into(),
            status,
            info,
            log,
            stack: Arc::new(Backtrace::capture()),
        }
    }

    /// Error name (`"APIError"`).
    #[must_use]
    pub const fn name(&self) -> &'static str {
        Self::NAME
    }

    /// Error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// URL of the failed call.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// HTTP status code of the response.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Raw payload returned by the server, if any.
    #[must_use]
    pub const fn info(&self) -> Option<&Value> {
        self.info.as_ref()
    }

    /// Human-readable rendering of [`info`](Self::info).
    #[must_use]
    pub fn log(&self) -> &str {
        &self.log
    }

    /// Backtrace captured when the error was built.
    ///
    /// Only populated when `RUST_BACKTRACE` / `RUST_LIB_BACKTRACE` enable capture.
    #[must_use]
    pub fn backtrace(&self) -> &Backtrace {
        &self.stack
    }

    /// Status is in `400..500`.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }

    /// Status is `500` or above.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500
    }

    /// Status is `401 Unauthorized`.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Status is `403 Forbidden`.
    #[must_use]
    pub const fn is_forbidden(&self) -> bool {
        self.status == 403
    }

    /// Status is `404 Not Found`.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Decode the info payload into a typed error body.
    ///
    /// Returns `None` when the error carries no info.
    ///
    /// # Example
    ///
    /// ```ignore
    /// #[derive(Debug, Deserialize)]
    /// struct Problem {
    ///     code: String,
    ///     message: String,
    /// }
    ///
    /// if let Err(Error::Api(err)) = users.path(["users", "42"]).call().await {
    ///     if let Some(Ok(problem)) = err.decode_info::<Problem>() {
    ///         eprintln!("{}: {}", problem.code, problem.message);
    ///     }
    /// }
    /// ```
    pub fn decode_info<T: serde::de::DeserializeOwned>(&self) -> Option<Result<T>> {
        self.info.clone().map(|info| {
            serde_path_to_error::deserialize(info).map_err(|e| {
                Error::json_deserialization(e.path().to_string(), e.inner().to_string())
            })
        })
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "API error {} at {}: {}",
            self.status, self.url, self.message
        )
    }
}

impl std::error::Error for ApiError {}

impl serde::Serialize for ApiError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ApiError", 6)?;
        state.serialize_field("name", Self::NAME)?;
        state.serialize_field("message", &self.message)?;
        state.serialize_field("status", &self.status)?;
        state.serialize_field("url", &self.url)?;
        state.serialize_field("info", &self.info)?;
        state.serialize_field("stack", &self.stack.to_string())?;
        state.end()
    }
}

fn format_log(info: Option<&Value>) -> String {
    match info {
        None | Some(Value::Null) => NO_INFO.to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(value @ (Value::Object(_) | Value::Array(_))) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| NON_SERIALIZABLE.to_string())
        }
        Some(other) => other.to_string(),
    }
}

// ============================================================================
// Error Type
// ============================================================================

/// Main error type for fetcher operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// The server answered with a non-2xx status.
    #[display("{_0}")]
    #[from]
    Api(#[error(not(source))] ApiError),

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// A redirect chain was longer than allowed.
    #[display("too many redirects (max {max})")]
    #[from(skip)]
    TooManyRedirects {
        /// Maximum number of redirects followed.
        max: usize,
    },

    /// Invalid request configuration.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// An interceptor rejected the request.
    #[display("interceptor rejected request: {_0}")]
    #[from(skip)]
    Interceptor(#[error(not(source))] String),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// Form URL-encoded serialization error.
    #[display("form serialization error: {_0}")]
    #[from]
    FormSerialization(serde_urlencoded::ser::Error),

    /// Query string serialization error.
    #[display("query serialization error: {_0}")]
    #[from]
    QuerySerialization(serde_html_form::ser::Error),

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create an interceptor rejection.
    #[must_use]
    pub fn interceptor(message: impl Into<String>) -> Self {
        Self::Interceptor(message.into())
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// The structured API error, if the server answered with a non-2xx status.
    #[must_use]
    pub const fn as_api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns the HTTP status code if this is an API error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api(err) => Some(err.status()),
            _ => None,
        }
    }

    /// Returns `true` if this is a client error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.as_api().is_some_and(ApiError::is_client_error)
    }

    /// Returns `true` if this is a server error (5xx and above).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.as_api().is_some_and(ApiError::is_server_error)
    }

    /// Returns `true` if this is a 401 Unauthorized error.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.as_api().is_some_and(ApiError::is_unauthorized)
    }

    /// Returns `true` if this is a 403 Forbidden error.
    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        self.as_api().is_some_and(ApiError::is_forbidden)
    }

    /// Returns `true` if this is a 404 Not Found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.as_api().is_some_and(ApiError::is_not_found)
    }
}
