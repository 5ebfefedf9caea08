//! Classified response bodies.

use serde_json::Value;

use crate::{Error, Result};

/// What a successful call produced.
///
/// The variant is chosen from the status and the declared content type:
/// `204` gives [`NoContent`](Self::NoContent), a JSON content type gives
/// [`Json`](Self::Json), anything else [`Text`](Self::Text).
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Parsed JSON body.
    Json(Value),
    /// Body as text.
    Text(String),
    /// The server answered `204 No Content`.
    NoContent,
}

impl Payload {
    /// Returns `true` for [`Payload::NoContent`].
    #[must_use]
    pub const fn is_no_content(&self) -> bool {
        matches!(self, Self::NoContent)
    }

    /// JSON value, for JSON payloads.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Text, for text payloads.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Deserialize into a typed value.
    ///
    /// Text payloads deserialize as a JSON string and `NoContent` as `null`,
    /// so `Option<T>` and `()` targets accept an empty response.
    ///
    /// # Example
    ///
    /// ```
    /// use fetcher_core::Payload;
    /// use serde_json::json;
    ///
    /// let ids: Vec<u32> = Payload::Json(json!([1, 2])).into_typed().expect("array");
    /// assert_eq!(ids, [1, 2]);
    ///
    /// let nothing: Option<u32> = Payload::NoContent.into_typed().expect("null");
    /// assert_eq!(nothing, None);
    /// ```
    pub fn into_typed<T: serde::de::DeserializeOwned>(self) -> Result<T> {
        let value = match self {
            Self::Json(value) => value,
            Self::Text(text) => Value::String(text),
            Self::NoContent => Value::Null,
        };
        serde_path_to_error::deserialize(value)
            .map_err(|e| Error::json_deserialization(e.path().to_string(), e.inner().to_string()))
    }
}
