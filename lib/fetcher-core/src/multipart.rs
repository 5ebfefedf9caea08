//! Multipart form data for uploads.
//!
//! A [`Form`] is sent by a multipart fetcher as-is: its `Content-Type`
//! (including the boundary) comes from the form, not from default headers.
//!
//! # Example
//!
//! ```
//! use fetcher_core::{Form, Part};
//!
//! let form = Form::with_boundary("xyz")
//!     .text("title", "Holiday")
//!     .part(Part::file("photo", "beach.png", vec![0x89, 0x50]));
//!
//! let (content_type, body) = form.into_body();
//! assert_eq!(content_type, "multipart/form-data; boundary=xyz");
//! assert!(body.starts_with(b"--xyz\r\n"));
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use bytes::{BufMut, Bytes, BytesMut};
use serde_json::Value;

use crate::{Error, Result};

/// A single field of a multipart form.
#[derive(Debug, Clone)]
pub struct Part {
    name: String,
    filename: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

impl Part {
    /// A plain text field, without its own content type.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filename: None,
            content_type: None,
            data: Bytes::from(value.into()),
        }
    }

    /// A file field. The content type is derived from the file extension.
    #[must_use]
    pub fn file(
        name: impl Into<String>,
        filename: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        let filename = filename.into();
        let content_type = mime_for(&filename).to_string();
        Self {
            name: name.into(),
            filename: Some(filename),
            content_type: Some(content_type),
            data: data.into(),
        }
    }

    /// Override the content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File name, for file fields.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Content type, if declared.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Raw field data.
    #[must_use]
    pub fn data(&self) -> &Bytes {
        &self.data
    }
}

fn mime_for(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "json" => "application/json",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "md" => "text/markdown",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}

/// A multipart form: ordered parts plus the boundary that separates them.
#[derive(Debug, Clone)]
pub struct Form {
    parts: Vec<Part>,
    boundary: String,
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}

impl Form {
    /// Create an empty form with a generated boundary.
    #[must_use]
    pub fn new() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        Self::with_boundary(format!("----FetcherBoundary{nanos:x}"))
    }

    /// Create an empty form with a fixed boundary.
    #[must_use]
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            parts: Vec::new(),
            boundary: boundary.into(),
        }
    }

    /// Build a form from the fields of a serializable object.
    ///
    /// - `null` fields are skipped;
    /// - strings are sent verbatim, other scalars in their JSON form;
    /// - arrays repeat the field name once per non-null item;
    /// - objects inside arrays are flattened to `name[index][field]`.
    ///
    /// # Errors
    ///
    /// Fails when the value does not serialize to a JSON object.
    ///
    /// # Example
    ///
    /// ```
    /// use fetcher_core::Form;
    /// use serde_json::json;
    ///
    /// let form = Form::from_fields(&json!({
    ///     "title": "Report",
    ///     "draft": null,
    ///     "tags": ["a", "b"],
    ///     "authors": [{ "name": "Ann", "role": "lead" }],
    /// }))
    /// .expect("object");
    ///
    /// let names: Vec<_> = form.parts().iter().map(|p| p.name()).collect();
    /// assert!(names.contains(&"title"));
    /// assert!(!names.contains(&"draft"));
    /// assert!(names.contains(&"authors[0][name]"));
    /// ```
    pub fn from_fields<T: serde::Serialize>(value: &T) -> Result<Self> {
        let Value::Object(fields) = serde_json::to_value(value)? else {
            return Err(Error::invalid_request(
                "multipart fields must serialize to an object",
            ));
        };

        let mut form = Self::new();
        for (name, value) in fields {
            match value {
                Value::Null => {}
                Value::Array(items) => {
                    for (index, item) in items.into_iter().enumerate() {
                        match item {
                            Value::Null => {}
                            Value::Object(entries) => {
                                for (field, entry) in entries {
                                    if !entry.is_null() {
                                        form = form.text(
                                            format!("{name}[{index}][{field}]"),
                                            field_text(entry),
                                        );
                                    }
                                }
                            }
                            scalar => form = form.text(name.clone(), field_text(scalar)),
                        }
                    }
                }
                other => form = form.text(name, field_text(other)),
            }
        }
        Ok(form)
    }

    /// Add a part.
    #[must_use]
    pub fn part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Add a text field.
    #[must_use]
    pub fn text(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.part(Part::text(name, value))
    }

    /// Add a file field.
    #[must_use]
    pub fn file(
        self,
        name: impl Into<String>,
        filename: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        self.part(Part::file(name, filename, data))
    }

    /// Boundary string.
    #[must_use]
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Parts, in insertion order.
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// `multipart/form-data; boundary=<boundary>`
    #[must_use]
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Encode into `(content type, body)`.
    #[must_use]
    pub fn into_body(self) -> (String, Bytes) {
        let content_type = self.content_type();
        let delimiter = format!("--{}", self.boundary);
        let mut buf = BytesMut::new();

        for part in &self.parts {
            buf.put_slice(delimiter.as_bytes());
            buf.put_slice(b"\r\n");

            let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", part.name);
            if let Some(filename) = &part.filename {
                disposition.push_str(&format!("; filename=\"{filename}\""));
            }
            buf.put_slice(disposition.as_bytes());
            buf.put_slice(b"\r\n");

            if let Some(part_type) = &part.content_type {
                buf.put_slice(format!("Content-Type: {part_type}\r\n").as_bytes());
            }

            buf.put_slice(b"\r\n");
            buf.put_slice(&part.data);
            buf.put_slice(b"\r\n");
        }

        buf.put_slice(delimiter.as_bytes());
        buf.put_slice(b"--\r\n");

        (content_type, buf.freeze())
    }
}

fn field_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;
    use serde_json::json;

    use super::*;

    fn names(form: &Form) -> Vec<&str> {
        form.parts().iter().map(Part::name).collect()
    }

    #[test]
    fn file_part_guesses_type() {
        let part = Part::file("upload", "PHOTO.JPG", vec![0xFF, 0xD8]);
        check!(part.filename() == Some("PHOTO.JPG"));
        check!(part.content_type() == Some("image/jpeg"));

        let part = Part::file("upload", "noext", "x");
        check!(part.content_type() == Some("application/octet-stream"));
    }

    #[test]
    fn text_part_has_no_content_type() {
        let part = Part::text("field", "value");
        check!(part.content_type().is_none());
        check!(part.data().as_ref() == b"value");
    }

    #[test]
    fn generated_boundary() {
        check!(Form::new().boundary().starts_with("----FetcherBoundary"));
    }

    #[test]
    fn encode_text_and_file() {
        let (content_type, body) = Form::with_boundary("b1")
            .text("field", "value")
            .file("upload", "test.txt", "file content")
            .into_body();

        assert_eq!(content_type, "multipart/form-data; boundary=b1");
        let body = String::from_utf8_lossy(&body);
        assert_eq!(
            body,
            "--b1\r\n\
             Content-Disposition: form-data; name=\"field\"\r\n\
             \r\n\
             value\r\n\
             --b1\r\n\
             Content-Disposition: form-data; name=\"upload\"; filename=\"test.txt\"\r\n\
             Content-Type: text/plain\r\n\
             \r\n\
             file content\r\n\
             --b1--\r\n"
        );
    }

    #[test]
    fn from_fields_skips_nulls_and_repeats_arrays() {
        let form = Form::from_fields(&json!({
            "name": "Ann",
            "age": 41,
            "nickname": null,
            "tags": ["x", null, "y"],
        }))
        .expect("object");

        let mut got = names(&form);
        got.sort_unstable();
        assert_eq!(got, ["age", "name", "tags", "tags"]);

        let age = form.parts().iter().find(|p| p.name() == "age").expect("age");
        check!(age.data().as_ref() == b"41");
    }

    #[test]
    fn from_fields_flattens_objects_in_arrays() {
        let form = Form::from_fields(&json!({
            "items": [{ "id": 1, "note": null }, { "id": 2 }],
        }))
        .expect("object");

        assert_eq!(names(&form), ["items[0][id]", "items[1][id]"]);
    }

    #[test]
    fn from_fields_keeps_field_order() {
        #[derive(serde::Serialize)]
        struct Upload {
            title: &'static str,
            author: &'static str,
            body: &'static str,
        }

        let form = Form::from_fields(&Upload {
            title: "Report",
            author: "Ann",
            body: "...",
        })
        .expect("object");

        assert_eq!(names(&form), ["title", "author", "body"]);
    }

    #[test]
    fn from_fields_rejects_non_objects() {
        let err = Form::from_fields(&json!(["a"])).expect_err("array");
        check!(matches!(err, Error::InvalidRequest(_)));
    }
}
