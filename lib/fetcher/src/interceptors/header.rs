//! Fixed header interceptor.

use crate::{InterceptFuture, Interceptor, RequestOptions};

/// Sets a header on every request.
#[derive(Debug, Clone)]
pub struct SetHeader {
    name: String,
    value: String,
    overwrite: bool,
}

impl SetHeader {
    /// Set the header, replacing any value already present.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            overwrite: true,
        }
    }

    /// Set the header only when the request does not carry it yet.
    pub fn if_missing(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            overwrite: false,
            ..Self::new(name, value)
        }
    }
}

impl Interceptor for SetHeader {
    fn intercept(&self, mut options: RequestOptions) -> InterceptFuture<'_> {
        if self.overwrite || options.header_value(&self.name).is_none() {
            options.insert_header(self.name.clone(), self.value.clone());
        }
        Box::pin(async move { Ok(options) })
    }
}
