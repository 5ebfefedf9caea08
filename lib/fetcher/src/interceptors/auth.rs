//! Authorization interceptors.

use std::fmt;
use std::sync::Arc;

use base64::Engine;

use crate::{InterceptFuture, Interceptor, RequestOptions};

const AUTHORIZATION: &str = "Authorization";

/// Adds `Authorization: Bearer <token>` to every request.
#[derive(Clone)]
pub struct BearerAuth {
    token: Arc<str>,
}

impl fmt::Debug for BearerAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerAuth").finish_non_exhaustive()
    }
}

impl BearerAuth {
    /// Create a bearer auth interceptor with the given token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Arc::from(token.into()),
        }
    }
}

impl Interceptor for BearerAuth {
    fn intercept(&self, mut options: RequestOptions) -> InterceptFuture<'_> {
        options.insert_header(AUTHORIZATION, format!("Bearer {}", self.token));
        Box::pin(async move { Ok(options) })
    }
}

/// Adds `Authorization: Basic <base64(user:password)>` to every request.
#[derive(Clone)]
pub struct BasicAuth {
    /// Base64-encoded "username:password".
    encoded_credentials: Arc<str>,
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth").finish_non_exhaustive()
    }
}

impl BasicAuth {
    /// Create a basic auth interceptor with the given credentials.
    pub fn new(username: impl AsRef<str>, password: impl AsRef<str>) -> Self {
        let credentials = format!("{}:{}", username.as_ref(), password.as_ref());
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
        Self {
            encoded_credentials: Arc::from(encoded),
        }
    }
}

impl Interceptor for BasicAuth {
    fn intercept(&self, mut options: RequestOptions) -> InterceptFuture<'_> {
        options.insert_header(AUTHORIZATION, format!("Basic {}", self.encoded_credentials));
        Box::pin(async move { Ok(options) })
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;

    use super::*;

    #[tokio::test]
    async fn bearer_sets_authorization() {
        let options = BearerAuth::new("test-token")
            .intercept(RequestOptions::get().header("authorization", "stale"))
            .await
            .expect("intercepted");

        check!(options.headers.len() == 1);
        check!(options.header_value("Authorization") == Some("Bearer test-token"));
    }

    #[tokio::test]
    async fn basic_encodes_credentials() {
        // "user:pass" -> "dXNlcjpwYXNz"
        let options = BasicAuth::new("user", "pass")
            .intercept(RequestOptions::get())
            .await
            .expect("intercepted");

        check!(options.header_value("authorization") == Some("Basic dXNlcjpwYXNz"));
    }

    #[test]
    fn debug_hides_credentials() {
        check!(!format!("{:?}", BearerAuth::new("s3cret")).contains("s3cret"));
        check!(!format!("{:?}", BasicAuth::new("u", "p")).contains("dTpw"));
    }
}
