//! Request interceptors.
//!
//! An [`Interceptor`] receives the merged [`RequestOptions`] of a call right
//! before the network request and returns the options to actually send. A
//! fetcher holds at most one; several are combined with [`compose`] or the
//! [`compose!`](crate::compose!) macro, which run them in declaration order.
//!
//! Async closures are interceptors as-is, synchronous ones go through [`map`]:
//!
//! ```
//! use fetcher_core::{Error, Interceptor, RequestOptions, compose, interceptor};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let chain = compose!(
//!     interceptor::map(|options: RequestOptions| options.header("X-Trace", "1")),
//!     |options: RequestOptions| async move { Ok::<_, Error>(options.header("X-Async", "2")) },
//! );
//!
//! let options = chain.intercept(RequestOptions::get()).await.expect("intercepted");
//! assert_eq!(options.header_value("x-trace"), Some("1"));
//! assert_eq!(options.header_value("x-async"), Some("2"));
//! # }
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::{RequestOptions, Result};

/// Future returned by [`Interceptor::intercept`].
pub type InterceptFuture<'a> = BoxFuture<'a, Result<RequestOptions>>;

/// Hook transforming outgoing request options.
///
/// Returning an error aborts the call before anything is sent.
pub trait Interceptor: Send + Sync {
    /// Transform the options of an outgoing request.
    fn intercept(&self, options: RequestOptions) -> InterceptFuture<'_>;
}

impl<F, Fut> Interceptor for F
where
    F: Fn(RequestOptions) -> Fut + Send + Sync,
    Fut: Future<Output = Result<RequestOptions>> + Send + 'static,
{
    fn intercept(&self, options: RequestOptions) -> InterceptFuture<'_> {
        Box::pin(self(options))
    }
}

/// Shared, type-erased interceptor.
pub type SharedInterceptor = Arc<dyn Interceptor>;

// ============================================================================
// Synchronous adapter
// ============================================================================

/// Interceptor built from a synchronous function, see [`map`].
#[derive(Clone)]
pub struct Map<F> {
    f: F,
}

impl<F> fmt::Debug for Map<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Map").finish_non_exhaustive()
    }
}

/// Wrap a synchronous, infallible transformation as an interceptor.
pub fn map<F>(f: F) -> Map<F>
where
    F: Fn(RequestOptions) -> RequestOptions + Send + Sync,
{
    Map { f }
}

impl<F> Interceptor for Map<F>
where
    F: Fn(RequestOptions) -> RequestOptions + Send + Sync,
{
    fn intercept(&self, options: RequestOptions) -> InterceptFuture<'_> {
        let options = (self.f)(options);
        Box::pin(async move { Ok(options) })
    }
}

// ============================================================================
// Composition
// ============================================================================

/// Interceptors applied one after the other.
///
/// Each interceptor sees the output of the previous one; the first error
/// stops the chain.
#[derive(Clone, Default)]
pub struct Chain {
    interceptors: Vec<SharedInterceptor>,
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("len", &self.interceptors.len())
            .finish()
    }
}

impl Chain {
    /// An empty chain, passing options through unchanged.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an interceptor.
    #[must_use]
    pub fn then<I: Interceptor + 'static>(mut self, interceptor: I) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    /// Number of interceptors in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    /// Returns `true` if the chain has no interceptors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }
}

impl Interceptor for Chain {
    fn intercept(&self, options: RequestOptions) -> InterceptFuture<'_> {
        Box::pin(async move {
            let mut options = options;
            for interceptor in &self.interceptors {
                options = interceptor.intercept(options).await?;
            }
            Ok(options)
        })
    }
}

/// Compose shared interceptors into a [`Chain`], in iteration order.
pub fn compose<I>(interceptors: I) -> Chain
where
    I: IntoIterator<Item = SharedInterceptor>,
{
    Chain {
        interceptors: interceptors.into_iter().collect(),
    }
}

/// Compose interceptors into a [`Chain`], in declaration order.
#[macro_export]
macro_rules! compose {
    ($($interceptor:expr),* $(,)?) => {
        $crate::Chain::new()$(.then($interceptor))*
    };
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use assert2::{check, let_assert};

    use super::*;
    use crate::{Error, Method};

    fn recorder(calls: &Arc<Mutex<Vec<u8>>>, id: u8) -> impl Interceptor + 'static {
        let calls = Arc::clone(calls);
        map(move |options| {
            calls.lock().expect("lock").push(id);
            options
        })
    }

    #[tokio::test]
    async fn async_closure_interceptor() {
        let interceptor = |options: RequestOptions| async move {
            Ok::<_, Error>(options.header("Authorization", "Bearer test-token"))
        };

        let options = interceptor
            .intercept(RequestOptions::get())
            .await
            .expect("intercepted");
        check!(options.header_value("authorization") == Some("Bearer test-token"));
    }

    #[tokio::test]
    async fn compose_runs_in_declaration_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let chain = compose!(recorder(&calls, 1), recorder(&calls, 2), recorder(&calls, 3));

        check!(chain.len() == 3);
        chain.intercept(RequestOptions::default()).await.expect("chain");
        check!(*calls.lock().expect("lock") == [1, 2, 3]);
    }

    #[tokio::test]
    async fn each_interceptor_sees_previous_output() {
        let chain = compose!(
            map(|options: RequestOptions| options.header("X-Header-1", "value1")),
            map(|options: RequestOptions| {
                let seen = options.header_value("X-Header-1").unwrap_or("none").to_string();
                options.header("X-Header-2", format!("after {seen}"))
            }),
        );

        let options = chain
            .intercept(RequestOptions::get().header("Content-Type", "application/json"))
            .await
            .expect("chain");

        check!(options.headers.len() == 3);
        check!(options.header_value("Content-Type") == Some("application/json"));
        check!(options.header_value("X-Header-2") == Some("after value1"));
    }

    #[tokio::test]
    async fn error_stops_chain() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let chain = compose!(
            recorder(&calls, 1),
            |_: RequestOptions| async { Err::<RequestOptions, _>(Error::interceptor("no token")) },
            recorder(&calls, 3),
        );

        let_assert!(Err(Error::Interceptor(message)) = chain.intercept(RequestOptions::get()).await);
        check!(message == "no token");
        check!(*calls.lock().expect("lock") == [1]);
    }

    #[tokio::test]
    async fn compose_shared() {
        let shared: Vec<SharedInterceptor> = vec![
            Arc::new(map(|options: RequestOptions| RequestOptions {
                method: Method::Post,
                ..options
            })),
            Arc::new(map(|options: RequestOptions| options.text("body"))),
        ];

        let options = compose(shared)
            .intercept(RequestOptions::get())
            .await
            .expect("chain");
        check!(options.method == Method::Post);
        check!(options.body.is_some());
    }

    #[tokio::test]
    async fn empty_chain_is_identity() {
        let options = Chain::new()
            .intercept(RequestOptions::delete())
            .await
            .expect("chain");
        check!(options.method == Method::Delete);
    }
}
