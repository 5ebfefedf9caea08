//! Transport configuration.

use std::time::Duration;

use crate::middleware::DEFAULT_MAX_REDIRECTS;

/// `User-Agent` sent when a request does not set one.
pub const DEFAULT_USER_AGENT: &str = concat!("fetcher/", env!("CARGO_PKG_VERSION"));

/// Configuration for [`HyperClient`](crate::HyperClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Whole-request timeout, from sending to receiving the last body byte.
    pub timeout: Duration,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// Maximum idle connections kept per host.
    pub pool_idle_per_host: usize,
    /// How long an idle connection is kept.
    pub pool_idle_timeout: Duration,
    /// `User-Agent` added to requests without one; `None` sends none.
    pub user_agent: Option<String>,
    /// Redirects followed before failing; `0` returns 3xx responses as-is.
    pub max_redirects: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_idle_per_host: 32,
            pool_idle_timeout: Duration::from_secs(90),
            user_agent: Some(DEFAULT_USER_AGENT.to_string()),
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`]; unset fields keep their defaults.
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    pool_idle_per_host: Option<usize>,
    pool_idle_timeout: Option<Duration>,
    user_agent: Option<Option<String>>,
    max_redirects: Option<usize>,
}

impl ClientConfigBuilder {
    /// Set the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connect timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the maximum idle connections per host.
    #[must_use]
    pub const fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.pool_idle_per_host = Some(count);
        self
    }

    /// Set the idle connection timeout.
    #[must_use]
    pub const fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = Some(timeout);
        self
    }

    /// Set the default `User-Agent`.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(Some(user_agent.into()));
        self
    }

    /// Do not add a `User-Agent` to requests.
    #[must_use]
    pub fn no_user_agent(mut self) -> Self {
        self.user_agent = Some(None);
        self
    }

    /// Set the maximum number of redirects followed.
    #[must_use]
    pub const fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = Some(max);
        self
    }

    /// Return redirect responses instead of following them.
    #[must_use]
    pub const fn no_redirects(self) -> Self {
        self.max_redirects(0)
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            timeout: self.timeout.unwrap_or(defaults.timeout),
            connect_timeout: self.connect_timeout.unwrap_or(defaults.connect_timeout),
            pool_idle_per_host: self
                .pool_idle_per_host
                .unwrap_or(defaults.pool_idle_per_host),
            pool_idle_timeout: self.pool_idle_timeout.unwrap_or(defaults.pool_idle_timeout),
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
            max_redirects: self.max_redirects.unwrap_or(defaults.max_redirects),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.pool_idle_per_host, 32);
        assert_eq!(config.user_agent.as_deref(), Some(DEFAULT_USER_AGENT));
        assert_eq!(config.max_redirects, 20);
    }

    #[test]
    fn builder_overrides() {
        let config = ClientConfig::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(5))
            .user_agent("my-app/2.0")
            .build();

        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.pool_idle_timeout, Duration::from_secs(90));
        assert_eq!(config.user_agent.as_deref(), Some("my-app/2.0"));
    }

    #[test]
    fn builder_without_user_agent() {
        let config = ClientConfig::builder().no_user_agent().build();
        assert!(config.user_agent.is_none());
    }

    #[test]
    fn builder_redirects() {
        assert_eq!(ClientConfig::builder().max_redirects(5).build().max_redirects, 5);
        assert_eq!(ClientConfig::builder().no_redirects().build().max_redirects, 0);
    }
}
