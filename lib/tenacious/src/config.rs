//! Transport settings shared by every request sent through one client.

use std::time::Duration;

/// Settings of a [`crate::HyperClient`].
///
/// Requests built by [`crate::Req`] always carry their own timeout, so
/// `default_timeout` only applies to requests handed to the client directly.
///
/// ```
/// use std::time::Duration;
/// use tenacious::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_connect_timeout(Duration::from_secs(3))
///     .with_max_idle_per_host(0);
///
/// assert_eq!(config.default_timeout, Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Whole-exchange timeout for requests that carry none.
    pub default_timeout: Duration,
    /// TCP connect timeout, proxy connections included.
    pub connect_timeout: Duration,
    /// Idle pooled connections kept per host; zero disables reuse.
    pub max_idle_per_host: usize,
    /// How long an idle pooled connection is kept.
    pub pool_idle_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            default_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            max_idle_per_host: 32,
            pool_idle_timeout: Duration::from_secs(90),
        }
    }
}

impl ClientConfig {
    /// Set the fallback timeout.
    #[must_use]
    pub const fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Set the connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the number of idle connections kept per host.
    #[must_use]
    pub const fn with_max_idle_per_host(mut self, count: usize) -> Self {
        self.max_idle_per_host = count;
        self
    }

    /// Set the idle connection timeout.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }
}
