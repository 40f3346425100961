//! Client configuration.

use std::time::Duration;

use restcheck_config::ApiSettings;

use crate::retry::RetryConfig;

/// Configuration for the HTTP client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Retry configuration.
    pub retry: RetryConfig,
    /// Per-attempt request timeout.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// User-Agent header value.
    pub user_agent: String,
    /// Whether to emit request/response events.
    pub enable_tracing: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: crate::USER_AGENT.to_string(),
            enable_tracing: true,
        }
    }
}

impl ClientConfig {
    /// Create a new client config builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Derive timeout and retry budget from harness settings.
    pub fn from_settings(settings: &ApiSettings) -> Self {
        let mut retry = RetryConfig::default().with_max_retries(settings.max_retries);
        if let Some(secs) = settings.max_retry_delay_secs {
            retry = retry.with_max_delay(Duration::from_secs(secs));
        }

        let timeout = Duration::from_secs(settings.timeout_secs);
        Self {
            retry,
            timeout,
            connect_timeout: timeout.min(Duration::from_secs(10)),
            ..Self::default()
        }
    }

    /// Upper bound on how long one send call can take.
    ///
    /// There is no deadline across retries: each attempt is bounded only by
    /// `timeout`, so the bound is `(max_retries + 1) * timeout` plus the sum of
    /// every backoff delay. With the defaults (30s, 3 retries) that is
    /// `4 * 30s + 2s + 4s + 8s = 134s`.
    pub fn worst_case_latency(&self) -> Duration {
        self.timeout
            .saturating_mul(self.retry.max_retries.saturating_add(1))
            .saturating_add(self.retry.total_backoff())
    }
}

/// Builder for ClientConfig.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the retry configuration.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.config.retry = retry;
        self
    }

    /// Disable retries.
    pub fn without_retry(mut self) -> Self {
        self.config.retry = RetryConfig::no_retry();
        self
    }

    /// Set the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set custom User-Agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Enable or disable request/response events.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.config.enable_tracing = enabled;
        self
    }

    /// Build the client configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
