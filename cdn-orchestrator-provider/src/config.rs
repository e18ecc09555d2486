//! Client configuration
//!
//! An immutable value describing where the API lives, how to authenticate and
//! how hard the transport should try. It is built once and then only borrowed.

use std::time::Duration;

use crate::error::{ProviderError, Result};

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "https://api.cachefly.com";
/// Environment variable overriding the API base URL.
pub const ENV_API_URL: &str = "CACHEFLY_API_URL";
/// Environment variable holding the API token.
pub const ENV_TOKEN: &str = "CACHEFLY_TOKEN";

/// 默认请求超时（秒）
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
/// Attempts per request, first try included.
const DEFAULT_MAX_ATTEMPTS: u32 = 5;
const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);
const DEFAULT_MAX_JITTER: Duration = Duration::from_millis(100);

/// Retry behaviour of the transport.
///
/// The delay after failed attempt `n` (0-indexed) is `base_delay * 2^n` plus a
/// jitter drawn from `[0, max_jitter)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per request (minimum 1).
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Exclusive upper bound of the random jitter added to each delay.
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            max_jitter: DEFAULT_MAX_JITTER,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Exponential part of the delay that follows failed attempt `attempt`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let capped_attempt = attempt.min(20); // Prevent 2^attempt from overflowing
        self.base_delay.saturating_mul(1_u32 << capped_attempt)
    }
}

/// Connection settings for the CacheFly API.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without trailing slash, e.g. `https://api.cachefly.com`.
    pub api_url: String,
    /// Bearer token.
    pub token: String,
    /// Per-request timeout of the underlying HTTP client.
    pub request_timeout: Duration,
    /// Retry behaviour.
    pub retry: RetryPolicy,
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: token.into(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
        }
    }

    /// Reads `CACHEFLY_TOKEN` and, optionally, `CACHEFLY_API_URL`.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var(ENV_TOKEN).unwrap_or_default();
        let mut config = Self::new(token);
        if let Ok(url) = std::env::var(ENV_API_URL)
            && !url.trim().is_empty()
        {
            config = config.with_api_url(url);
        }
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Checks that the configuration can produce a working client.
    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(ProviderError::Configuration {
                detail: format!(
                    "an API token must be provided (set {ENV_TOKEN} or pass it explicitly)"
                ),
            });
        }
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ProviderError::Configuration {
                detail: format!("invalid API URL: {}", self.api_url),
            });
        }
        if self.retry.max_attempts == 0 {
            return Err(ProviderError::Configuration {
                detail: "retry policy needs at least one attempt".to_string(),
            });
        }
        Ok(())
    }
}

// The token never reaches logs through `{:?}`.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .field("retry", &self.retry)
            .finish()
    }
}
