//! Resilient HTTP transport
//!
//! Every remote call goes through [`Transport::send`], which retries transient
//! failures with exponential backoff plus jitter.
//!
//! # design principles
//! - **Status interpretation stays with the caller** - any answer below 500 (4xx included) is returned as-is
//! - **Pluggable network and randomness** - [`HttpBackend`] and [`JitterSource`] are traits so tests can script both
//! - **No shared mutable state** - a `Transport` is immutable after construction and safe to share

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;

use crate::error::{ProviderError, Result};
use crate::config::RetryPolicy;
use crate::utils::log_sanitizer::truncate_for_log;

/// Identifier used as log prefix.
pub(crate) const LOG_TARGET: &str = "cachefly";

/// A fully built outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Absolute URL including the query string.
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn json_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Looks up a header value (case-insensitive name match).
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status code and body of a received response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs a single HTTP exchange.
///
/// Implementations report connection-level failures as
/// [`ProviderError::NetworkError`] or [`ProviderError::Timeout`] and return
/// every received response regardless of its status.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    async fn execute(&self, request: &ApiRequest) -> Result<RawResponse>;
}

/// Source of the random part of a retry delay.
pub trait JitterSource: Send + Sync {
    /// Returns a duration in `[0, bound)`; zero when `bound` is zero.
    fn jitter(&self, bound: Duration) -> Duration;
}

/// Uniform jitter from the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngJitter;

impl JitterSource for ThreadRngJitter {
    fn jitter(&self, bound: Duration) -> Duration {
        let bound_ms = u64::try_from(bound.as_millis()).unwrap_or(u64::MAX);
        if bound_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(0..bound_ms))
    }
}

/// Always returns the same jitter (clamped below the bound).
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub Duration);

impl JitterSource for FixedJitter {
    fn jitter(&self, bound: Duration) -> Duration {
        if bound.is_zero() {
            Duration::ZERO
        } else {
            self.0.min(bound.saturating_sub(Duration::from_millis(1)))
        }
    }
}

/// 创建带超时配置的 HTTP Client
pub fn create_http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::Configuration {
            detail: format!("failed to create HTTP client: {e}"),
        })
}

/// [`HttpBackend`] over a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    client: Client,
}

impl ReqwestBackend {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: create_http_client(timeout)?,
        })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn execute(&self, request: &ApiRequest) -> Result<RawResponse> {
        let mut builder = self.client.request(request.method.clone(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    detail: e.to_string(),
                }
            } else {
                ProviderError::NetworkError {
                    detail: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError {
                detail: format!("Failed to read response body: {e}"),
            })?;

        Ok(RawResponse { status, body })
    }
}

/// Retrying transport shared by every API call.
#[derive(Clone)]
pub struct Transport {
    backend: Arc<dyn HttpBackend>,
    jitter: Arc<dyn JitterSource>,
    policy: RetryPolicy,
}

impl Transport {
    pub fn new(
        backend: Arc<dyn HttpBackend>,
        jitter: Arc<dyn JitterSource>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            backend,
            jitter,
            policy,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Sends the request, retrying transport failures and 5xx answers.
    ///
    /// # Returns
    /// * `Ok(response)` - the first response with status below 500
    /// * `Err(ProviderError::RetriesExhausted)` - every attempt failed transiently
    pub async fn send(&self, request: &ApiRequest) -> Result<RawResponse> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 0..max_attempts {
            log::debug!(
                "[{LOG_TARGET}] {} {} (attempt {}/{max_attempts})",
                request.method,
                request.url,
                attempt + 1
            );

            let failure = match self.backend.execute(request).await {
                Ok(response) if response.status < 500 => {
                    log::debug!("[{LOG_TARGET}] Response Status: {}", response.status);
                    log::debug!(
                        "[{LOG_TARGET}] Response Body: {}",
                        truncate_for_log(&response.body)
                    );
                    return Ok(response);
                }
                Ok(response) => ProviderError::ServerError {
                    status: response.status,
                    raw_message: truncate_for_log(&response.body),
                },
                Err(e) if e.is_retryable() => e,
                Err(e) => return Err(e),
            };

            if attempt + 1 < max_attempts {
                let delay = self.policy.backoff_delay(attempt)
                    + self.jitter.jitter(self.policy.max_jitter);
                log::warn!(
                    "[{LOG_TARGET}] Request failed (attempt {}/{max_attempts}), retrying in {:.1}s: {failure}",
                    attempt + 1,
                    delay.as_secs_f32(),
                );
                tokio::time::sleep(delay).await;
            } else {
                log::warn!(
                    "[{LOG_TARGET}] Request failed (attempt {}/{max_attempts}), giving up: {failure}",
                    attempt + 1,
                );
            }
            last_error = Some(failure);
        }

        Err(ProviderError::RetriesExhausted {
            attempts: max_attempts,
            last_error: Box::new(last_error.unwrap_or_else(|| ProviderError::NetworkError {
                detail: "All retries exhausted with no error captured".to_string(),
            })),
        })
    }
}

/// Parse JSON response
pub fn parse_json<T>(response_text: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    serde_json::from_str(response_text).map_err(|e| {
        log::error!("[{LOG_TARGET}] JSON parse failed: {e}");
        log::error!(
            "[{LOG_TARGET}] Raw response: {}",
            truncate_for_log(response_text)
        );
        ProviderError::ParseError {
            detail: e.to_string(),
        }
    })
}
