//! CacheFly CDN API client

mod error;
mod http;
mod provider;
/// CacheFly-specific wire types (error bodies).
pub(crate) mod types;

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::http_client::{HttpBackend, JitterSource, ReqwestBackend, ThreadRngJitter, Transport};

/// API version of every endpoint except options.
pub(crate) const API_VERSION: &str = "2.5";
/// The options document is only served by the newer API version.
pub(crate) const OPTIONS_API_VERSION: &str = "2.6";

/// CacheFly API client.
///
/// Authenticates with a bearer token. Every call goes through a retrying
/// [`Transport`]; the client holds no mutable state and can be shared freely.
///
/// # Construction
///
/// ```rust,no_run
/// use cdn_orchestrator_provider::{CacheflyProvider, ClientConfig};
///
/// let provider = CacheflyProvider::new(ClientConfig::new("your-api-token"))?;
/// # Ok::<(), cdn_orchestrator_provider::ProviderError>(())
/// ```
pub struct CacheflyProvider {
    pub(crate) config: ClientConfig,
    pub(crate) transport: Transport,
}

impl CacheflyProvider {
    /// Creates a client backed by `reqwest`, with jitter from the thread RNG.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let backend = ReqwestBackend::new(config.request_timeout)?;
        Ok(Self::with_backend(
            config,
            Arc::new(backend),
            Arc::new(ThreadRngJitter),
        ))
    }

    /// Creates a client over a custom network backend and jitter source.
    pub fn with_backend(
        config: ClientConfig,
        backend: Arc<dyn HttpBackend>,
        jitter: Arc<dyn JitterSource>,
    ) -> Self {
        let transport = Transport::new(backend, jitter, config.retry.clone());
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}
