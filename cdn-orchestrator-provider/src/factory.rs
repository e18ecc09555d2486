//! Client factory functions.

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::providers::CacheflyProvider;
use crate::traits::CdnApi;

/// Creates a [`CdnApi`] client from the given configuration.
///
/// The configuration is validated first. The returned client is wrapped in
/// `Arc<dyn CdnApi>` for sharing across async tasks.
///
/// # Examples
///
/// ```rust,no_run
/// use cdn_orchestrator_provider::{create_client, ClientConfig};
///
/// let api = create_client(ClientConfig::new("your-token")).unwrap();
/// ```
pub fn create_client(config: ClientConfig) -> Result<Arc<dyn CdnApi>> {
    Ok(Arc::new(CacheflyProvider::new(config)?))
}

/// Creates a client from `CACHEFLY_TOKEN` / `CACHEFLY_API_URL`.
pub fn create_client_from_env() -> Result<Arc<dyn CdnApi>> {
    create_client(ClientConfig::from_env()?)
}
