//! 业务逻辑服务层

mod catalog_service;
mod cdn_service_manager;
mod domain_sync_service;
mod options_service;
mod service_lifecycle_service;

pub use catalog_service::CatalogService;
pub use cdn_service_manager::CdnServiceManager;
pub use domain_sync_service::DomainSyncService;
pub use options_service::OptionsService;
pub use service_lifecycle_service::ServiceLifecycleService;

use std::sync::Arc;

use cdn_orchestrator_provider::{create_client, CdnApi, ClientConfig};

use crate::error::CoreResult;

/// 服务上下文 - 持有所有依赖
///
/// The platform layer builds one context per API client and shares it
/// between services. The client is stateless, so one context may serve
/// concurrent operations on different services.
pub struct ServiceContext {
    /// CDN API client
    pub api: Arc<dyn CdnApi>,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(api: Arc<dyn CdnApi>) -> Self {
        Self { api }
    }

    /// Builds a context around a CacheFly client for `config`.
    pub fn from_config(config: ClientConfig) -> CoreResult<Self> {
        let api = create_client(config)?;
        log::debug!("Created {} API client", api.id());
        Ok(Self::new(api))
    }

    /// 获取 API 客户端
    pub fn api(&self) -> &dyn CdnApi {
        self.api.as_ref()
    }
}
