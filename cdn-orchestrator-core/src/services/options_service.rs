//! 服务选项配置（反向代理、错误缓存 TTL、主机名透传）

use std::sync::Arc;

use cdn_orchestrator_provider::{OptionsUpdate, ReverseProxyUpdate};

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{ErrorTtl, ProxyChange, ReverseProxyConfig, ServiceOptions};

/// 服务选项服务
pub struct OptionsService {
    ctx: Arc<ServiceContext>,
}

impl OptionsService {
    /// 创建选项服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 读取当前选项
    pub async fn current_options(&self, service_id: &str) -> CoreResult<ServiceOptions> {
        self.ctx
            .api()
            .get_options(service_id)
            .await
            .map_err(CoreError::during("fetch options of", service_id))
    }

    /// 配置反向代理
    ///
    /// A non-empty hostname turns the proxy on. Local validation runs before
    /// the current options are fetched, so invalid input makes no remote call.
    pub async fn configure_reverse_proxy(
        &self,
        service_id: &str,
        desired: &ReverseProxyConfig,
    ) -> CoreResult<ProxyChange> {
        let enabled = desired.is_effectively_enabled();
        if enabled {
            desired.validate()?;
        }

        let current = self.current_options(service_id).await?;

        let (update, change) = if enabled {
            (desired.to_update(), ProxyChange::Applied)
        } else if current.reverse_proxy.enabled {
            (ReverseProxyUpdate::disabled(), ProxyChange::Disabled)
        } else {
            log::debug!("Reverse proxy of service {service_id} already disabled");
            return Ok(ProxyChange::Unchanged);
        };

        log::info!("Writing reverse proxy of service {service_id}: {change:?}");
        self.write(
            service_id,
            &OptionsUpdate::reverse_proxy(update),
            "configure reverse proxy of",
        )
        .await?;
        Ok(change)
    }

    /// 写入错误缓存 TTL
    pub async fn configure_error_ttl(
        &self,
        service_id: &str,
        error_ttl: &ErrorTtl,
    ) -> CoreResult<()> {
        log::info!("Writing error TTL of service {service_id}");
        self.write(
            service_id,
            &OptionsUpdate::error_ttl(*error_ttl),
            "configure error TTL of",
        )
        .await
    }

    /// 写入主机名透传开关
    pub async fn configure_pass_through(&self, service_id: &str, enabled: bool) -> CoreResult<()> {
        log::info!("Writing hostname pass-through ({enabled}) of service {service_id}");
        self.write(
            service_id,
            &OptionsUpdate::pass_through(enabled),
            "configure pass-through of",
        )
        .await
    }

    async fn write(
        &self,
        service_id: &str,
        update: &OptionsUpdate,
        action: &'static str,
    ) -> CoreResult<()> {
        self.ctx
            .api()
            .update_options(service_id, update)
            .await
            .map_err(CoreError::during(action, service_id))
    }
}
