//! CDN 服务资源管理
//!
//! Create/read/update/delete/import of a whole service: the service record,
//! its options and its domains, built on the lifecycle, options and domain
//! sync services.

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::services::domain_sync_service::ensure_unique_names;
use crate::services::{
    DomainSyncService, OptionsService, ServiceContext, ServiceLifecycleService,
};
use crate::types::{
    normalize_unique_name, ErrorTtl, ReverseProxyConfig, ServiceSpec, ServiceState,
    UpdateServiceRequest,
};

/// CDN 服务资源管理器
pub struct CdnServiceManager {
    lifecycle: ServiceLifecycleService,
    options: OptionsService,
    domains: DomainSyncService,
}

impl CdnServiceManager {
    /// 创建资源管理器实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            lifecycle: ServiceLifecycleService::new(ctx.clone()),
            options: OptionsService::new(ctx.clone()),
            domains: DomainSyncService::new(ctx),
        }
    }

    /// 创建服务并应用全部配置
    pub async fn create(&self, spec: &ServiceSpec) -> CoreResult<ServiceState> {
        validate_spec(spec)?;

        let service = self
            .lifecycle
            .create_or_reactivate(&spec.new_service())
            .await?;
        let service_id = service.id;

        self.options
            .configure_reverse_proxy(&service_id, &proxy_or_disabled(spec))
            .await?;

        // A reactivated record keeps its old options; converge them too.
        let current = self.options.current_options(&service_id).await?;
        match &spec.error_ttl {
            Some(error_ttl) => {
                self.options
                    .configure_error_ttl(&service_id, error_ttl)
                    .await?;
            }
            None if current.error_ttl.is_some_and(|e| e.enabled || e.value.is_some()) => {
                self.options
                    .configure_error_ttl(&service_id, &disabled_error_ttl())
                    .await?;
            }
            None => {}
        }
        if current.hostname_pass_through != spec.hostname_pass_through {
            self.options
                .configure_pass_through(&service_id, spec.hostname_pass_through)
                .await?;
        }
        if let Some(domains) = &spec.domains {
            self.domains.reconcile_domains(&service_id, domains).await?;
        }

        self.import(&service_id).await
    }

    /// 读取服务状态，服务不存在时返回 `None`
    pub async fn read(&self, service_id: &str) -> CoreResult<Option<ServiceState>> {
        let Some(service) = self.lifecycle.fetch(service_id).await? else {
            return Ok(None);
        };
        let options = self.options.current_options(service_id).await?;

        Ok(Some(ServiceState {
            service,
            reverse_proxy: options
                .reverse_proxy
                .enabled
                .then(|| ReverseProxyConfig::from_remote(&options.reverse_proxy)),
            error_ttl: options.error_ttl.filter(|e| e.value.is_some()),
            hostname_pass_through: options.hostname_pass_through,
        }))
    }

    /// 将服务从 `prior` 更新为 `desired`，只写入发生变化的部分
    pub async fn update(
        &self,
        service_id: &str,
        prior: &ServiceSpec,
        desired: &ServiceSpec,
    ) -> CoreResult<ServiceState> {
        validate_spec(desired)?;
        let unique_name = normalize_unique_name(&desired.unique_name)?;
        if normalize_unique_name(&prior.unique_name)? != unique_name {
            return Err(CoreError::ValidationError(format!(
                "unique_name cannot change from '{}' to '{}'",
                prior.unique_name, desired.unique_name
            )));
        }

        let details = UpdateServiceRequest {
            name: (prior.name != desired.name).then(|| desired.name.clone()),
            description: (prior.description != desired.description)
                .then(|| desired.description.clone()),
        };
        if !details.is_empty() {
            self.lifecycle.update_details(service_id, &details).await?;
        }

        if prior.reverse_proxy != desired.reverse_proxy {
            self.options
                .configure_reverse_proxy(service_id, &proxy_or_disabled(desired))
                .await?;
        }

        if prior.error_ttl != desired.error_ttl {
            let error_ttl = desired.error_ttl.unwrap_or_else(disabled_error_ttl);
            self.options
                .configure_error_ttl(service_id, &error_ttl)
                .await?;
        }

        if prior.hostname_pass_through != desired.hostname_pass_through {
            self.options
                .configure_pass_through(service_id, desired.hostname_pass_through)
                .await?;
        }

        if prior.domains != desired.domains {
            let domains = desired.domains.as_deref().unwrap_or_default();
            self.domains.reconcile_domains(service_id, domains).await?;
        }

        self.import(service_id).await
    }

    /// 删除服务（停用）
    pub async fn delete(&self, service_id: &str) -> CoreResult<()> {
        self.lifecycle.deactivate(service_id).await
    }

    /// 导入已有服务
    pub async fn import(&self, service_id: &str) -> CoreResult<ServiceState> {
        self.read(service_id)
            .await?
            .ok_or_else(|| CoreError::ServiceNotFound(service_id.to_string()))
    }
}

/// The write that clears a removed error TTL.
fn disabled_error_ttl() -> ErrorTtl {
    ErrorTtl {
        enabled: false,
        value: None,
    }
}

fn proxy_or_disabled(spec: &ServiceSpec) -> ReverseProxyConfig {
    spec.reverse_proxy.clone().unwrap_or_default()
}

/// Checks that must pass before the first remote call.
fn validate_spec(spec: &ServiceSpec) -> CoreResult<()> {
    normalize_unique_name(&spec.unique_name)?;
    if let Some(proxy) = &spec.reverse_proxy {
        if proxy.is_effectively_enabled() {
            proxy.validate()?;
        }
    }
    if let Some(domains) = &spec.domains {
        ensure_unique_names(domains)?;
    }
    Ok(())
}
