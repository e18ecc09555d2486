//! 服务生命周期管理
//!
//! CacheFly never hard-deletes a service: removal is a deactivation, and a
//! later create with the same unique name reactivates the old record.

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{
    normalize_unique_name, NewService, ResponseType, Service, UpdateServiceRequest,
};

/// 服务生命周期服务
pub struct ServiceLifecycleService {
    ctx: Arc<ServiceContext>,
}

impl ServiceLifecycleService {
    /// 创建生命周期服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 按 unique name 查找服务（扫描全部分页）
    pub async fn find_by_unique_name(&self, unique_name: &str) -> CoreResult<Option<Service>> {
        let services = self
            .ctx
            .api()
            .list_all_services(ResponseType::Full)
            .await
            .map_err(CoreError::during("list services", unique_name))?;
        Ok(services.into_iter().find(|s| s.unique_name == unique_name))
    }

    /// 创建服务，或重新激活同名的已停用服务
    pub async fn create_or_reactivate(&self, new_service: &NewService) -> CoreResult<Service> {
        let unique_name = normalize_unique_name(&new_service.unique_name)?;

        match self.find_by_unique_name(&unique_name).await? {
            Some(existing) if existing.status.is_deactivated() => {
                log::info!(
                    "Reactivating service {} ({})",
                    existing.unique_name,
                    existing.id
                );
                self.ctx
                    .api()
                    .activate_service(&existing.id)
                    .await
                    .map_err(CoreError::during("activate service", &unique_name))?;
                self.fetch(&existing.id)
                    .await?
                    .ok_or(CoreError::ServiceNotFound(existing.id))
            }
            Some(_) => Err(CoreError::ServiceAlreadyExists(unique_name)),
            None => {
                log::info!("Creating service {unique_name}");
                let created = self
                    .ctx
                    .api()
                    .create_service(&new_service.to_request(unique_name.clone()))
                    .await
                    .map_err(CoreError::during("create service", &unique_name))?;
                Ok(created)
            }
        }
    }

    /// 停用服务
    pub async fn deactivate(&self, service_id: &str) -> CoreResult<()> {
        log::info!("Deactivating service {service_id}");
        self.ctx
            .api()
            .deactivate_service(service_id)
            .await
            .map_err(CoreError::during("deactivate service", service_id))
    }

    /// 获取服务，不存在时返回 `None`
    pub async fn fetch(&self, service_id: &str) -> CoreResult<Option<Service>> {
        self.ctx
            .api()
            .get_service(service_id)
            .await
            .map_err(CoreError::during("fetch service", service_id))
    }

    /// 更新名称/描述后重新读取
    pub async fn update_details(
        &self,
        service_id: &str,
        request: &UpdateServiceRequest,
    ) -> CoreResult<Service> {
        if request.is_empty() {
            log::debug!("Service {service_id} details unchanged");
        } else {
            log::info!("Updating service {service_id} details");
            self.ctx
                .api()
                .update_service(service_id, request)
                .await
                .map_err(CoreError::during("update service", service_id))?;
        }
        self.fetch(service_id)
            .await?
            .ok_or_else(|| CoreError::ServiceNotFound(service_id.to_string()))
    }
}
