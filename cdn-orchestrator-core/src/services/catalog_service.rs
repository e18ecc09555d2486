//! 只读查询服务

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{
    Account, Domain, DomainQueryParams, ListResponse, Origin, OriginQueryParams, Service,
    ServiceQueryParams,
};

/// 查询服务
pub struct CatalogService {
    ctx: Arc<ServiceContext>,
}

impl CatalogService {
    /// 创建查询服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 分页列出服务
    pub async fn list_services(
        &self,
        params: &ServiceQueryParams,
    ) -> CoreResult<ListResponse<Service>> {
        self.ctx
            .api()
            .list_services(params)
            .await
            .map_err(CoreError::during("list", "services"))
    }

    /// 分页列出服务下的域名
    pub async fn list_service_domains(
        &self,
        service_id: &str,
        params: &DomainQueryParams,
    ) -> CoreResult<ListResponse<Domain>> {
        self.ctx
            .api()
            .list_domains(service_id, params)
            .await
            .map_err(CoreError::during("list domains of", service_id))
    }

    /// 分页列出源站
    pub async fn list_origins(
        &self,
        params: &OriginQueryParams,
    ) -> CoreResult<ListResponse<Origin>> {
        self.ctx
            .api()
            .list_origins(params)
            .await
            .map_err(CoreError::during("list", "origins"))
    }

    /// 当前账户信息
    pub async fn account(&self) -> CoreResult<Account> {
        self.ctx
            .api()
            .get_account()
            .await
            .map_err(CoreError::during("fetch", "account"))
    }
}
