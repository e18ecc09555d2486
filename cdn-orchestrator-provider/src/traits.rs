use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{
    Account, CreateServiceRequest, Domain, DomainQueryParams, DomainRequest, ListResponse, Origin,
    OriginQueryParams, OptionsUpdate, ResponseType, Service, ServiceOptions, ServiceQueryParams,
    UpdateServiceRequest,
};

/// Page size used by the `list_all_*` helpers.
pub const FULL_LISTING_PAGE_SIZE: u32 = 100;

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// HTTP status code
    pub status: u16,
    /// Message extracted from the error body, or the (truncated) body itself
    pub message: String,
}

impl RawApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// 错误上下文信息（内部使用）
/// Names the resource a failed call addressed, for `NotFound`/`Conflict`.
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// e.g. `service 'abc'`, `domain 'd1' of service 'abc'`
    pub resource: Option<String>,
}

impl ErrorContext {
    pub fn resource(resource: impl Into<String>) -> Self {
        Self {
            resource: Some(resource.into()),
        }
    }
}

/// Maps a non-2xx answer onto the unified error type (内部使用).
pub(crate) trait ProviderErrorMapper {
    /// Identifier used in log lines.
    fn provider_name(&self) -> &'static str;

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// 快捷方法：未知错误（fallback）
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::ApiError {
            status: raw.status,
            raw_message: raw.message,
        }
    }
}

/// Typed surface of the CacheFly API consumed by the reconciliation services.
///
/// One method per endpoint. Every call goes through the retrying transport;
/// non-2xx answers come back as [`ProviderError`] variants.
#[async_trait]
pub trait CdnApi: Send + Sync {
    /// Identifier for logging.
    fn id(&self) -> &'static str;

    /// `GET /accounts/me`
    async fn get_account(&self) -> Result<Account>;

    /// `GET /services`, one page.
    async fn list_services(&self, params: &ServiceQueryParams) -> Result<ListResponse<Service>>;

    /// `GET /services/{id}`; HTTP 404 yields `Ok(None)`.
    async fn get_service(&self, service_id: &str) -> Result<Option<Service>>;

    /// `POST /services`
    async fn create_service(&self, req: &CreateServiceRequest) -> Result<Service>;

    /// `PUT /services/{id}`
    async fn update_service(&self, service_id: &str, req: &UpdateServiceRequest) -> Result<()>;

    /// `PUT /services/{id}/activate`
    async fn activate_service(&self, service_id: &str) -> Result<()>;

    /// `PUT /services/{id}/deactivate`
    async fn deactivate_service(&self, service_id: &str) -> Result<()>;

    /// `GET /services/{id}/domains`, one page.
    async fn list_domains(
        &self,
        service_id: &str,
        params: &DomainQueryParams,
    ) -> Result<ListResponse<Domain>>;

    /// `POST /services/{id}/domains`
    async fn create_domain(&self, service_id: &str, req: &DomainRequest) -> Result<()>;

    /// `PUT /services/{id}/domains/{domainId}`
    async fn update_domain(
        &self,
        service_id: &str,
        domain_id: &str,
        req: &DomainRequest,
    ) -> Result<()>;

    /// `DELETE /services/{id}/domains/{domainId}`
    async fn delete_domain(&self, service_id: &str, domain_id: &str) -> Result<()>;

    /// `GET /services/{id}/options`
    async fn get_options(&self, service_id: &str) -> Result<ServiceOptions>;

    /// `PUT /services/{id}/options` with only the sections set in `update`.
    async fn update_options(&self, service_id: &str, update: &OptionsUpdate) -> Result<()>;

    /// `GET /origins`, one page.
    async fn list_origins(&self, params: &OriginQueryParams) -> Result<ListResponse<Origin>>;

    /// Fetches every service, page by page.
    ///
    /// Stops on an empty page or once `meta.count` items were seen. Without a
    /// count, a short page ends the listing.
    async fn list_all_services(&self, response_type: ResponseType) -> Result<Vec<Service>> {
        let mut services = Vec::new();
        let mut offset = 0;
        loop {
            let params = ServiceQueryParams {
                response_type,
                status: None,
                limit: FULL_LISTING_PAGE_SIZE,
                offset,
            };
            let page = self.list_services(&params).await?;
            let fetched = page.data.len();
            services.extend(page.data);
            if is_last_page(fetched, services.len(), page.meta.count) {
                return Ok(services);
            }
            offset = next_offset(offset, fetched);
        }
    }

    /// Fetches every domain of a service, page by page.
    async fn list_all_domains(&self, service_id: &str) -> Result<Vec<Domain>> {
        let mut domains = Vec::new();
        let mut offset = 0;
        loop {
            let params = DomainQueryParams::page(FULL_LISTING_PAGE_SIZE, offset);
            let page = self.list_domains(service_id, &params).await?;
            let fetched = page.data.len();
            domains.extend(page.data);
            if is_last_page(fetched, domains.len(), page.meta.count) {
                return Ok(domains);
            }
            offset = next_offset(offset, fetched);
        }
    }
}

/// A reported `meta.count` is authoritative; the short-page rule applies only
/// when the API leaves it out, since the server may cap the page size.
fn is_last_page(page_len: usize, total_fetched: usize, reported_count: u32) -> bool {
    if page_len == 0 {
        return true;
    }
    if reported_count > 0 {
        return total_fetched >= reported_count as usize;
    }
    page_len < FULL_LISTING_PAGE_SIZE as usize
}

fn next_offset(offset: u32, page_len: usize) -> u32 {
    offset.saturating_add(u32::try_from(page_len).unwrap_or(u32::MAX))
}
