//! CacheFly `CdnApi` trait 实现

use async_trait::async_trait;
use reqwest::Method;

use crate::error::Result;
use crate::traits::{CdnApi, ErrorContext};
use crate::types::{
    Account, CreateServiceRequest, Domain, DomainQueryParams, DomainRequest, ListResponse,
    OptionsUpdate, Origin, OriginQueryParams, Service, ServiceOptions, ServiceQueryParams,
    UpdateServiceRequest,
};

use super::{API_VERSION, CacheflyProvider, OPTIONS_API_VERSION};

fn service_ctx(service_id: &str) -> ErrorContext {
    ErrorContext::resource(format!("service '{service_id}'"))
}

fn domain_ctx(service_id: &str, domain: &str) -> ErrorContext {
    ErrorContext::resource(format!("domain '{domain}' of service '{service_id}'"))
}

#[async_trait]
impl CdnApi for CacheflyProvider {
    fn id(&self) -> &'static str {
        "cachefly"
    }

    async fn get_account(&self) -> Result<Account> {
        let url = self.endpoint(API_VERSION, &["accounts", "me"], &[]);
        self.get(url, ErrorContext::resource("account")).await
    }

    async fn list_services(&self, params: &ServiceQueryParams) -> Result<ListResponse<Service>> {
        let url = self.endpoint(API_VERSION, &["services"], &params.query_pairs());
        self.get(url, ErrorContext::resource("services")).await
    }

    async fn get_service(&self, service_id: &str) -> Result<Option<Service>> {
        let url = self.endpoint(API_VERSION, &["services", service_id], &[]);
        self.get_optional(url, service_ctx(service_id)).await
    }

    async fn create_service(&self, req: &CreateServiceRequest) -> Result<Service> {
        let url = self.endpoint(API_VERSION, &["services"], &[]);
        let ctx = ErrorContext::resource(format!("service '{}'", req.unique_name));
        self.request_json(Method::POST, url, req, ctx).await
    }

    async fn update_service(&self, service_id: &str, req: &UpdateServiceRequest) -> Result<()> {
        let url = self.endpoint(API_VERSION, &["services", service_id], &[]);
        self.request_no_content(Method::PUT, url, Some(req), service_ctx(service_id))
            .await
    }

    async fn activate_service(&self, service_id: &str) -> Result<()> {
        let url = self.endpoint(API_VERSION, &["services", service_id, "activate"], &[]);
        self.request_no_content::<()>(Method::PUT, url, None, service_ctx(service_id))
            .await
    }

    async fn deactivate_service(&self, service_id: &str) -> Result<()> {
        let url = self.endpoint(API_VERSION, &["services", service_id, "deactivate"], &[]);
        self.request_no_content::<()>(Method::PUT, url, None, service_ctx(service_id))
            .await
    }

    async fn list_domains(
        &self,
        service_id: &str,
        params: &DomainQueryParams,
    ) -> Result<ListResponse<Domain>> {
        let url = self.endpoint(
            API_VERSION,
            &["services", service_id, "domains"],
            &params.query_pairs(),
        );
        self.get(url, service_ctx(service_id)).await
    }

    async fn create_domain(&self, service_id: &str, req: &DomainRequest) -> Result<()> {
        let url = self.endpoint(API_VERSION, &["services", service_id, "domains"], &[]);
        self.request_no_content(
            Method::POST,
            url,
            Some(req),
            domain_ctx(service_id, &req.name),
        )
        .await
    }

    async fn update_domain(
        &self,
        service_id: &str,
        domain_id: &str,
        req: &DomainRequest,
    ) -> Result<()> {
        let url = self.endpoint(
            API_VERSION,
            &["services", service_id, "domains", domain_id],
            &[],
        );
        self.request_no_content(
            Method::PUT,
            url,
            Some(req),
            domain_ctx(service_id, domain_id),
        )
        .await
    }

    async fn delete_domain(&self, service_id: &str, domain_id: &str) -> Result<()> {
        let url = self.endpoint(
            API_VERSION,
            &["services", service_id, "domains", domain_id],
            &[],
        );
        self.request_no_content::<()>(
            Method::DELETE,
            url,
            None,
            domain_ctx(service_id, domain_id),
        )
        .await
    }

    async fn get_options(&self, service_id: &str) -> Result<ServiceOptions> {
        let url = self.endpoint(
            OPTIONS_API_VERSION,
            &["services", service_id, "options"],
            &[],
        );
        self.get(url, service_ctx(service_id)).await
    }

    async fn update_options(&self, service_id: &str, update: &OptionsUpdate) -> Result<()> {
        let url = self.endpoint(
            OPTIONS_API_VERSION,
            &["services", service_id, "options"],
            &[],
        );
        self.request_no_content(Method::PUT, url, Some(update), service_ctx(service_id))
            .await
    }

    async fn list_origins(&self, params: &OriginQueryParams) -> Result<ListResponse<Origin>> {
        let url = self.endpoint(API_VERSION, &["origins"], &params.query_pairs());
        self.get(url, ErrorContext::resource("origins")).await
    }
}
