//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use cdn_orchestrator_provider::{
    Account, CdnApi, CreateServiceRequest, Domain, DomainQueryParams, DomainRequest, ListMeta,
    ListResponse, OptionsUpdate, Origin, OriginQueryParams, ProviderError, ResponseType,
    Result, Service, ServiceOptions, ServiceQueryParams, ServiceStatus, UpdateServiceRequest,
    ValidationMode,
};
use tokio::sync::RwLock;

use crate::services::ServiceContext;

// ===== Call log =====

/// One call received by [`MockCdnApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    GetAccount,
    ListServices {
        response_type: ResponseType,
        offset: u32,
    },
    GetService(String),
    CreateService(CreateServiceRequest),
    UpdateService(String, UpdateServiceRequest),
    ActivateService(String),
    DeactivateService(String),
    ListDomains {
        service_id: String,
        offset: u32,
    },
    CreateDomain(String, DomainRequest),
    UpdateDomain(String, String, DomainRequest),
    DeleteDomain(String, String),
    GetOptions(String),
    UpdateOptions(String, OptionsUpdate),
    ListOrigins,
}

impl ApiCall {
    /// Whether the call changes remote state.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::CreateService(_)
                | Self::UpdateService(..)
                | Self::ActivateService(_)
                | Self::DeactivateService(_)
                | Self::CreateDomain(..)
                | Self::UpdateDomain(..)
                | Self::DeleteDomain(..)
                | Self::UpdateOptions(..)
        )
    }
}

type CallMatcher = Box<dyn Fn(&ApiCall) -> bool + Send + Sync>;

fn not_found(resource: String) -> ProviderError {
    ProviderError::NotFound {
        resource,
        raw_message: None,
    }
}

// ===== MockCdnApi =====

/// In-memory CDN API with a call log and failure injection.
pub struct MockCdnApi {
    services: RwLock<Vec<Service>>,
    /// service id -> domains in listing order
    domains: RwLock<HashMap<String, Vec<Domain>>>,
    options: RwLock<HashMap<String, ServiceOptions>>,
    origins: RwLock<Vec<Origin>>,
    calls: RwLock<Vec<ApiCall>>,
    failures: RwLock<Vec<(CallMatcher, ProviderError)>>,
    next_id: AtomicUsize,
}

impl MockCdnApi {
    pub fn new() -> Self {
        Self {
            services: RwLock::new(Vec::new()),
            domains: RwLock::new(HashMap::new()),
            options: RwLock::new(HashMap::new()),
            origins: RwLock::new(Vec::new()),
            calls: RwLock::new(Vec::new()),
            failures: RwLock::new(Vec::new()),
            next_id: AtomicUsize::new(1),
        }
    }

    fn next_id(&self, prefix: &str) -> String {
        format!("{prefix}-{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Every call matching `matcher` fails with `err` (the call is still logged).
    pub async fn fail_when(
        &self,
        matcher: impl Fn(&ApiCall) -> bool + Send + Sync + 'static,
        err: ProviderError,
    ) {
        self.failures.write().await.push((Box::new(matcher), err));
    }

    pub async fn seed_service(&self, unique_name: &str, status: ServiceStatus) -> Service {
        let service = Service {
            id: self.next_id("svc"),
            name: unique_name.to_string(),
            unique_name: unique_name.to_string(),
            status,
            ..Service::default()
        };
        self.services.write().await.push(service.clone());
        service
    }

    pub async fn seed_domain(
        &self,
        service_id: &str,
        name: &str,
        description: &str,
        validation_mode: ValidationMode,
    ) -> String {
        let id = self.next_id("dom");
        self.domains
            .write()
            .await
            .entry(service_id.to_string())
            .or_default()
            .push(Domain {
                id: id.clone(),
                name: name.to_string(),
                description: description.to_string(),
                service: service_id.to_string(),
                validation_mode,
                ..Domain::default()
            });
        id
    }

    pub async fn seed_origin(&self, name: &str) {
        let origin = Origin {
            id: self.next_id("org"),
            name: name.to_string(),
        };
        self.origins.write().await.push(origin);
    }

    pub async fn set_options(&self, service_id: &str, options: ServiceOptions) {
        self.options
            .write()
            .await
            .insert(service_id.to_string(), options);
    }

    pub async fn options_of(&self, service_id: &str) -> ServiceOptions {
        self.options
            .read()
            .await
            .get(service_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn service(&self, service_id: &str) -> Option<Service> {
        self.services
            .read()
            .await
            .iter()
            .find(|s| s.id == service_id)
            .cloned()
    }

    pub async fn domains_of(&self, service_id: &str) -> Vec<Domain> {
        self.domains
            .read()
            .await
            .get(service_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn domain_names(&self, service_id: &str) -> Vec<String> {
        self.domains_of(service_id)
            .await
            .into_iter()
            .map(|d| d.name)
            .collect()
    }

    pub async fn calls(&self) -> Vec<ApiCall> {
        self.calls.read().await.clone()
    }

    pub async fn mutations(&self) -> Vec<ApiCall> {
        self.calls()
            .await
            .into_iter()
            .filter(ApiCall::is_mutation)
            .collect()
    }

    pub async fn clear_calls(&self) {
        self.calls.write().await.clear();
    }

    /// Logs the call and returns the injected failure, if any.
    async fn record(&self, call: ApiCall) -> Result<()> {
        let failure = self
            .failures
            .read()
            .await
            .iter()
            .find(|(matcher, _)| matcher(&call))
            .map(|(_, err)| err.clone());
        self.calls.write().await.push(call);
        failure.map_or(Ok(()), Err)
    }

    async fn require_service(&self, service_id: &str) -> Result<()> {
        if self.service(service_id).await.is_some() {
            Ok(())
        } else {
            Err(not_found(format!("service '{service_id}'")))
        }
    }

    async fn set_status(&self, service_id: &str, status: ServiceStatus) -> Result<()> {
        let mut services = self.services.write().await;
        let service = services
            .iter_mut()
            .find(|s| s.id == service_id)
            .ok_or_else(|| not_found(format!("service '{service_id}'")))?;
        service.status = status;
        Ok(())
    }
}

fn page<T: Clone>(items: &[T], offset: u32, limit: Option<u32>) -> ListResponse<T> {
    let start = (offset as usize).min(items.len());
    let end = limit.map_or(items.len(), |l| (start + l as usize).min(items.len()));
    ListResponse::new(
        items[start..end].to_vec(),
        ListMeta {
            limit: limit.unwrap_or_default(),
            offset,
            count: u32::try_from(items.len()).unwrap_or(u32::MAX),
        },
    )
}

#[async_trait]
impl CdnApi for MockCdnApi {
    fn id(&self) -> &'static str {
        "mock"
    }

    async fn get_account(&self) -> Result<Account> {
        self.record(ApiCall::GetAccount).await?;
        Ok(Account {
            id: "acc-1".to_string(),
            company_name: "Example Corp".to_string(),
            website: "https://example.com".to_string(),
        })
    }

    async fn list_services(&self, params: &ServiceQueryParams) -> Result<ListResponse<Service>> {
        self.record(ApiCall::ListServices {
            response_type: params.response_type,
            offset: params.offset,
        })
        .await?;
        let services: Vec<Service> = self
            .services
            .read()
            .await
            .iter()
            .filter(|s| params.status.as_ref().is_none_or(|status| &s.status == status))
            .cloned()
            .collect();
        Ok(page(&services, params.offset, Some(params.limit)))
    }

    async fn get_service(&self, service_id: &str) -> Result<Option<Service>> {
        self.record(ApiCall::GetService(service_id.to_string()))
            .await?;
        Ok(self.service(service_id).await)
    }

    async fn create_service(&self, req: &CreateServiceRequest) -> Result<Service> {
        self.record(ApiCall::CreateService(req.clone())).await?;
        let mut services = self.services.write().await;
        if services.iter().any(|s| s.unique_name == req.unique_name) {
            return Err(ProviderError::Conflict {
                resource: format!("service '{}'", req.unique_name),
                raw_message: None,
            });
        }
        let service = Service {
            id: self.next_id("svc"),
            name: req.name.clone(),
            unique_name: req.unique_name.clone(),
            description: req.description.clone(),
            status: ServiceStatus::Active,
            ..Service::default()
        };
        services.push(service.clone());
        Ok(service)
    }

    async fn update_service(&self, service_id: &str, req: &UpdateServiceRequest) -> Result<()> {
        self.record(ApiCall::UpdateService(service_id.to_string(), req.clone()))
            .await?;
        let mut services = self.services.write().await;
        let service = services
            .iter_mut()
            .find(|s| s.id == service_id)
            .ok_or_else(|| not_found(format!("service '{service_id}'")))?;
        if let Some(name) = &req.name {
            service.name.clone_from(name);
        }
        if let Some(description) = &req.description {
            service.description.clone_from(description);
        }
        Ok(())
    }

    async fn activate_service(&self, service_id: &str) -> Result<()> {
        self.record(ApiCall::ActivateService(service_id.to_string()))
            .await?;
        self.set_status(service_id, ServiceStatus::Active).await
    }

    async fn deactivate_service(&self, service_id: &str) -> Result<()> {
        self.record(ApiCall::DeactivateService(service_id.to_string()))
            .await?;
        self.set_status(service_id, ServiceStatus::Deactivated)
            .await
    }

    async fn list_domains(
        &self,
        service_id: &str,
        params: &DomainQueryParams,
    ) -> Result<ListResponse<Domain>> {
        let offset = params.offset.unwrap_or_default();
        self.record(ApiCall::ListDomains {
            service_id: service_id.to_string(),
            offset,
        })
        .await?;
        self.require_service(service_id).await?;
        let domains: Vec<Domain> = self
            .domains_of(service_id)
            .await
            .into_iter()
            .filter(|d| {
                params
                    .search
                    .as_deref()
                    .is_none_or(|needle| d.name.contains(needle))
            })
            .collect();
        Ok(page(&domains, offset, params.limit))
    }

    async fn create_domain(&self, service_id: &str, req: &DomainRequest) -> Result<()> {
        self.record(ApiCall::CreateDomain(service_id.to_string(), req.clone()))
            .await?;
        self.require_service(service_id).await?;
        let mut domains = self.domains.write().await;
        let list = domains.entry(service_id.to_string()).or_default();
        if list.iter().any(|d| d.name == req.name) {
            return Err(ProviderError::Conflict {
                resource: format!("domain '{}'", req.name),
                raw_message: None,
            });
        }
        list.push(Domain {
            id: self.next_id("dom"),
            name: req.name.clone(),
            description: req.description.clone(),
            service: service_id.to_string(),
            validation_mode: req.validation_mode,
            ..Domain::default()
        });
        Ok(())
    }

    async fn update_domain(
        &self,
        service_id: &str,
        domain_id: &str,
        req: &DomainRequest,
    ) -> Result<()> {
        self.record(ApiCall::UpdateDomain(
            service_id.to_string(),
            domain_id.to_string(),
            req.clone(),
        ))
        .await?;
        let mut domains = self.domains.write().await;
        let domain = domains
            .get_mut(service_id)
            .and_then(|list| list.iter_mut().find(|d| d.id == domain_id))
            .ok_or_else(|| not_found(format!("domain '{domain_id}'")))?;
        domain.name.clone_from(&req.name);
        domain.description.clone_from(&req.description);
        domain.validation_mode = req.validation_mode;
        Ok(())
    }

    async fn delete_domain(&self, service_id: &str, domain_id: &str) -> Result<()> {
        self.record(ApiCall::DeleteDomain(
            service_id.to_string(),
            domain_id.to_string(),
        ))
        .await?;
        let mut domains = self.domains.write().await;
        let list = domains
            .get_mut(service_id)
            .ok_or_else(|| not_found(format!("service '{service_id}'")))?;
        let before = list.len();
        list.retain(|d| d.id != domain_id);
        if list.len() == before {
            return Err(not_found(format!("domain '{domain_id}'")));
        }
        Ok(())
    }

    async fn get_options(&self, service_id: &str) -> Result<ServiceOptions> {
        self.record(ApiCall::GetOptions(service_id.to_string()))
            .await?;
        self.require_service(service_id).await?;
        Ok(self.options_of(service_id).await)
    }

    async fn update_options(&self, service_id: &str, update: &OptionsUpdate) -> Result<()> {
        self.record(ApiCall::UpdateOptions(
            service_id.to_string(),
            update.clone(),
        ))
        .await?;
        self.require_service(service_id).await?;
        let mut options = self.options.write().await;
        let current = options.entry(service_id.to_string()).or_default();
        if let Some(proxy) = &update.reverse_proxy {
            let remote = &mut current.reverse_proxy;
            remote.enabled = proxy.enabled;
            if let Some(hostname) = &proxy.hostname {
                remote.hostname.clone_from(hostname);
            }
            if let Some(mode) = proxy.mode {
                remote.mode = mode;
            }
            if let Some(ttl) = proxy.ttl {
                remote.ttl = ttl;
            }
            if let Some(flag) = proxy.cache_by_query_param {
                remote.cache_by_query_param = flag;
            }
            if let Some(scheme) = proxy.origin_scheme {
                remote.origin_scheme = scheme;
            }
            if let Some(flag) = proxy.use_robots_txt {
                remote.use_robots_txt = flag;
            }
            for (field, value) in [
                (&mut remote.prepend, &proxy.prepend),
                (&mut remote.access_key, &proxy.access_key),
                (&mut remote.secret_key, &proxy.secret_key),
                (&mut remote.region, &proxy.region),
                (&mut remote.bucket, &proxy.bucket),
            ] {
                if value.is_some() {
                    field.clone_from(value);
                }
            }
        }
        if let Some(error_ttl) = update.error_ttl {
            current.error_ttl = Some(error_ttl);
        }
        if let Some(pass_through) = update.hostname_pass_through {
            current.hostname_pass_through = pass_through;
        }
        Ok(())
    }

    async fn list_origins(&self, params: &OriginQueryParams) -> Result<ListResponse<Origin>> {
        self.record(ApiCall::ListOrigins).await?;
        let origins = self.origins.read().await.clone();
        Ok(page(
            &origins,
            params.offset.unwrap_or_default(),
            params.limit,
        ))
    }
}

// ===== 工厂方法 =====

/// 创建测试用 `ServiceContext`
pub fn create_test_context() -> (Arc<ServiceContext>, Arc<MockCdnApi>) {
    let api = Arc::new(MockCdnApi::new());
    let ctx = Arc::new(ServiceContext::new(api.clone()));
    (ctx, api)
}

/// A transient failure as the transport reports it after the last attempt.
pub fn exhausted_error() -> ProviderError {
    ProviderError::RetriesExhausted {
        attempts: 5,
        last_error: Box::new(ProviderError::ServerError {
            status: 503,
            raw_message: "unavailable".to_string(),
        }),
    }
}
