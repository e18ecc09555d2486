//! 域名同步服务
//!
//! Converges the domains attached to a service onto a declared list:
//! after a successful run the remote set equals the declared domains plus
//! any default `*.cachefly.net` domains, which are never deleted.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use cdn_orchestrator_provider::is_default_domain;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{DesiredDomain, Domain, DomainSyncReport};

/// 域名同步服务
pub struct DomainSyncService {
    ctx: Arc<ServiceContext>,
}

impl DomainSyncService {
    /// 创建域名同步服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 将服务的域名同步为 `desired`
    ///
    /// Calls are issued one at a time; the first failing write aborts the run
    /// and already applied writes stay in place.
    pub async fn reconcile_domains(
        &self,
        service_id: &str,
        desired: &[DesiredDomain],
    ) -> CoreResult<DomainSyncReport> {
        ensure_unique_names(desired)?;

        let api = self.ctx.api();
        let existing = api
            .list_all_domains(service_id)
            .await
            .map_err(CoreError::during("list domains of", service_id))?;
        let by_name: HashMap<&str, &Domain> =
            existing.iter().map(|d| (d.name.as_str(), d)).collect();

        let mut report = DomainSyncReport::default();
        let mut processed: HashSet<&str> = HashSet::with_capacity(desired.len());

        for domain in desired {
            match by_name.get(domain.name.as_str()) {
                Some(remote) if domain.differs_from(remote) => {
                    log::info!("Updating domain {} on service {service_id}", domain.name);
                    api.update_domain(service_id, &remote.id, &domain.to_request())
                        .await
                        .map_err(CoreError::during("update domain", &domain.name))?;
                    report.updated.push(domain.name.clone());
                }
                Some(_) => {
                    log::debug!("Domain {} on service {service_id} unchanged", domain.name);
                    report.unchanged.push(domain.name.clone());
                }
                None => {
                    log::info!("Creating domain {} on service {service_id}", domain.name);
                    api.create_domain(service_id, &domain.to_request())
                        .await
                        .map_err(CoreError::during("create domain", &domain.name))?;
                    report.created.push(domain.name.clone());
                }
            }
            processed.insert(domain.name.as_str());
        }

        for remote in &existing {
            if processed.contains(remote.name.as_str()) {
                continue;
            }
            if is_default_domain(&remote.name) {
                log::debug!("Keeping default domain {}", remote.name);
                continue;
            }
            log::info!("Deleting domain {} from service {service_id}", remote.name);
            api.delete_domain(service_id, &remote.id)
                .await
                .map_err(CoreError::during("delete domain", &remote.name))?;
            report.deleted.push(remote.name.clone());
        }

        Ok(report)
    }
}

pub(crate) fn ensure_unique_names(desired: &[DesiredDomain]) -> CoreResult<()> {
    let mut seen = HashSet::with_capacity(desired.len());
    for domain in desired {
        if !seen.insert(domain.name.as_str()) {
            return Err(CoreError::ValidationError(format!(
                "domain '{}' is declared more than once",
                domain.name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_context, exhausted_error, ApiCall, MockCdnApi};
    use cdn_orchestrator_provider::{DomainRequest, ProviderError, ServiceStatus, ValidationMode};

    async fn setup() -> (DomainSyncService, Arc<MockCdnApi>, String) {
        let (ctx, api) = create_test_context();
        let service = api.seed_service("mysite", ServiceStatus::Active).await;
        (DomainSyncService::new(ctx), api, service.id)
    }

    #[tokio::test]
    async fn updates_changed_and_deletes_stale() {
        let (svc, api, sid) = setup().await;
        let a_id = api.seed_domain(&sid, "a.com", "", ValidationMode::None).await;
        let old_id = api
            .seed_domain(&sid, "old.com", "", ValidationMode::None)
            .await;

        let desired = [DesiredDomain::new("a.com").with_validation_mode(ValidationMode::Dns)];
        let report = svc.reconcile_domains(&sid, &desired).await.unwrap();

        assert_eq!(report.updated, vec!["a.com"]);
        assert_eq!(report.deleted, vec!["old.com"]);
        assert!(report.created.is_empty());
        assert_eq!(
            api.mutations().await,
            vec![
                ApiCall::UpdateDomain(
                    sid.clone(),
                    a_id,
                    DomainRequest {
                        name: "a.com".to_string(),
                        description: String::new(),
                        validation_mode: ValidationMode::Dns,
                    }
                ),
                ApiCall::DeleteDomain(sid, old_id),
            ]
        );
    }

    #[tokio::test]
    async fn empty_desired_keeps_default_domains() {
        let (svc, api, sid) = setup().await;
        api.seed_domain(&sid, "keep.cachefly.net", "", ValidationMode::None)
            .await;

        let report = svc.reconcile_domains(&sid, &[]).await.unwrap();

        assert!(report.is_noop());
        assert!(api.mutations().await.is_empty());
        assert_eq!(api.domain_names(&sid).await, vec!["keep.cachefly.net"]);
    }

    #[tokio::test]
    async fn default_domain_match_is_case_insensitive() {
        let (svc, api, sid) = setup().await;
        api.seed_domain(&sid, "Edge.CacheFly.NET", "", ValidationMode::None)
            .await;

        svc.reconcile_domains(&sid, &[]).await.unwrap();

        assert!(api.mutations().await.is_empty());
    }

    #[tokio::test]
    async fn converges_and_is_idempotent() {
        let (svc, api, sid) = setup().await;
        api.seed_domain(&sid, "keep.cachefly.net", "", ValidationMode::None)
            .await;
        api.seed_domain(&sid, "b.com", "old", ValidationMode::None)
            .await;
        api.seed_domain(&sid, "gone.com", "", ValidationMode::Http)
            .await;

        let desired = vec![
            DesiredDomain::new("a.com").with_validation_mode(ValidationMode::Http),
            DesiredDomain::new("b.com").with_description("new"),
        ];
        let first = svc.reconcile_domains(&sid, &desired).await.unwrap();
        assert_eq!(first.created, vec!["a.com"]);
        assert_eq!(first.updated, vec!["b.com"]);
        assert_eq!(first.deleted, vec!["gone.com"]);

        let mut names = api.domain_names(&sid).await;
        names.sort();
        assert_eq!(names, vec!["a.com", "b.com", "keep.cachefly.net"]);
        let remote = api.domains_of(&sid).await;
        for want in &desired {
            let got = remote.iter().find(|d| d.name == want.name).unwrap();
            assert!(!want.differs_from(got));
        }

        api.clear_calls().await;
        let second = svc.reconcile_domains(&sid, &desired).await.unwrap();
        assert!(second.is_noop());
        assert_eq!(second.unchanged, vec!["a.com", "b.com"]);
        assert!(api.mutations().await.is_empty());
    }

    #[tokio::test]
    async fn unchanged_domain_issues_no_call() {
        let (svc, api, sid) = setup().await;
        api.seed_domain(&sid, "a.com", "main", ValidationMode::Dns)
            .await;

        let desired = [DesiredDomain::new("a.com")
            .with_description("main")
            .with_validation_mode(ValidationMode::Dns)];
        svc.reconcile_domains(&sid, &desired).await.unwrap();

        assert!(api.mutations().await.is_empty());
    }

    #[tokio::test]
    async fn deletes_follow_listing_order() {
        let (svc, api, sid) = setup().await;
        let z = api.seed_domain(&sid, "z.com", "", ValidationMode::None).await;
        let a = api.seed_domain(&sid, "a.com", "", ValidationMode::None).await;

        svc.reconcile_domains(&sid, &[]).await.unwrap();

        assert_eq!(
            api.mutations().await,
            vec![
                ApiCall::DeleteDomain(sid.clone(), z),
                ApiCall::DeleteDomain(sid, a),
            ]
        );
    }

    #[tokio::test]
    async fn pages_through_large_listings() {
        let (svc, api, sid) = setup().await;
        for i in 0..150 {
            api.seed_domain(&sid, &format!("d{i}.com"), "", ValidationMode::None)
                .await;
        }
        let desired: Vec<DesiredDomain> = (0..150)
            .map(|i| DesiredDomain::new(format!("d{i}.com")))
            .collect();

        let report = svc.reconcile_domains(&sid, &desired).await.unwrap();

        assert!(report.is_noop());
        assert_eq!(report.unchanged.len(), 150);
        let listings: Vec<ApiCall> = api
            .calls()
            .await
            .into_iter()
            .filter(|c| matches!(c, ApiCall::ListDomains { .. }))
            .collect();
        assert_eq!(listings.len(), 2);
    }

    #[tokio::test]
    async fn duplicate_names_rejected_before_any_call() {
        let (svc, api, sid) = setup().await;

        let desired = [DesiredDomain::new("a.com"), DesiredDomain::new("a.com")];
        let err = svc.reconcile_domains(&sid, &desired).await.unwrap_err();

        assert!(matches!(err, CoreError::ValidationError(ref m) if m.contains("a.com")));
        assert!(api.calls().await.is_empty());
    }

    #[tokio::test]
    async fn first_failure_aborts() {
        let (svc, api, sid) = setup().await;
        api.fail_when(
            |call| matches!(call, ApiCall::CreateDomain(_, req) if req.name == "b.com"),
            exhausted_error(),
        )
        .await;

        let desired = [
            DesiredDomain::new("a.com"),
            DesiredDomain::new("b.com"),
            DesiredDomain::new("c.com"),
        ];
        let err = svc.reconcile_domains(&sid, &desired).await.unwrap_err();

        assert!(err.to_string().starts_with("Failed to create domain 'b.com'"));
        assert!(matches!(
            err.provider_error(),
            Some(ProviderError::RetriesExhausted { .. })
        ));
        // a.com stays, c.com was never attempted
        assert_eq!(api.domain_names(&sid).await, vec!["a.com"]);
        assert_eq!(api.mutations().await.len(), 2);
    }

    #[tokio::test]
    async fn missing_service_fails_on_listing() {
        let (ctx, api) = create_test_context();
        let svc = DomainSyncService::new(ctx);

        let err = svc
            .reconcile_domains("svc-404", &[DesiredDomain::new("a.com")])
            .await
            .unwrap_err();

        assert!(matches!(
            err.provider_error(),
            Some(ProviderError::NotFound { .. })
        ));
        assert!(api.mutations().await.is_empty());
    }
}
