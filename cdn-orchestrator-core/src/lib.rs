//! CDN Orchestrator Core Library
//!
//! Reconciliation logic for CacheFly CDN services, including:
//! - Service lifecycle (create, reactivate, deactivate)
//! - Domain reconciliation against a declared list
//! - Reverse-proxy, error-TTL and pass-through options
//! - Whole-service create/read/update/delete/import
//!
//! The remote API is reached through the `CdnApi` trait of
//! `cdn-orchestrator-provider`, so every service can run against a mock.

pub mod error;
pub mod services;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::{
    CatalogService, CdnServiceManager, DomainSyncService, OptionsService, ServiceContext,
    ServiceLifecycleService,
};
