//! 类型定义模块

mod domain;
mod proxy;
mod service;

pub use domain::{DesiredDomain, DomainSyncReport};
pub use proxy::{
    ProxyChange, ReverseProxyConfig, DEFAULT_PROXY_TTL, MAX_PROXY_TTL, MIN_PROXY_TTL,
};
pub use service::{
    normalize_unique_name, NewService, ServiceSpec, ServiceState, UNIQUE_NAME_MAX_LEN,
    UNIQUE_NAME_MIN_LEN,
};

// Re-export provider 库的公共类型
pub use cdn_orchestrator_provider::{
    Account, Domain, DomainQueryParams, ErrorTtl, ListResponse, Origin, OriginQueryParams,
    OriginScheme, ProxyMode, ResponseType, Service, ServiceOptions, ServiceQueryParams,
    ServiceStatus, UpdateServiceRequest, ValidationMode,
};
