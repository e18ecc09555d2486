//! # cdn-orchestrator-provider
//!
//! A typed client for the [CacheFly](https://www.cachefly.com/) CDN API with a
//! resilient, retrying HTTP transport.
//!
//! ## Feature Flags
//!
//! ### TLS Backend
//!
//! - **`native-tls`** *(default)*: use the platform's native TLS implementation.
//! - **`rustls`**: use rustls. Recommended for cross-compilation.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! cdn-orchestrator-provider = { version = "0.1", default-features = false, features = ["rustls"] }
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cdn_orchestrator_provider::{create_client, ClientConfig, ServiceQueryParams};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Build a client (token from CACHEFLY_TOKEN, optional CACHEFLY_API_URL)
//!     let api = create_client(ClientConfig::from_env()?)?;
//!
//!     // 2. Who am I?
//!     let account = api.get_account().await?;
//!     println!("account: {}", account.company_name);
//!
//!     // 3. List services
//!     let services = api.list_services(&ServiceQueryParams::default()).await?;
//!     for service in &services.data {
//!         println!("{} ({})", service.unique_name, service.status);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Retries
//!
//! Every call is sent through [`Transport`], which makes up to five attempts.
//! Connection failures, timeouts and HTTP 5xx answers are retried after
//! `1s · 2^n` plus up to 100ms of jitter. Client errors (4xx) are never
//! retried. Once the attempts run out the call fails with
//! [`ProviderError::RetriesExhausted`] carrying the last cause.
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](ProviderError):
//!
//! - [`ProviderError::InvalidCredentials`]: the token was rejected (401)
//! - [`ProviderError::NotFound`]: the addressed resource does not exist (404)
//! - [`ProviderError::RateLimited`]: too many requests (429, not retried)
//! - [`ProviderError::ParseError`]: the answer could not be decoded

mod config;
mod error;
mod factory;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export configuration
pub use config::{ClientConfig, DEFAULT_API_URL, ENV_API_URL, ENV_TOKEN, RetryPolicy};

// Re-export factory functions
pub use factory::{create_client, create_client_from_env};

// Re-export transport seams
pub use http_client::{
    ApiRequest, FixedJitter, HttpBackend, JitterSource, RawResponse, ReqwestBackend,
    ThreadRngJitter, Transport,
};

pub use traits::{CdnApi, FULL_LISTING_PAGE_SIZE};

// Re-export types
pub use types::{
    Account, CreateServiceRequest, DEFAULT_DOMAIN_SUFFIX, Domain, DomainQueryParams,
    DomainRequest, ErrorTtl, ListMeta, ListResponse, OptionsUpdate, Origin, OriginQueryParams,
    OriginScheme, ProxyMode, ResponseType, ReverseProxy, ReverseProxyUpdate, Service,
    ServiceOptions, ServiceQueryParams, ServiceStatus, UpdateServiceRequest, ValidationMode,
    is_default_domain,
};

// Re-export utils module
pub use utils::datetime;

pub use providers::CacheflyProvider;
