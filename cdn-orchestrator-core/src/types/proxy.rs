//! Reverse-proxy configuration types

use serde::{Deserialize, Serialize};

use cdn_orchestrator_provider::{OriginScheme, ProxyMode, ReverseProxy, ReverseProxyUpdate};

use crate::error::{CoreError, CoreResult};

/// Smallest accepted proxy cache TTL (seconds).
pub const MIN_PROXY_TTL: u32 = 1;
/// Largest accepted proxy cache TTL (90 days).
pub const MAX_PROXY_TTL: u32 = 7_776_000;
/// Proxy cache TTL used when none is declared (30 days).
pub const DEFAULT_PROXY_TTL: u32 = 2_592_000;

/// Declared reverse-proxy policy of a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReverseProxyConfig {
    /// Turned on implicitly whenever `hostname` is non-empty
    pub enabled: bool,
    pub hostname: String,
    pub mode: ProxyMode,
    pub origin_scheme: OriginScheme,
    pub cache_by_query_param: bool,
    pub ttl: u32,
    pub use_robots_txt: bool,
    /// Path prefix; only used in [`ProxyMode::Web`]
    pub prepend: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub region: Option<String>,
    pub bucket: Option<String>,
}

impl Default for ReverseProxyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            hostname: String::new(),
            mode: ProxyMode::Web,
            origin_scheme: OriginScheme::Https,
            cache_by_query_param: false,
            ttl: DEFAULT_PROXY_TTL,
            use_robots_txt: false,
            prepend: None,
            access_key: None,
            secret_key: None,
            region: None,
            bucket: None,
        }
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}

impl ReverseProxyConfig {
    /// A WEB proxy towards `hostname`.
    pub fn web(hostname: impl Into<String>) -> Self {
        Self {
            enabled: true,
            hostname: hostname.into(),
            ..Self::default()
        }
    }

    /// An OBJECT_STORAGE proxy with the given credentials.
    pub fn object_storage(
        hostname: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            enabled: true,
            hostname: hostname.into(),
            mode: ProxyMode::ObjectStorage,
            access_key: Some(access_key.into()),
            secret_key: Some(secret_key.into()),
            region: Some(region.into()),
            ..Self::default()
        }
    }

    /// Enabled flag after the hostname rule.
    pub fn is_effectively_enabled(&self) -> bool {
        self.enabled || !self.hostname.is_empty()
    }

    /// Local checks that must pass before any remote call.
    pub fn validate(&self) -> CoreResult<()> {
        if self.mode == ProxyMode::ObjectStorage {
            let missing: Vec<&str> = [
                ("access_key", &self.access_key),
                ("secret_key", &self.secret_key),
                ("region", &self.region),
            ]
            .into_iter()
            .filter(|(_, value)| value.as_deref().is_none_or(str::is_empty))
            .map(|(name, _)| name)
            .collect();
            if !missing.is_empty() {
                return Err(CoreError::ValidationError(format!(
                    "OBJECT_STORAGE mode requires {}",
                    missing.join(", ")
                )));
            }
        }
        if !(MIN_PROXY_TTL..=MAX_PROXY_TTL).contains(&self.ttl) {
            return Err(CoreError::ValidationError(format!(
                "reverse proxy ttl must be between {MIN_PROXY_TTL} and {MAX_PROXY_TTL}, got {}",
                self.ttl
            )));
        }
        Ok(())
    }

    /// The full options write for an enabled proxy.
    ///
    /// `prepend` is sent only in WEB mode, credentials only in OBJECT_STORAGE
    /// mode, and empty optional strings are never sent.
    pub fn to_update(&self) -> ReverseProxyUpdate {
        let mut update = ReverseProxyUpdate {
            enabled: true,
            hostname: Some(self.hostname.clone()),
            mode: Some(self.mode),
            ttl: Some(self.ttl),
            cache_by_query_param: Some(self.cache_by_query_param),
            origin_scheme: Some(self.origin_scheme),
            use_robots_txt: Some(self.use_robots_txt),
            ..ReverseProxyUpdate::default()
        };
        match self.mode {
            ProxyMode::Web => {
                update.prepend = non_empty(self.prepend.as_ref());
            }
            ProxyMode::ObjectStorage => {
                update.access_key = self.access_key.clone();
                update.secret_key = self.secret_key.clone();
                update.region = self.region.clone();
                update.bucket = non_empty(self.bucket.as_ref());
            }
        }
        update
    }

    /// Declared view of what the API reports.
    pub fn from_remote(remote: &ReverseProxy) -> Self {
        Self {
            enabled: remote.enabled,
            hostname: remote.hostname.clone(),
            mode: remote.mode,
            origin_scheme: remote.origin_scheme,
            cache_by_query_param: remote.cache_by_query_param,
            ttl: remote.ttl,
            use_robots_txt: remote.use_robots_txt,
            prepend: non_empty(remote.prepend.as_ref()),
            access_key: non_empty(remote.access_key.as_ref()),
            secret_key: non_empty(remote.secret_key.as_ref()),
            region: non_empty(remote.region.as_ref()),
            bucket: non_empty(remote.bucket.as_ref()),
        }
    }
}

/// What `configure_reverse_proxy` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProxyChange {
    /// Both current and desired were disabled; nothing was written
    Unchanged,
    /// The minimal disable write was sent
    Disabled,
    /// The full configuration was written
    Applied,
}
