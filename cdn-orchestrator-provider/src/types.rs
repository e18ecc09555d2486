use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ============ Listing ============

/// Suffix of the system-provisioned domains every service receives.
pub const DEFAULT_DOMAIN_SUFFIX: &str = ".cachefly.net";

/// Whether `name` is a system-managed default domain (case-insensitive suffix match).
pub fn is_default_domain(name: &str) -> bool {
    let suffix = DEFAULT_DOMAIN_SUFFIX.as_bytes();
    let name = name.as_bytes();
    name.len() >= suffix.len() && name[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

/// Amount of detail the API includes in list answers.
///
/// Serialized lowercase (`"ids"`, `"shallow"`, `"selected"`, `"full"`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    Ids,
    #[default]
    Shallow,
    Selected,
    Full,
}

impl ResponseType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ids => "ids",
            Self::Shallow => "shallow",
            Self::Selected => "selected",
            Self::Full => "full",
        }
    }
}

/// Paging metadata of a list answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListMeta {
    pub limit: u32,
    pub offset: u32,
    /// Total number of matching items on the server.
    pub count: u32,
}

/// Envelope of every list endpoint: `{"meta": {...}, "data": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default)]
    pub meta: ListMeta,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>, meta: ListMeta) -> Self {
        Self { meta, data }
    }
}

/// Query parameters for `GET /services`.
///
/// # Default
///
/// `responseType=shallow, limit=10, offset=0`, no status filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceQueryParams {
    pub response_type: ResponseType,
    pub status: Option<ServiceStatus>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for ServiceQueryParams {
    fn default() -> Self {
        Self {
            response_type: ResponseType::Shallow,
            status: None,
            limit: 10,
            offset: 0,
        }
    }
}

impl ServiceQueryParams {
    /// Query-string pairs in wire order, values not yet encoded.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("responseType", self.response_type.as_str().to_string())];
        if let Some(status) = &self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        pairs.push(("limit", self.limit.to_string()));
        pairs.push(("offset", self.offset.to_string()));
        pairs
    }
}

/// Query parameters for `GET /services/{id}/domains`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainQueryParams {
    /// Substring filter on the domain name.
    pub search: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub response_type: ResponseType,
}

impl DomainQueryParams {
    pub fn page(limit: u32, offset: u32) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
            ..Self::default()
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = self.search.as_deref()
            && !search.is_empty()
        {
            pairs.push(("search", search.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        pairs.push(("responseType", self.response_type.as_str().to_string()));
        pairs
    }
}

/// Query parameters for `GET /origins`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OriginQueryParams {
    /// Origin type filter (e.g. `WEB`).
    pub origin_type: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub response_type: Option<ResponseType>,
}

impl OriginQueryParams {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(origin_type) = self.origin_type.as_deref()
            && !origin_type.is_empty()
        {
            pairs.push(("type", origin_type.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        if let Some(response_type) = self.response_type {
            pairs.push(("responseType", response_type.as_str().to_string()));
        }
        pairs
    }
}

// ============ Service Types ============

/// Lifecycle status of a service.
///
/// Only `ACTIVE` and `DEACTIVATED` drive transitions; any other value the API
/// reports is kept verbatim in [`Other`](Self::Other).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceStatus {
    Active,
    Deactivated,
    Other(String),
}

impl Default for ServiceStatus {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl ServiceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "ACTIVE",
            Self::Deactivated => "DEACTIVATED",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_deactivated(&self) -> bool {
        matches!(self, Self::Deactivated)
    }
}

impl From<&str> for ServiceStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "ACTIVE" => Self::Active,
            "DEACTIVATED" => Self::Deactivated,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ServiceStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ServiceStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw.as_str()))
    }
}

/// A CDN service as reported by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Immutable, globally unique identifier chosen at creation.
    #[serde(default)]
    pub unique_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub auto_ssl: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration_mode: Option<String>,
    #[serde(default)]
    pub status: ServiceStatus,
    #[serde(
        default,
        with = "crate::utils::datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        rename = "updateAt",
        alias = "updatedAt",
        with = "crate::utils::datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of `POST /services`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequest {
    pub name: String,
    pub unique_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// Body of `PUT /services/{id}`; only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateServiceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl UpdateServiceRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

// ============ Domain Types ============

/// How ownership of a domain is validated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationMode {
    #[default]
    None,
    Manual,
    Http,
    Dns,
}

impl ValidationMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Manual => "MANUAL",
            Self::Http => "HTTP",
            Self::Dns => "DNS",
        }
    }
}

/// A domain attached to a service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Owning service id.
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub validation_mode: ValidationMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_status: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub certificates: Vec<String>,
    #[serde(
        default,
        with = "crate::utils::datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        rename = "updateAt",
        alias = "updatedAt",
        with = "crate::utils::datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of domain create (`POST`) and update (`PUT`) calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainRequest {
    pub name: String,
    pub description: String,
    pub validation_mode: ValidationMode,
}

// ============ Options Types ============

/// Where a reverse proxy fetches content from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProxyMode {
    #[default]
    Web,
    ObjectStorage,
}

/// Scheme used towards the origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OriginScheme {
    Http,
    #[default]
    Https,
    Follow,
}

/// Reverse-proxy section of the options document as the API reports it.
///
/// Missing fields fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReverseProxy {
    pub enabled: bool,
    pub hostname: String,
    pub mode: ProxyMode,
    pub origin_scheme: OriginScheme,
    pub cache_by_query_param: bool,
    pub ttl: u32,
    pub use_robots_txt: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prepend: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
}

/// TTL applied to cached error responses.
///
/// `value: None` means the API holds no value, which is distinct from zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorTtl {
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u32>,
}

/// The merged options document of a service (`/api/2.6/services/{id}/options`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOptions {
    #[serde(rename = "reverseProxy", default)]
    pub reverse_proxy: ReverseProxy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_ttl: Option<ErrorTtl>,
    #[serde(rename = "edgetoorigin", default)]
    pub hostname_pass_through: bool,
}

/// Reverse-proxy part of an options write; unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseProxyUpdate {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<ProxyMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_by_query_param: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_scheme: Option<OriginScheme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_robots_txt: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prepend: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
}

impl ReverseProxyUpdate {
    /// The minimal write that switches the proxy off.
    pub fn disabled() -> Self {
        Self::default()
    }
}

/// Body of `PUT /api/2.6/services/{id}/options`.
///
/// Absent sections are omitted, so a write only touches what it sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionsUpdate {
    #[serde(rename = "reverseProxy", skip_serializing_if = "Option::is_none")]
    pub reverse_proxy: Option<ReverseProxyUpdate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_ttl: Option<ErrorTtl>,
    #[serde(rename = "edgetoorigin", skip_serializing_if = "Option::is_none")]
    pub hostname_pass_through: Option<bool>,
}

impl OptionsUpdate {
    pub fn reverse_proxy(update: ReverseProxyUpdate) -> Self {
        Self {
            reverse_proxy: Some(update),
            ..Self::default()
        }
    }

    pub fn error_ttl(error_ttl: ErrorTtl) -> Self {
        Self {
            error_ttl: Some(error_ttl),
            ..Self::default()
        }
    }

    pub fn pass_through(enabled: bool) -> Self {
        Self {
            hostname_pass_through: Some(enabled),
            ..Self::default()
        }
    }
}

// ============ Account Types ============

/// An origin definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// The account owning the token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub website: String,
}
