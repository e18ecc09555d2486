//! Service related type definitions

use serde::{Deserialize, Serialize};

use cdn_orchestrator_provider::{CreateServiceRequest, ErrorTtl, Service};

use super::domain::DesiredDomain;
use super::proxy::ReverseProxyConfig;
use crate::error::{CoreError, CoreResult};

/// Minimum length of a service unique name
pub const UNIQUE_NAME_MIN_LEN: usize = 3;
/// Maximum length of a service unique name
pub const UNIQUE_NAME_MAX_LEN: usize = 32;

/// Normalizes (lowercases) and validates a unique name.
///
/// Valid names are 3 to 32 characters of lowercase ASCII letters and digits.
pub fn normalize_unique_name(unique_name: &str) -> CoreResult<String> {
    let normalized = unique_name.trim().to_ascii_lowercase();
    let len = normalized.chars().count();
    if !(UNIQUE_NAME_MIN_LEN..=UNIQUE_NAME_MAX_LEN).contains(&len) {
        return Err(CoreError::ValidationError(format!(
            "unique_name must be {UNIQUE_NAME_MIN_LEN}-{UNIQUE_NAME_MAX_LEN} characters, got {len}"
        )));
    }
    if !normalized
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    {
        return Err(CoreError::ValidationError(format!(
            "unique_name '{unique_name}' may only contain lowercase letters and digits"
        )));
    }
    Ok(normalized)
}

/// Parameters for creating (or reactivating) a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewService {
    pub name: String,
    pub unique_name: String,
    #[serde(default)]
    pub description: String,
}

impl NewService {
    pub fn to_request(&self, unique_name: String) -> CreateServiceRequest {
        CreateServiceRequest {
            name: self.name.clone(),
            unique_name,
            description: self.description.clone(),
        }
    }
}

/// Declared state of a whole service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSpec {
    pub name: String,
    pub unique_name: String,
    #[serde(default)]
    pub description: String,
    /// `None` keeps the proxy disabled
    #[serde(default)]
    pub reverse_proxy: Option<ReverseProxyConfig>,
    #[serde(default)]
    pub error_ttl: Option<ErrorTtl>,
    #[serde(default)]
    pub hostname_pass_through: bool,
    /// `None` leaves domains unmanaged
    #[serde(default)]
    pub domains: Option<Vec<DesiredDomain>>,
}

impl ServiceSpec {
    pub fn new_service(&self) -> NewService {
        NewService {
            name: self.name.clone(),
            unique_name: self.unique_name.clone(),
            description: self.description.clone(),
        }
    }
}

/// Remote state of a service as read back after an operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceState {
    pub service: Service,
    /// Present only while the proxy is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse_proxy: Option<ReverseProxyConfig>,
    /// Present only when the API holds a value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_ttl: Option<ErrorTtl>,
    pub hostname_pass_through: bool,
}
