//! Desired-domain type definitions

use serde::{Deserialize, Serialize};

use cdn_orchestrator_provider::{Domain, DomainRequest, ValidationMode};

/// A domain the operator wants attached to a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesiredDomain {
    /// Fully qualified domain name
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub validation_mode: ValidationMode,
}

impl DesiredDomain {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            validation_mode: ValidationMode::None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_validation_mode(mut self, validation_mode: ValidationMode) -> Self {
        self.validation_mode = validation_mode;
        self
    }

    /// Whether the remote record differs in a field this type manages.
    pub fn differs_from(&self, remote: &Domain) -> bool {
        self.description != remote.description || self.validation_mode != remote.validation_mode
    }

    pub fn to_request(&self) -> DomainRequest {
        DomainRequest {
            name: self.name.clone(),
            description: self.description.clone(),
            validation_mode: self.validation_mode,
        }
    }
}

/// Outcome of one domain reconciliation, by domain name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainSyncReport {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub deleted: Vec<String>,
    pub unchanged: Vec<String>,
}

impl DomainSyncReport {
    /// Number of remote writes issued.
    pub fn mutation_count(&self) -> usize {
        self.created.len() + self.updated.len() + self.deleted.len()
    }

    pub fn is_noop(&self) -> bool {
        self.mutation_count() == 0
    }
}
