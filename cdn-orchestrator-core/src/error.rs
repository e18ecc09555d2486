//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use cdn_orchestrator_provider::ProviderError;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// A non-deactivated service already uses this unique name
    #[error("Service with unique_name '{0}' already exists")]
    ServiceAlreadyExists(String),

    /// Service not found
    #[error("Service not found: {0}")]
    ServiceNotFound(String),

    /// Local validation failed; no remote call was made
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A remote call failed while performing `action` on `target`
    #[error("Failed to {action} '{target}': {source}")]
    Operation {
        action: &'static str,
        target: String,
        #[source]
        source: ProviderError,
    },

    /// Provider error (converting from library)
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl CoreError {
    /// Returns a mapper that wraps a [`ProviderError`] with operation context.
    ///
    /// ```ignore
    /// api.delete_domain(sid, &id).await.map_err(CoreError::during("delete domain", &name))?;
    /// ```
    pub fn during(action: &'static str, target: &str) -> impl FnOnce(ProviderError) -> Self {
        let target = target.to_string();
        move |source| Self::Operation {
            action,
            target,
            source,
        }
    }

    /// The underlying provider error, if any.
    pub fn provider_error(&self) -> Option<&ProviderError> {
        match self {
            Self::Operation { source, .. } | Self::Provider(source) => Some(source),
            _ => None,
        }
    }

    /// Whether it is expected behavior (user input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added. **
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::ServiceAlreadyExists(_)
            | Self::ServiceNotFound(_)
            | Self::ValidationError(_) => true,
            Self::Operation { source, .. } | Self::Provider(source) => source.is_expected(),
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
