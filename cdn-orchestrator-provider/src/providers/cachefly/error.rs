//! CacheFly error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::utils::log_sanitizer::truncate_for_log;

use super::CacheflyProvider;
use super::types::CacheflyErrorBody;

impl CacheflyProvider {
    /// Extracts a readable message from an error body.
    ///
    /// Prefers `message`, then `error`, then the raw body (truncated).
    pub(crate) fn error_message(body: &str) -> String {
        serde_json::from_str::<CacheflyErrorBody>(body)
            .ok()
            .and_then(CacheflyErrorBody::into_message)
            .unwrap_or_else(|| truncate_for_log(body.trim()))
    }
}

/// CacheFly signals failures through the HTTP status only.
impl ProviderErrorMapper for CacheflyProvider {
    fn provider_name(&self) -> &'static str {
        "cachefly"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        let raw_message = (!raw.message.is_empty()).then(|| raw.message.clone());
        let resource = || {
            context
                .resource
                .clone()
                .unwrap_or_else(|| "<unknown>".to_string())
        };

        match raw.status {
            400 | 422 => ProviderError::InvalidParameter {
                param: "request".to_string(),
                detail: raw.message,
            },
            401 => ProviderError::InvalidCredentials { raw_message },
            403 => ProviderError::PermissionDenied { raw_message },
            404 => ProviderError::NotFound {
                resource: resource(),
                raw_message,
            },
            409 => ProviderError::Conflict {
                resource: resource(),
                raw_message,
            },
            429 => ProviderError::RateLimited {
                retry_after: None,
                raw_message,
            },
            _ => self.unknown_error(raw),
        }
    }
}
