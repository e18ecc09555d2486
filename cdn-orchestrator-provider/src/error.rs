use serde::{Deserialize, Serialize};

/// Unified error type for all CDN API operations.
///
/// All variants are serializable for structured error reporting.
///
/// # Retryable Errors
///
/// The following variants represent transient failures that may succeed on retry:
/// - [`NetworkError`](Self::NetworkError): network connectivity issues
/// - [`Timeout`](Self::Timeout): request timed out
/// - [`ServerError`](Self::ServerError): the API answered with HTTP 5xx
///
/// The built-in transport retries these with exponential backoff and, once the
/// attempt limit is reached, reports [`RetriesExhausted`](Self::RetriesExhausted)
/// carrying the last cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    NetworkError {
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Error details.
        detail: String,
    },

    /// The API answered with an HTTP 5xx status.
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Response body (truncated).
        raw_message: String,
    },

    /// Every attempt failed with a transient error.
    RetriesExhausted {
        /// Number of attempts made.
        attempts: u32,
        /// The error reported by the final attempt.
        last_error: Box<ProviderError>,
    },

    /// The API token is invalid or expired (HTTP 401).
    InvalidCredentials {
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// The token lacks permission for the requested operation (HTTP 403).
    PermissionDenied {
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// The addressed resource does not exist (HTTP 404).
    NotFound {
        /// Human-readable resource description (e.g. `service 'abc'`).
        resource: String,
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// The request conflicts with the current remote state (HTTP 409).
    Conflict {
        /// Human-readable resource description.
        resource: String,
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// The API rate limit has been exceeded (HTTP 429).
    ///
    /// Like every other client error this is returned to the caller as-is.
    RateLimited {
        /// Suggested wait time in seconds, if provided by the API.
        retry_after: Option<u64>,
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// A request parameter was rejected (HTTP 400/422) or failed local validation.
    InvalidParameter {
        /// Name of the invalid parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// Any other non-2xx answer.
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Response body (truncated).
        raw_message: String,
    },

    /// Failed to parse the API response.
    ParseError {
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    SerializationError {
        /// Details about the serialization failure.
        detail: String,
    },

    /// The client could not be configured (missing token, bad base URL, TLS setup).
    Configuration {
        /// Details about the configuration problem.
        detail: String,
    },
}

impl ProviderError {
    /// Whether the transport should try the request again.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::ServerError { .. }
        )
    }

    /// 是否为预期行为（用户输入、资源不存在等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::PermissionDenied { .. }
                | Self::NotFound { .. }
                | Self::Conflict { .. }
                | Self::InvalidParameter { .. }
                | Self::Configuration { .. }
        )
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { detail } => write!(f, "Network error: {detail}"),
            Self::Timeout { detail } => write!(f, "Request timeout: {detail}"),
            Self::ServerError {
                status,
                raw_message,
            } => write!(f, "Server error (HTTP {status}): {raw_message}"),
            Self::RetriesExhausted {
                attempts,
                last_error,
            } => write!(f, "Request failed after {attempts} attempts: {last_error}"),
            Self::InvalidCredentials { raw_message } => {
                if let Some(msg) = raw_message {
                    write!(f, "Invalid credentials: {msg}")
                } else {
                    write!(f, "Invalid credentials")
                }
            }
            Self::PermissionDenied { raw_message } => {
                if let Some(msg) = raw_message {
                    write!(f, "Permission denied: {msg}")
                } else {
                    write!(f, "Permission denied")
                }
            }
            Self::NotFound {
                resource,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "{resource} not found: {msg}")
                } else {
                    write!(f, "{resource} not found")
                }
            }
            Self::Conflict {
                resource,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "Conflict on {resource}: {msg}")
                } else {
                    write!(f, "Conflict on {resource}")
                }
            }
            Self::RateLimited { retry_after, .. } => {
                if let Some(secs) = retry_after {
                    write!(f, "Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "Rate limited")
                }
            }
            Self::InvalidParameter { param, detail } => {
                write!(f, "Invalid parameter '{param}': {detail}")
            }
            Self::ApiError {
                status,
                raw_message,
            } => write!(f, "HTTP {status}: {raw_message}"),
            Self::ParseError { detail } => write!(f, "Parse error: {detail}"),
            Self::SerializationError { detail } => write!(f, "Serialization error: {detail}"),
            Self::Configuration { detail } => write!(f, "Configuration error: {detail}"),
        }
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::RetriesExhausted { last_error, .. } => Some(last_error.as_ref()),
            _ => None,
        }
    }
}

/// Convenience type alias for `Result<T, ProviderError>`.
pub type Result<T> = std::result::Result<T, ProviderError>;
