//! CacheFly API 类型定义

use serde::Deserialize;

/// Error body of a non-2xx answer.
///
/// The API is not consistent about which field carries the text.
#[derive(Debug, Default, Deserialize)]
pub struct CacheflyErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl CacheflyErrorBody {
    /// The first non-empty message field.
    pub fn into_message(self) -> Option<String> {
        self.message
            .filter(|m| !m.trim().is_empty())
            .or(self.error.filter(|m| !m.trim().is_empty()))
    }
}
