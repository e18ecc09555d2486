//! CacheFly HTTP 请求方法

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ProviderError, Result};
use crate::http_client::{ApiRequest, LOG_TARGET, RawResponse, parse_json};
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::utils::log_sanitizer::redact_body;

use super::CacheflyProvider;

impl CacheflyProvider {
    /// Builds `{api_url}/api/{version}/{segments...}?{query}`.
    ///
    /// Every path segment and query value is percent-encoded.
    pub(crate) fn endpoint(
        &self,
        version: &str,
        segments: &[&str],
        query: &[(&'static str, String)],
    ) -> String {
        let mut url = format!("{}/api/{version}", self.config.api_url);
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        for (i, (key, value)) in query.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    /// Attaches auth and content-type headers and the serialized body.
    pub(crate) fn build_request<B: Serialize>(
        &self,
        method: Method,
        url: String,
        body: Option<&B>,
    ) -> Result<ApiRequest> {
        let mut request = ApiRequest::new(method, url)
            .header("Authorization", format!("Bearer {}", self.config.token))
            .header("Content-Type", "application/json");
        if let Some(body) = body {
            let value =
                serde_json::to_value(body).map_err(|e| ProviderError::SerializationError {
                    detail: e.to_string(),
                })?;
            log::debug!("[{LOG_TARGET}] Request Body: {}", redact_body(&value));
            request = request.json_body(value);
        }
        Ok(request)
    }

    /// Converts a non-2xx answer into a [`ProviderError`].
    fn handle_response_error(&self, response: &RawResponse, ctx: ErrorContext) -> Result<()> {
        if response.is_success() {
            return Ok(());
        }
        let message = Self::error_message(&response.body);
        let err = self.map_error(RawApiError::new(response.status, message), ctx);
        let provider = self.provider_name();
        if err.is_expected() {
            log::warn!("[{provider}] API error: {err}");
        } else {
            log::error!("[{provider}] API error: {err}");
        }
        Err(err)
    }

    async fn execute(&self, request: &ApiRequest, ctx: ErrorContext) -> Result<RawResponse> {
        let response = self.transport.send(request).await?;
        self.handle_response_error(&response, ctx)?;
        Ok(response)
    }

    /// 执行 GET 请求并解码 JSON
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: String, ctx: ErrorContext) -> Result<T> {
        let request = self.build_request::<()>(Method::GET, url, None)?;
        let response = self.execute(&request, ctx).await?;
        parse_json(&response.body)
    }

    /// GET where HTTP 404 means "absent" rather than an error.
    pub(crate) async fn get_optional<T: DeserializeOwned>(
        &self,
        url: String,
        ctx: ErrorContext,
    ) -> Result<Option<T>> {
        let request = self.build_request::<()>(Method::GET, url, None)?;
        let response = self.transport.send(&request).await?;
        if response.status == 404 {
            log::debug!("[{LOG_TARGET}] {} answered 404, treating as absent", request.url);
            return Ok(None);
        }
        self.handle_response_error(&response, ctx)?;
        parse_json(&response.body).map(Some)
    }

    /// 执行带 body 的请求并解码 JSON 响应
    pub(crate) async fn request_json<T, B>(
        &self,
        method: Method,
        url: String,
        body: &B,
        ctx: ErrorContext,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let request = self.build_request(method, url, Some(body))?;
        let response = self.execute(&request, ctx).await?;
        parse_json(&response.body)
    }

    /// Sends a request whose answer body is not needed; any 2xx counts as success.
    pub(crate) async fn request_no_content<B: Serialize>(
        &self,
        method: Method,
        url: String,
        body: Option<&B>,
        ctx: ErrorContext,
    ) -> Result<()> {
        let request = self.build_request(method, url, body)?;
        self.execute(&request, ctx).await.map(|_| ())
    }
}
