use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};

use crate::api::transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::types::ApiResponse;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Typed JSON client for the video backend.
#[derive(Debug, Clone)]
pub struct ApiClient<T = ReqwestTransport> {
    config: ClientConfig,
    transport: T,
}

impl ApiClient<ReqwestTransport> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, ReqwestTransport::new())
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Perform a request against `endpoint` and decode the response into `R`.
    ///
    /// Failures are logged here and handed back unchanged.
    pub async fn call<R, B>(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&B>,
        headers: &[(&str, &str)],
    ) -> Result<ApiResponse<R>, ApiError>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let result = self.execute(endpoint, method, body, headers).await;
        if let Err(e) = &result {
            error!("API call failed: {} {}: {}", method.as_str(), endpoint, e);
        }
        result
    }

    async fn execute<R, B>(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&B>,
        headers: &[(&str, &str)],
    ) -> Result<ApiResponse<R>, ApiError>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = build_request(&self.config, endpoint, method, body, headers)?;
        debug!("{} {}", request.method.as_str(), request.url);
        let response = self.transport.send(request).await?;
        decode_response(response)
    }

    pub async fn get<R: DeserializeOwned>(&self, endpoint: &str) -> Result<ApiResponse<R>, ApiError> {
        self.call::<R, ()>(endpoint, Method::Get, None, &[]).await
    }

    pub async fn post<R, B>(&self, endpoint: &str, body: &B) -> Result<ApiResponse<R>, ApiError>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.call(endpoint, Method::Post, Some(body), &[]).await
    }

    pub async fn put<R, B>(&self, endpoint: &str, body: &B) -> Result<ApiResponse<R>, ApiError>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.call(endpoint, Method::Put, Some(body), &[]).await
    }

    pub async fn delete<R: DeserializeOwned>(&self, endpoint: &str) -> Result<ApiResponse<R>, ApiError> {
        self.call::<R, ()>(endpoint, Method::Delete, None, &[]).await
    }
}

/// Resolve the URL, merge headers over the JSON default and serialize the body.
pub fn build_request<B: Serialize + ?Sized>(
    config: &ClientConfig,
    endpoint: &str,
    method: Method,
    body: Option<&B>,
    headers: &[(&str, &str)],
) -> Result<HttpRequest, ApiError> {
    let mut merged = vec![("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string())];
    for (name, value) in headers {
        match merged.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
            Some(existing) => existing.1 = value.to_string(),
            None => merged.push((name.to_string(), value.to_string())),
        }
    }

    let body = match body {
        Some(b) => Some(serde_json::to_string(b)?),
        None => None,
    };

    Ok(HttpRequest {
        method,
        url: config.resolve(endpoint),
        headers: merged,
        body,
    })
}

/// Check the status, then decode by content type.
///
/// JSON bodies are parsed; plain text and anything else is handed to `R` as a
/// JSON string, which succeeds for `R = String`.
pub fn decode_response<R: DeserializeOwned>(response: HttpResponse) -> Result<ApiResponse<R>, ApiError> {
    let HttpResponse {
        status,
        content_type,
        body,
    } = response;

    if !(200..300).contains(&status) {
        return Err(ApiError::Http {
            status,
            message: body,
        });
    }

    let is_json = content_type
        .as_deref()
        .map(|ct| ct.contains(JSON_CONTENT_TYPE))
        .unwrap_or(false);

    let data = if is_json {
        serde_json::from_str(&body)?
    } else {
        serde_json::from_value(serde_json::Value::String(body))?
    };

    Ok(ApiResponse { data, status })
}
