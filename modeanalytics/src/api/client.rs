use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use super::common::Embedded;
use super::deletion::DeletionConfig;
use super::error::ApiError;
use super::transport::{AuthTransport, Credentials, TransportConfig};
use crate::framework::Context;

/// Mode API client
///
/// Built once when the provider is configured and shared by every handler.
/// Cloning is cheap; the inner state is immutable.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    transport: AuthTransport,
    base_url: String,
    workspace_id: String,
    retry_config: RetryConfig,
    deletion_config: DeletionConfig,
}

/// Rate-limit retry policy: fixed backoff, bounded attempts, 429 only
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 9,
            backoff: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub retry: RetryConfig,
    pub deletion: DeletionConfig,
    pub transport: TransportConfig,
}

/// A single HTTP call: method, absolute URL and optional JSON body
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    url: String,
    body: Option<Vec<u8>>,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_vec(body).map_err(ApiError::Encode)?);
        Ok(self)
    }
}

impl Client {
    /// Create a new API client with default configuration
    pub fn new(host: &str, workspace_id: &str, credentials: Credentials) -> Result<Self, ApiError> {
        Self::with_config(host, workspace_id, credentials, ClientConfig::default())
    }

    /// Create a new API client with custom retry, deletion and transport settings
    pub fn with_config(
        host: &str,
        workspace_id: &str,
        credentials: Credentials,
        config: ClientConfig,
    ) -> Result<Self, ApiError> {
        let transport =
            AuthTransport::new(credentials, &config.transport).map_err(ApiError::ClientBuild)?;

        let base_url = format!("{}/api/{}", host.trim_end_matches('/'), workspace_id);

        Ok(Self {
            inner: Arc::new(ClientInner {
                transport,
                base_url,
                workspace_id: workspace_id.to_string(),
                retry_config: config.retry,
                deletion_config: config.deletion,
            }),
        })
    }

    /// Absolute URL for a workspace-relative path such as `/groups/abc`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url, path)
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn workspace_id(&self) -> &str {
        &self.inner.workspace_id
    }

    pub fn deletion_config(&self) -> &DeletionConfig {
        &self.inner.deletion_config
    }

    /// Send a request once, with no retry. Racing the context means a
    /// cancelled operation does not wait for a slow upstream.
    pub async fn send_once(
        &self,
        ctx: &Context,
        request: &ApiRequest,
    ) -> Result<reqwest::Response, ApiError> {
        let mut builder = self
            .inner
            .transport
            .request(request.method.clone(), &request.url);
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        tokio::select! {
            biased;
            _ = ctx.cancelled() => Err(ApiError::Cancelled { url: request.url.clone() }),
            result = builder.send() => result.map_err(|source| ApiError::Transport {
                url: request.url.clone(),
                source,
            }),
        }
    }

    /// Execute a request, retrying while the API answers 429.
    ///
    /// Any other status is returned as-is, success or not. If every attempt is
    /// rate limited the last 429 response is returned and the caller decides
    /// what to do with it. Transport failures are never retried.
    pub async fn execute(
        &self,
        ctx: &Context,
        request: &ApiRequest,
    ) -> Result<reqwest::Response, ApiError> {
        let retry = &self.inner.retry_config;
        let max_attempts = retry.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            tracing::debug!("{} request to: {} (attempt {})", request.method, request.url, attempt);

            let response = self.send_once(ctx, request).await?;
            let status = response.status();
            tracing::debug!("Response status: {}", status);

            if status != StatusCode::TOO_MANY_REQUESTS || attempt >= max_attempts {
                return Ok(response);
            }

            // release the connection before sleeping
            drop(response);

            tracing::warn!(
                "Rate limited on {}, retrying after {:?} (attempt {} of {})",
                request.url,
                retry.backoff,
                attempt,
                max_attempts
            );

            tokio::select! {
                biased;
                _ = ctx.cancelled() => {
                    return Err(ApiError::Cancelled { url: request.url.clone() });
                }
                _ = tokio::time::sleep(retry.backoff) => {}
            }

            attempt += 1;
        }
    }

    /// GET a resource; 404 means it does not exist
    pub async fn get_optional<T: DeserializeOwned>(
        &self,
        ctx: &Context,
        url: &str,
    ) -> Result<Option<T>, ApiError> {
        let response = self.execute(ctx, &ApiRequest::get(url)).await?;

        match response.status() {
            StatusCode::OK => decode_response(ctx, url, response).await.map(Some),
            StatusCode::NOT_FOUND => Ok(None),
            _ => Err(error_from_response(ctx, url, response).await),
        }
    }

    /// GET a resource that must exist
    pub async fn get_json<T: DeserializeOwned>(&self, ctx: &Context, url: &str) -> Result<T, ApiError> {
        let response = self.execute(ctx, &ApiRequest::get(url)).await?;

        if response.status() != StatusCode::OK {
            return Err(error_from_response(ctx, url, response).await);
        }
        decode_response(ctx, url, response).await
    }

    /// GET a HAL listing and take the items stored under `_embedded.<key>`
    pub async fn list<T: DeserializeOwned>(
        &self,
        ctx: &Context,
        url: &str,
        key: &str,
    ) -> Result<Vec<T>, ApiError> {
        let embedded: Embedded = self.get_json(ctx, url).await?;
        embedded.take(key).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }

    /// Send a JSON body and decode the JSON answer; anything but 200 fails
    pub async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        ctx: &Context,
        method: Method,
        url: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = ApiRequest::new(method, url).with_json(body)?;
        let response = self.execute(ctx, &request).await?;

        if response.status() != StatusCode::OK {
            return Err(error_from_response(ctx, url, response).await);
        }
        decode_response(ctx, url, response).await
    }

    /// DELETE a resource, then wait until the API confirms it is gone.
    ///
    /// Verification only starts once the DELETE itself returned 200.
    pub async fn delete_and_confirm(&self, ctx: &Context, url: &str) -> Result<(), ApiError> {
        let response = self.execute(ctx, &ApiRequest::delete(url)).await?;

        if response.status() != StatusCode::OK {
            return Err(error_from_response(ctx, url, response).await);
        }
        drop(response);

        self.check_deletion(ctx, url).await
    }
}

/// Read the whole body, giving up as soon as the operation is cancelled
async fn read_body(ctx: &Context, url: &str, response: reqwest::Response) -> Result<String, ApiError> {
    tokio::select! {
        biased;
        _ = ctx.cancelled() => Err(ApiError::Cancelled { url: url.to_string() }),
        result = response.text() => result.map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        }),
    }
}

/// Read the body and decode it as JSON
pub(crate) async fn decode_response<T: DeserializeOwned>(
    ctx: &Context,
    url: &str,
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let text = read_body(ctx, url, response).await?;
    tracing::debug!("API response body: {}", text);

    serde_json::from_str(&text).map_err(|source| {
        tracing::error!("Failed to deserialize response: {}, body: {}", source, text);
        ApiError::Decode {
            url: url.to_string(),
            source,
        }
    })
}

/// Turn an unexpected response into an error, consuming its body
pub(crate) async fn error_from_response(
    ctx: &Context,
    url: &str,
    response: reqwest::Response,
) -> ApiError {
    let status = response.status();

    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized {
            url: url.to_string(),
        },
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited {
            url: url.to_string(),
        },
        _ => {
            let message = match read_body(ctx, url, response).await {
                Ok(message) => message,
                Err(err @ ApiError::Cancelled { .. }) => return err,
                Err(_) => "Unknown error".to_string(),
            };
            tracing::error!("API error response from {}: {} {}", url, status, message);
            ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                message,
            }
        }
    }
}
