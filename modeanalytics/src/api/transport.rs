//! Authenticating transport for the Mode API
//!
//! Every outgoing request carries HTTP Basic credentials built from the API
//! token/secret pair, plus the fixed `Content-Type` and `Accept` headers the
//! API expects.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use std::time::Duration;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const ACCEPT_HAL_JSON: &str = "application/hal+json";

#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub max_idle_connections: usize,
    pub idle_timeout: Duration,
    pub connection_timeout: Duration,
    pub request_timeout: Duration,
    pub tcp_keepalive: Option<Duration>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_idle_connections: 10,
            idle_timeout: Duration::from_secs(90),
            connection_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            tcp_keepalive: Some(Duration::from_secs(30)),
        }
    }
}

#[derive(Clone)]
pub struct Credentials {
    api_token: String,
    api_secret: String,
}

impl Credentials {
    pub fn new(api_token: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            api_secret: api_secret.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_token", &self.api_token)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Shared `reqwest` client plus the credentials injected into each request
#[derive(Clone)]
pub struct AuthTransport {
    http_client: reqwest::Client,
    credentials: Credentials,
}

impl AuthTransport {
    pub fn new(credentials: Credentials, config: &TransportConfig) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HAL_JSON));

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .connect_timeout(config.connection_timeout)
            .pool_idle_timeout(config.idle_timeout)
            .pool_max_idle_per_host(config.max_idle_connections);

        if let Some(keepalive) = config.tcp_keepalive {
            builder = builder.tcp_keepalive(keepalive);
        }

        Ok(Self {
            http_client: builder.build()?,
            credentials,
        })
    }

    /// Start a request with authentication applied
    pub fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.http_client.request(method, url).basic_auth(
            &self.credentials.api_token,
            Some(&self.credentials.api_secret),
        )
    }
}
