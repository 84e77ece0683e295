//! Provider configuration
//!
//! Every attribute may be set in the provider block or through its
//! `MODE_ANALYTICS_*` environment variable. Explicit values win; empty strings
//! count as unset.

use serde::Deserialize;
use thiserror::Error;

pub const ENV_HOST: &str = "MODE_ANALYTICS_HOST";
pub const ENV_API_TOKEN: &str = "MODE_ANALYTICS_API_TOKEN";
pub const ENV_API_SECRET: &str = "MODE_ANALYTICS_API_SECRET";
pub const ENV_WORKSPACE_ID: &str = "MODE_ANALYTICS_WORKSPACE_ID";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error(
        "Missing provider configuration: {} (set in provider config or via MODE_ANALYTICS_* env vars)",
        attributes.join(", ")
    )]
    Missing { attributes: Vec<&'static str> },

    #[error("Invalid mode_host {host:?}: {reason}")]
    InvalidHost { host: String, reason: String },
}

/// Provider block as written by the user
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub mode_host: Option<String>,
    pub api_token: Option<String>,
    pub api_secret: Option<String>,
    pub workspace_id: Option<String>,
}

/// Fully resolved configuration the API client is built from
#[derive(Clone, PartialEq)]
pub struct ResolvedConfig {
    pub host: String,
    pub api_token: String,
    pub api_secret: String,
    pub workspace_id: String,
}

impl std::fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("host", &self.host)
            .field("api_token", &self.api_token)
            .field("api_secret", &"<redacted>")
            .field("workspace_id", &self.workspace_id)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ProviderConfig {
    /// Resolve against the process environment
    pub fn resolve(&self) -> Result<ResolvedConfig, ConfigError> {
        self.resolve_with(|key| std::env::var(key).ok())
    }

    /// Resolve using `lookup` for environment fallbacks
    pub fn resolve_with<F>(&self, lookup: F) -> Result<ResolvedConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |explicit: &Option<String>, env_key: &str| {
            non_empty(explicit.clone()).or_else(|| non_empty(lookup(env_key)))
        };

        let host = pick(&self.mode_host, ENV_HOST);
        let api_token = pick(&self.api_token, ENV_API_TOKEN);
        let api_secret = pick(&self.api_secret, ENV_API_SECRET);
        let workspace_id = pick(&self.workspace_id, ENV_WORKSPACE_ID);

        match (host, api_token, api_secret, workspace_id) {
            (Some(host), Some(api_token), Some(api_secret), Some(workspace_id)) => {
                Ok(ResolvedConfig {
                    host: validate_host(&host)?,
                    api_token,
                    api_secret,
                    workspace_id,
                })
            }
            (host, api_token, api_secret, workspace_id) => {
                let attributes = [
                    ("mode_host", host.is_none()),
                    ("api_token", api_token.is_none()),
                    ("api_secret", api_secret.is_none()),
                    ("workspace_id", workspace_id.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, missing)| missing.then_some(name))
                .collect();

                Err(ConfigError::Missing { attributes })
            }
        }
    }
}

/// Require an absolute http(s) URL; returns it without a trailing slash
fn validate_host(host: &str) -> Result<String, ConfigError> {
    let parsed = url::Url::parse(host).map_err(|e| ConfigError::InvalidHost {
        host: host.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidHost {
            host: host.to_string(),
            reason: format!("unsupported scheme {}", parsed.scheme()),
        });
    }

    Ok(host.trim_end_matches('/').to_string())
}
