use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("HTTP request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Too many requests to {url}, still rate limited after retrying")]
    RateLimited { url: String },

    #[error("Authentication failed for {url}")]
    Unauthorized { url: String },

    #[error("API returned error (HTTP {status}) for {url}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },

    #[error("Failed to parse response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Deletion of {url} was not confirmed within {timeout:?}")]
    DeletionTimeout { url: String, timeout: Duration },

    #[error("Deletion verification of {url} failed: unexpected status {status}, not retrying")]
    DeletionUnconfirmed { url: String, status: u16 },

    #[error("Operation cancelled while waiting on {url}")]
    Cancelled { url: String },
}

impl ApiError {
    /// HTTP status carried by the error, if the upstream answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RateLimited { .. } => Some(429),
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Status { status, .. } | ApiError::DeletionUnconfirmed { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled { .. })
    }
}
