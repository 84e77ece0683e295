//! Common types and utilities for the Mode API

use serde::de::DeserializeOwned;
use serde::Deserialize;

/// `state` value the API reports for resources that were deleted but not purged
pub const SOFT_DELETED: &str = "soft_deleted";

/// HAL collection envelope: `{"_embedded": {"<key>": [...]}}`
#[derive(Debug, Default, Deserialize)]
pub struct Embedded {
    #[serde(rename = "_embedded", default)]
    embedded: serde_json::Map<String, serde_json::Value>,
}

impl Embedded {
    /// Take the list stored under `key`. A missing key is an empty list.
    pub fn take<T: DeserializeOwned>(mut self, key: &str) -> Result<Vec<T>, serde_json::Error> {
        match self.embedded.remove(key) {
            Some(value) => serde_json::from_value(value),
            None => Ok(Vec::new()),
        }
    }
}

/// Body shape used to inspect a resource's lifecycle state
#[derive(Debug, Default, Deserialize)]
pub struct ResourceState {
    #[serde(default)]
    pub state: Option<String>,
}

impl ResourceState {
    pub fn is_soft_deleted(&self) -> bool {
        self.state.as_deref() == Some(SOFT_DELETED)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApiQueryParams {
    params: Vec<(String, String)>,
}

impl ApiQueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<K: Into<String>, V: ToString>(mut self, key: K, value: V) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    pub fn add_optional<K: Into<String>, V: ToString>(mut self, key: K, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.params.push((key.into(), v.to_string()));
        }
        self
    }

    pub fn to_query_string(&self) -> String {
        if self.params.is_empty() {
            String::new()
        } else {
            format!(
                "?{}",
                self.params
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
                    .collect::<Vec<_>>()
                    .join("&")
            )
        }
    }
}

/// Ids come back as strings on single reads and as numbers in listings.
pub mod string_or_number {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum StringOrNumber {
            String(String),
            Number(serde_json::Number),
        }

        Ok(
            Option::<StringOrNumber>::deserialize(deserializer)?.map(|value| match value {
                StringOrNumber::String(s) => s,
                StringOrNumber::Number(n) => n.to_string(),
            }),
        )
    }
}
