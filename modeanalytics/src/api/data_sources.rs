//! Data source (warehouse connection) API

use serde::Deserialize;
use std::collections::HashMap;

use super::client::Client;
use super::common::string_or_number;
use super::error::ApiError;
use crate::framework::Context;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DataSource {
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub token: String,
    pub adapter: String,
    pub created_at: String,
    pub updated_at: String,
    pub has_expensive_schema_updates: bool,
    pub public: bool,
    pub asleep: bool,
    pub queryable: bool,
    pub soft_deleted: bool,
    pub display_name: String,
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub account_id: Option<String>,
    pub account_username: String,
    pub organization_token: String,
    pub organization_plan_code: String,
    pub database: String,
    pub host: String,
    pub port: Option<f64>,
    pub ssl: bool,
    pub username: String,
    pub provider: String,
    pub vendor: String,
    pub ldap: bool,
    pub warehouse: String,
    pub bridged: bool,
    pub adapter_version: String,
    #[serde(deserialize_with = "deserialize_attributes")]
    pub custom_attributes: HashMap<String, String>,
}

/// Custom attributes arrive as arbitrary JSON values; keep them as strings.
fn deserialize_attributes<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<HashMap<String, serde_json::Value>> = Option::deserialize(deserializer)?;

    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            };
            (key, value)
        })
        .collect())
}

impl Client {
    pub async fn list_data_sources(&self, ctx: &Context) -> Result<Vec<DataSource>, ApiError> {
        self.list(ctx, &self.url("/data_sources"), "data_sources")
            .await
    }

    pub async fn get_data_source(&self, ctx: &Context, token: &str) -> Result<DataSource, ApiError> {
        self.get_json(ctx, &self.url(&format!("/data_sources/{}", token)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::create_test_client;
    use mockito::Server;

    #[test]
    fn data_source_tolerates_numeric_ids_and_loose_attributes() {
        let body = r#"{
            "id": 3, "token": "d1", "name": "warehouse", "port": 5432,
            "account_id": 99,
            "custom_attributes": {"region": "eu", "retries": 3, "empty": null}
        }"#;
        let source: DataSource = serde_json::from_str(body).unwrap();

        assert_eq!(source.id.as_deref(), Some("3"));
        assert_eq!(source.account_id.as_deref(), Some("99"));
        assert_eq!(source.port, Some(5432.0));
        assert_eq!(source.custom_attributes["region"], "eu");
        assert_eq!(source.custom_attributes["retries"], "3");
        assert_eq!(source.custom_attributes["empty"], "");
    }

    #[tokio::test]
    async fn get_data_source_by_token() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/ws1/data_sources/d1")
            .with_body(r#"{"id":"1","token":"d1","name":"warehouse","adapter":"jdbc:postgresql","queryable":true}"#)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let source = client
            .get_data_source(&Context::new(), "d1")
            .await
            .unwrap();

        assert_eq!(source.name, "warehouse");
        assert!(source.queryable);
        assert!(source.custom_attributes.is_empty());
    }

    #[tokio::test]
    async fn missing_data_source_is_an_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/ws1/data_sources/nope")
            .with_status(404)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let result = client.get_data_source(&Context::new(), "nope").await;

        assert!(matches!(result, Err(ApiError::Status { status: 404, .. })));
    }
}
