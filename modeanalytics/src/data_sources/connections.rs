//! Data sources describing warehouse connections

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::api::data_sources::DataSource;
use crate::api::ApiError;
use crate::framework::{Context, ModelDataSource};
use crate::ModeAnalyticsProviderData;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataSourceModel {
    pub id: String,
    pub name: String,
    pub description: String,
    pub data_source_token: String,
    pub adapter: String,
    pub created_at: String,
    pub updated_at: String,
    pub has_expensive_schema_updates: bool,
    pub public: bool,
    pub asleep: bool,
    pub queryable: bool,
    pub soft_deleted: bool,
    pub display_name: String,
    pub account_id: String,
    pub account_username: String,
    pub organization_token: String,
    pub organization_plan_code: String,
    pub database: String,
    pub host: String,
    pub port: f64,
    pub ssl: bool,
    pub username: String,
    pub provider: String,
    pub vendor: String,
    pub ldap: bool,
    pub warehouse: String,
    pub bridged: bool,
    pub adapter_version: String,
    pub custom_attributes: HashMap<String, String>,
}

impl From<DataSource> for DataSourceModel {
    fn from(source: DataSource) -> Self {
        Self {
            id: source.id.unwrap_or_default(),
            name: source.name,
            description: source.description,
            data_source_token: source.token,
            adapter: source.adapter,
            created_at: source.created_at,
            updated_at: source.updated_at,
            has_expensive_schema_updates: source.has_expensive_schema_updates,
            public: source.public,
            asleep: source.asleep,
            queryable: source.queryable,
            soft_deleted: source.soft_deleted,
            display_name: source.display_name,
            account_id: source.account_id.unwrap_or_default(),
            account_username: source.account_username,
            organization_token: source.organization_token,
            organization_plan_code: source.organization_plan_code,
            database: source.database,
            host: source.host,
            port: source.port.unwrap_or_default(),
            ssl: source.ssl,
            username: source.username,
            provider: source.provider,
            vendor: source.vendor,
            ldap: source.ldap,
            warehouse: source.warehouse,
            bridged: source.bridged,
            adapter_version: source.adapter_version,
            custom_attributes: source.custom_attributes,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DataSourceConfig {
    pub data_source_token: String,
}

pub struct DataSourceDataSource {
    provider_data: ModeAnalyticsProviderData,
}

impl DataSourceDataSource {
    pub fn new(provider_data: ModeAnalyticsProviderData) -> Self {
        Self { provider_data }
    }
}

#[async_trait]
impl ModelDataSource for DataSourceDataSource {
    type Config = DataSourceConfig;
    type Model = DataSourceModel;

    const TYPE_NAME: &'static str = "modeanalytics_data_source";
    const DISPLAY_NAME: &'static str = "data source";

    async fn read(&self, ctx: &Context, config: DataSourceConfig) -> Result<DataSourceModel, ApiError> {
        let source = self
            .provider_data
            .client
            .get_data_source(ctx, &config.data_source_token)
            .await?;
        Ok(source.into())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DataSourcesConfig {}

#[derive(Debug, Serialize)]
pub struct DataSourcesModel {
    pub data_sources: Vec<DataSourceModel>,
}

pub struct DataSourcesDataSource {
    provider_data: ModeAnalyticsProviderData,
}

impl DataSourcesDataSource {
    pub fn new(provider_data: ModeAnalyticsProviderData) -> Self {
        Self { provider_data }
    }
}

#[async_trait]
impl ModelDataSource for DataSourcesDataSource {
    type Config = DataSourcesConfig;
    type Model = DataSourcesModel;

    const TYPE_NAME: &'static str = "modeanalytics_data_sources";
    const DISPLAY_NAME: &'static str = "data sources";

    async fn read(&self, ctx: &Context, _config: DataSourcesConfig) -> Result<DataSourcesModel, ApiError> {
        let sources = self.provider_data.client.list_data_sources(ctx).await?;

        Ok(DataSourcesModel {
            data_sources: sources.into_iter().map(DataSourceModel::from).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::create_test_client;
    use crate::framework::ReadDataSourceRequest;
    use mockito::Server;
    use serde_json::json;

    fn provider_data(url: &str) -> ModeAnalyticsProviderData {
        ModeAnalyticsProviderData::new(create_test_client(url))
    }

    #[tokio::test]
    async fn data_source_maps_token_and_port() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/ws1/data_sources/d1")
            .with_body(
                r#"{"id":"5","token":"d1","name":"warehouse","port":5432,"ssl":true,
                    "custom_attributes":{"region":"eu"}}"#,
            )
            .create_async()
            .await;

        let response = crate::framework::DataSource::read(
            &DataSourceDataSource::new(provider_data(&server.url())),
            Context::new(),
            ReadDataSourceRequest {
                config: json!({"data_source_token": "d1"}),
            },
        )
        .await;

        assert!(response.diagnostics.is_empty());
        assert_eq!(response.state["data_source_token"], "d1");
        assert_eq!(response.state["port"], 5432.0);
        assert_eq!(response.state["ssl"], true);
        assert_eq!(response.state["custom_attributes"]["region"], "eu");
    }

    #[tokio::test]
    async fn data_sources_lists_everything() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/ws1/data_sources")
            .with_body(r#"{"_embedded":{"data_sources":[{"id":1,"token":"d1"},{"id":2,"token":"d2"}]}}"#)
            .create_async()
            .await;

        let response = crate::framework::DataSource::read(
            &DataSourcesDataSource::new(provider_data(&server.url())),
            Context::new(),
            ReadDataSourceRequest { config: json!({}) },
        )
        .await;

        let sources = response.state["data_sources"].as_array().unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[1]["id"], "2");
    }
}
