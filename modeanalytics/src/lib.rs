pub mod api;
pub mod config;
pub mod data_sources;
pub mod framework;
pub mod logging;
pub mod provider_data;
pub mod resources;

pub use provider_data::ModeAnalyticsProviderData;

use async_trait::async_trait;

use api::{ClientConfig, Credentials};
use config::ProviderConfig;
use framework::{
    ConfigureRequest, ConfigureResponse, Context, DataSource, Diagnostics, ModelDataSource,
    ModelResource, Provider, ProviderError, Resource,
};

pub const PROVIDER_TYPE_NAME: &str = "modeanalytics";

pub struct ModeAnalyticsProvider {
    provider_data: Option<ModeAnalyticsProviderData>,
    client_config: ClientConfig,
}

impl Default for ModeAnalyticsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeAnalyticsProvider {
    pub fn new() -> Self {
        Self::with_client_config(ClientConfig::default())
    }

    /// Provider whose API client uses the given retry, deletion and transport settings
    pub fn with_client_config(client_config: ClientConfig) -> Self {
        Self {
            provider_data: None,
            client_config,
        }
    }

    pub fn provider_data(&self) -> Option<&ModeAnalyticsProviderData> {
        self.provider_data.as_ref()
    }

    fn configured(&self) -> Result<ModeAnalyticsProviderData, ProviderError> {
        self.provider_data
            .clone()
            .ok_or(ProviderError::NotConfigured)
    }
}

#[async_trait]
impl Provider for ModeAnalyticsProvider {
    fn type_name(&self) -> &str {
        PROVIDER_TYPE_NAME
    }

    async fn configure(&mut self, _ctx: Context, request: ConfigureRequest) -> ConfigureResponse {
        let mut diags = Diagnostics::new();

        let config: ProviderConfig = if request.config.is_null() {
            ProviderConfig::default()
        } else {
            match serde_json::from_value(request.config) {
                Ok(config) => config,
                Err(e) => {
                    diags.add_error("Invalid provider configuration", e.to_string());
                    return ConfigureResponse { diagnostics: diags };
                }
            }
        };

        let resolved = match config.resolve() {
            Ok(resolved) => resolved,
            Err(e) => {
                diags.add_error("Invalid provider configuration", e.to_string());
                return ConfigureResponse { diagnostics: diags };
            }
        };

        tracing::debug!(
            "Configuring Mode Analytics client for {} (workspace {})",
            resolved.host,
            resolved.workspace_id
        );

        match api::Client::with_config(
            &resolved.host,
            &resolved.workspace_id,
            Credentials::new(resolved.api_token, resolved.api_secret),
            self.client_config.clone(),
        ) {
            Ok(client) => {
                self.provider_data = Some(ModeAnalyticsProviderData::new(client));
            }
            Err(e) => {
                diags.add_error(
                    "Unable to create Mode Analytics client",
                    format!("Failed to create API client: {}", e),
                );
            }
        }

        ConfigureResponse { diagnostics: diags }
    }

    fn create_resource(&self, name: &str) -> Result<Box<dyn Resource>, ProviderError> {
        use resources::*;

        let provider_data = self.configured()?;

        match name {
            n if n == GroupResource::TYPE_NAME => Ok(Box::new(GroupResource::new(provider_data))),
            n if n == GroupMembershipResource::TYPE_NAME => {
                Ok(Box::new(GroupMembershipResource::new(provider_data)))
            }
            n if n == CollectionResource::TYPE_NAME => Ok(Box::new(CollectionResource::new(provider_data))),
            n if n == CollectionPermissionResource::TYPE_NAME => {
                Ok(Box::new(CollectionPermissionResource::new(provider_data)))
            }
            n if n == DataSourcePermissionResource::TYPE_NAME => {
                Ok(Box::new(DataSourcePermissionResource::new(provider_data)))
            }
            _ => Err(ProviderError::UnknownResource(name.to_string())),
        }
    }

    fn create_data_source(&self, name: &str) -> Result<Box<dyn DataSource>, ProviderError> {
        use data_sources::*;

        let provider_data = self.configured()?;

        match name {
            n if n == GroupDataSource::TYPE_NAME => Ok(Box::new(GroupDataSource::new(provider_data))),
            n if n == GroupsDataSource::TYPE_NAME => Ok(Box::new(GroupsDataSource::new(provider_data))),
            n if n == GroupMembershipsDataSource::TYPE_NAME => {
                Ok(Box::new(GroupMembershipsDataSource::new(provider_data)))
            }
            n if n == WorkspaceMembershipsDataSource::TYPE_NAME => {
                Ok(Box::new(WorkspaceMembershipsDataSource::new(provider_data)))
            }
            n if n == DataSourceDataSource::TYPE_NAME => {
                Ok(Box::new(DataSourceDataSource::new(provider_data)))
            }
            n if n == DataSourcesDataSource::TYPE_NAME => {
                Ok(Box::new(DataSourcesDataSource::new(provider_data)))
            }
            n if n == CollectionDataSource::TYPE_NAME => {
                Ok(Box::new(CollectionDataSource::new(provider_data)))
            }
            n if n == CollectionsDataSource::TYPE_NAME => {
                Ok(Box::new(CollectionsDataSource::new(provider_data)))
            }
            _ => Err(ProviderError::UnknownDataSource(name.to_string())),
        }
    }

    fn resource_names(&self) -> Vec<&'static str> {
        use resources::*;

        vec![
            GroupResource::TYPE_NAME,
            GroupMembershipResource::TYPE_NAME,
            CollectionResource::TYPE_NAME,
            CollectionPermissionResource::TYPE_NAME,
            DataSourcePermissionResource::TYPE_NAME,
        ]
    }

    fn data_source_names(&self) -> Vec<&'static str> {
        use data_sources::*;

        vec![
            GroupDataSource::TYPE_NAME,
            GroupsDataSource::TYPE_NAME,
            GroupMembershipsDataSource::TYPE_NAME,
            WorkspaceMembershipsDataSource::TYPE_NAME,
            DataSourceDataSource::TYPE_NAME,
            DataSourcesDataSource::TYPE_NAME,
            CollectionDataSource::TYPE_NAME,
            CollectionsDataSource::TYPE_NAME,
        ]
    }
}
