//! Group data sources

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::api::ApiError;
use crate::framework::{Context, ModelDataSource};
use crate::resources::group::GroupModel;
use crate::ModeAnalyticsProviderData;

#[derive(Debug, Deserialize)]
pub struct GroupConfig {
    pub group_token: String,
}

/// Single group looked up by token
pub struct GroupDataSource {
    provider_data: ModeAnalyticsProviderData,
}

impl GroupDataSource {
    pub fn new(provider_data: ModeAnalyticsProviderData) -> Self {
        Self { provider_data }
    }
}

#[async_trait]
impl ModelDataSource for GroupDataSource {
    type Config = GroupConfig;
    type Model = GroupModel;

    const TYPE_NAME: &'static str = "modeanalytics_group";
    const DISPLAY_NAME: &'static str = "group";

    async fn read(&self, ctx: &Context, config: GroupConfig) -> Result<GroupModel, ApiError> {
        let groups = self.provider_data.client.groups();
        let url = groups.url(&config.group_token);

        match groups.get(ctx, &config.group_token).await? {
            Some(group) => Ok(group.into()),
            None => Err(ApiError::Status {
                url,
                status: 404,
                message: format!("group {} not found", config.group_token),
            }),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct GroupsConfig {}

#[derive(Debug, Serialize)]
pub struct GroupsModel {
    pub groups: Vec<GroupModel>,
}

/// Every group in the workspace
pub struct GroupsDataSource {
    provider_data: ModeAnalyticsProviderData,
}

impl GroupsDataSource {
    pub fn new(provider_data: ModeAnalyticsProviderData) -> Self {
        Self { provider_data }
    }
}

#[async_trait]
impl ModelDataSource for GroupsDataSource {
    type Config = GroupsConfig;
    type Model = GroupsModel;

    const TYPE_NAME: &'static str = "modeanalytics_groups";
    const DISPLAY_NAME: &'static str = "groups";

    async fn read(&self, ctx: &Context, _config: GroupsConfig) -> Result<GroupsModel, ApiError> {
        let groups = self.provider_data.client.groups().list(ctx).await?;
        tracing::debug!("Found {} groups", groups.len());

        Ok(GroupsModel {
            groups: groups.into_iter().map(GroupModel::from).collect(),
        })
    }
}
