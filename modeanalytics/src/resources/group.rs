//! User group resource

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::api::groups::Group;
use crate::api::ApiError;
use crate::framework::{Context, ModelResource};
use crate::ModeAnalyticsProviderData;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupModel {
    /// Computed
    pub group_token: String,
    pub name: String,
    /// Computed
    pub state: String,
}

impl From<Group> for GroupModel {
    fn from(group: Group) -> Self {
        Self {
            group_token: group.token,
            name: group.name,
            state: group.state,
        }
    }
}

pub struct GroupResource {
    provider_data: ModeAnalyticsProviderData,
}

impl GroupResource {
    pub fn new(provider_data: ModeAnalyticsProviderData) -> Self {
        Self { provider_data }
    }
}

#[async_trait]
impl ModelResource for GroupResource {
    type Model = GroupModel;

    const TYPE_NAME: &'static str = "modeanalytics_group";
    const DISPLAY_NAME: &'static str = "group";
    const IMPORT_ATTRIBUTE: &'static str = "group_token";

    async fn create(&self, ctx: &Context, plan: GroupModel) -> Result<GroupModel, ApiError> {
        let group = self
            .provider_data
            .client
            .groups()
            .create(ctx, &plan.name)
            .await?;
        Ok(group.into())
    }

    async fn read(&self, ctx: &Context, state: GroupModel) -> Result<Option<GroupModel>, ApiError> {
        let group = self
            .provider_data
            .client
            .groups()
            .get(ctx, &state.group_token)
            .await?;

        Ok(group
            .filter(|group| !group.is_soft_deleted())
            .map(|group| GroupModel {
                group_token: state.group_token,
                name: group.name,
                state: group.state,
            }))
    }

    async fn update(
        &self,
        ctx: &Context,
        prior: GroupModel,
        plan: GroupModel,
    ) -> Result<GroupModel, ApiError> {
        let group = self
            .provider_data
            .client
            .groups()
            .update(ctx, &prior.group_token, &plan.name)
            .await?;

        Ok(GroupModel {
            group_token: prior.group_token,
            name: group.name,
            state: group.state,
        })
    }

    async fn delete(&self, ctx: &Context, state: GroupModel) -> Result<(), ApiError> {
        self.provider_data
            .client
            .groups()
            .delete(ctx, &state.group_token)
            .await
    }
}
