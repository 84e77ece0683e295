//! Membership data sources

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::api::memberships::WorkspaceMembership;
use crate::api::ApiError;
use crate::framework::{Context, ModelDataSource};
use crate::ModeAnalyticsProviderData;

#[derive(Debug, Deserialize)]
pub struct GroupMembershipsConfig {
    pub group_token: String,
}

#[derive(Debug, Serialize)]
pub struct GroupMembershipsModel {
    pub group_token: String,
    pub member_tokens: Vec<String>,
}

/// Member tokens of one group
pub struct GroupMembershipsDataSource {
    provider_data: ModeAnalyticsProviderData,
}

impl GroupMembershipsDataSource {
    pub fn new(provider_data: ModeAnalyticsProviderData) -> Self {
        Self { provider_data }
    }
}

#[async_trait]
impl ModelDataSource for GroupMembershipsDataSource {
    type Config = GroupMembershipsConfig;
    type Model = GroupMembershipsModel;

    const TYPE_NAME: &'static str = "modeanalytics_group_memberships";
    const DISPLAY_NAME: &'static str = "group memberships";

    async fn read(
        &self,
        ctx: &Context,
        config: GroupMembershipsConfig,
    ) -> Result<GroupMembershipsModel, ApiError> {
        let memberships = self
            .provider_data
            .client
            .group_memberships(&config.group_token)
            .list(ctx)
            .await?;

        Ok(GroupMembershipsModel {
            group_token: config.group_token,
            member_tokens: memberships
                .into_iter()
                .map(|membership| membership.member_token)
                .collect(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct WorkspaceMemberModel {
    pub admin: bool,
    pub state: String,
    pub member_username: String,
    pub member_token: String,
    pub activated_at: String,
}

impl From<WorkspaceMembership> for WorkspaceMemberModel {
    fn from(membership: WorkspaceMembership) -> Self {
        Self {
            admin: membership.admin,
            state: membership.state,
            member_username: membership.member_username,
            member_token: membership.member_token,
            activated_at: membership.activated_at.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct WorkspaceMembershipsConfig {}

#[derive(Debug, Serialize)]
pub struct WorkspaceMembershipsModel {
    pub memberships: Vec<WorkspaceMemberModel>,
}

pub struct WorkspaceMembershipsDataSource {
    provider_data: ModeAnalyticsProviderData,
}

impl WorkspaceMembershipsDataSource {
    pub fn new(provider_data: ModeAnalyticsProviderData) -> Self {
        Self { provider_data }
    }
}

#[async_trait]
impl ModelDataSource for WorkspaceMembershipsDataSource {
    type Config = WorkspaceMembershipsConfig;
    type Model = WorkspaceMembershipsModel;

    const TYPE_NAME: &'static str = "modeanalytics_workspace_memberships";
    const DISPLAY_NAME: &'static str = "workspace memberships";

    async fn read(
        &self,
        ctx: &Context,
        _config: WorkspaceMembershipsConfig,
    ) -> Result<WorkspaceMembershipsModel, ApiError> {
        let memberships = self
            .provider_data
            .client
            .list_workspace_memberships(ctx)
            .await?;

        Ok(WorkspaceMembershipsModel {
            memberships: memberships.into_iter().map(Into::into).collect(),
        })
    }
}
