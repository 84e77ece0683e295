//! Group membership resource
//!
//! Both inputs force replacement, so update never talks to the API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::api::ApiError;
use crate::framework::{Context, ModelResource};
use crate::ModeAnalyticsProviderData;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupMembershipModel {
    pub group_token: String,
    pub member_token: String,
    /// Computed
    pub membership_token: String,
}

pub struct GroupMembershipResource {
    provider_data: ModeAnalyticsProviderData,
}

impl GroupMembershipResource {
    pub fn new(provider_data: ModeAnalyticsProviderData) -> Self {
        Self { provider_data }
    }
}

#[async_trait]
impl ModelResource for GroupMembershipResource {
    type Model = GroupMembershipModel;

    const TYPE_NAME: &'static str = "modeanalytics_group_membership";
    const DISPLAY_NAME: &'static str = "group membership";
    const IMPORT_ATTRIBUTE: &'static str = "membership_token";

    async fn create(
        &self,
        ctx: &Context,
        plan: GroupMembershipModel,
    ) -> Result<GroupMembershipModel, ApiError> {
        let membership = self
            .provider_data
            .client
            .group_memberships(&plan.group_token)
            .create(ctx, &plan.member_token)
            .await?;

        Ok(GroupMembershipModel {
            membership_token: membership.token,
            ..plan
        })
    }

    async fn read(
        &self,
        ctx: &Context,
        state: GroupMembershipModel,
    ) -> Result<Option<GroupMembershipModel>, ApiError> {
        let membership = self
            .provider_data
            .client
            .group_memberships(&state.group_token)
            .get(ctx, &state.membership_token)
            .await?;

        Ok(membership.map(|membership| GroupMembershipModel {
            member_token: if membership.member_token.is_empty() {
                state.member_token.clone()
            } else {
                membership.member_token
            },
            ..state
        }))
    }

    async fn update(
        &self,
        _ctx: &Context,
        prior: GroupMembershipModel,
        plan: GroupMembershipModel,
    ) -> Result<GroupMembershipModel, ApiError> {
        Ok(GroupMembershipModel {
            membership_token: prior.membership_token,
            ..plan
        })
    }

    async fn delete(&self, ctx: &Context, state: GroupMembershipModel) -> Result<(), ApiError> {
        self.provider_data
            .client
            .group_memberships(&state.group_token)
            .delete(ctx, &state.membership_token)
            .await
    }
}
