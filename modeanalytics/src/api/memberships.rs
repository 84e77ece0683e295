//! Group and workspace membership API

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::client::Client;
use super::error::ApiError;
use crate::framework::Context;

/// A user's membership in a group
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GroupMembership {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub member_token: String,
}

/// A user's membership in the workspace
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WorkspaceMembership {
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub member_username: String,
    #[serde(default)]
    pub member_token: String,
    #[serde(default)]
    pub activated_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Membership<'a> {
    pub member_token: &'a str,
}

#[derive(Debug, Serialize)]
pub struct MembershipPayload<'a> {
    pub membership: Membership<'a>,
}

pub struct GroupMembershipsApi<'a> {
    client: &'a Client,
    group_token: &'a str,
}

impl<'a> GroupMembershipsApi<'a> {
    pub fn new(client: &'a Client, group_token: &'a str) -> Self {
        Self {
            client,
            group_token,
        }
    }

    fn collection_url(&self) -> String {
        self.client
            .url(&format!("/groups/{}/memberships", self.group_token))
    }

    pub fn url(&self, membership_token: &str) -> String {
        format!("{}/{}", self.collection_url(), membership_token)
    }

    pub async fn list(&self, ctx: &Context) -> Result<Vec<GroupMembership>, ApiError> {
        self.client
            .list(ctx, &self.collection_url(), "group_memberships")
            .await
    }

    pub async fn get(
        &self,
        ctx: &Context,
        membership_token: &str,
    ) -> Result<Option<GroupMembership>, ApiError> {
        self.client
            .get_optional(ctx, &self.url(membership_token))
            .await
    }

    pub async fn create(&self, ctx: &Context, member_token: &str) -> Result<GroupMembership, ApiError> {
        let payload = MembershipPayload {
            membership: Membership { member_token },
        };
        self.client
            .send_json(ctx, Method::POST, &self.collection_url(), &payload)
            .await
    }

    pub async fn delete(&self, ctx: &Context, membership_token: &str) -> Result<(), ApiError> {
        self.client
            .delete_and_confirm(ctx, &self.url(membership_token))
            .await
    }
}

impl Client {
    pub fn group_memberships<'a>(&'a self, group_token: &'a str) -> GroupMembershipsApi<'a> {
        GroupMembershipsApi::new(self, group_token)
    }

    pub async fn list_workspace_memberships(
        &self,
        ctx: &Context,
    ) -> Result<Vec<WorkspaceMembership>, ApiError> {
        self.list(ctx, &self.url("/memberships"), "memberships").await
    }
}
