//! User group API

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::client::Client;
use super::common::SOFT_DELETED;
use super::error::ApiError;
use crate::framework::Context;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Group {
    pub token: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: String,
}

impl Group {
    pub fn is_soft_deleted(&self) -> bool {
        self.state == SOFT_DELETED
    }
}

#[derive(Debug, Serialize)]
pub struct UserGroup<'a> {
    pub name: &'a str,
}

/// Request body for creating and renaming groups
#[derive(Debug, Serialize)]
pub struct GroupPayload<'a> {
    pub user_group: UserGroup<'a>,
}

impl<'a> GroupPayload<'a> {
    pub fn new(name: &'a str) -> Self {
        Self {
            user_group: UserGroup { name },
        }
    }
}

pub struct GroupsApi<'a> {
    client: &'a Client,
}

impl<'a> GroupsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    fn path(token: &str) -> String {
        format!("/groups/{}", token)
    }

    pub fn url(&self, token: &str) -> String {
        self.client.url(&Self::path(token))
    }

    pub async fn list(&self, ctx: &Context) -> Result<Vec<Group>, ApiError> {
        self.client.list(ctx, &self.client.url("/groups"), "groups").await
    }

    /// `None` when the group does not exist
    pub async fn get(&self, ctx: &Context, token: &str) -> Result<Option<Group>, ApiError> {
        self.client.get_optional(ctx, &self.url(token)).await
    }

    pub async fn create(&self, ctx: &Context, name: &str) -> Result<Group, ApiError> {
        self.client
            .send_json(ctx, Method::POST, &self.client.url("/groups"), &GroupPayload::new(name))
            .await
    }

    pub async fn update(&self, ctx: &Context, token: &str, name: &str) -> Result<Group, ApiError> {
        self.client
            .send_json(ctx, Method::PATCH, &self.url(token), &GroupPayload::new(name))
            .await
    }

    pub async fn delete(&self, ctx: &Context, token: &str) -> Result<(), ApiError> {
        self.client.delete_and_confirm(ctx, &self.url(token)).await
    }
}

impl Client {
    pub fn groups(&self) -> GroupsApi<'_> {
        GroupsApi::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::create_test_client;
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[test]
    fn payload_wraps_name_in_user_group() {
        let body = serde_json::to_value(GroupPayload::new("analysts")).unwrap();
        assert_eq!(body, json!({"user_group": {"name": "analysts"}}));
    }

    #[tokio::test]
    async fn list_reads_embedded_groups() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/ws1/groups")
            .with_body(
                r#"{"_embedded":{"groups":[
                    {"token":"g1","name":"analysts","state":"active"},
                    {"token":"g2","name":"admins","state":"active"}
                ]}}"#,
            )
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let groups = client.groups().list(&Context::new()).await.unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "analysts");
        assert_eq!(groups[1].token, "g2");
    }

    #[tokio::test]
    async fn create_returns_new_group() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/ws1/groups")
            .match_body(Matcher::Json(json!({"user_group": {"name": "analysts"}})))
            .with_body(r#"{"token":"g1","name":"analysts","state":"active"}"#)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let group = client
            .groups()
            .create(&Context::new(), "analysts")
            .await
            .unwrap();

        assert_eq!(group.token, "g1");
        assert!(!group.is_soft_deleted());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn get_detects_soft_deleted_groups() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/ws1/groups/g1")
            .with_body(r#"{"token":"g1","name":"analysts","state":"soft_deleted"}"#)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let group = client
            .groups()
            .get(&Context::new(), "g1")
            .await
            .unwrap()
            .unwrap();

        assert!(group.is_soft_deleted());
    }

    #[tokio::test]
    async fn delete_waits_for_confirmation() {
        let mut server = Server::new_async().await;
        let delete = server
            .mock("DELETE", "/api/ws1/groups/g1")
            .with_status(200)
            .expect(1)
            .create_async()
            .await;
        let poll = server
            .mock("GET", "/api/ws1/groups/g1")
            .with_status(404)
            .expect(1)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        client
            .groups()
            .delete(&Context::new(), "g1")
            .await
            .unwrap();

        delete.assert_async().await;
        poll.assert_async().await;
    }
}
