//! Collection and data source permission API
//!
//! Both permission kinds share one wire shape and differ only in their parent
//! path and the actions they accept.

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::client::{decode_response, error_from_response, ApiRequest, Client};
use super::error::ApiError;
use crate::framework::Context;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessorType {
    #[default]
    Account,
    UserGroup,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionAction {
    #[default]
    View,
    Edit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceAction {
    Manage,
    #[default]
    View,
    Query,
}

impl fmt::Display for CollectionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionAction::View => write!(f, "view"),
            CollectionAction::Edit => write!(f, "edit"),
        }
    }
}

impl fmt::Display for DataSourceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSourceAction::Manage => write!(f, "manage"),
            DataSourceAction::View => write!(f, "view"),
            DataSourceAction::Query => write!(f, "query"),
        }
    }
}

/// Permission as returned by the API. `action` stays a plain string so an
/// action this crate does not know about still decodes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Permission {
    pub token: String,
    #[serde(default)]
    pub action: String,
}

impl Permission {
    /// Parse `action` into one of the typed action enums
    pub fn parsed_action<A: DeserializeOwned>(&self) -> Result<A, serde_json::Error> {
        serde_json::from_value(serde_json::Value::String(self.action.clone()))
    }
}

#[derive(Debug, Serialize)]
pub struct NewPermission<'a, A> {
    pub action: A,
    pub accessor_type: AccessorType,
    pub accessor_token: &'a str,
}

#[derive(Debug, Serialize)]
struct ActionChange<A> {
    action: A,
}

#[derive(Debug, Serialize)]
struct PermissionPayload<P> {
    permission: P,
}

#[derive(Debug)]
pub enum PermissionLookup {
    Found(Permission),
    Gone,
}

pub struct PermissionsApi<'a> {
    client: &'a Client,
    parent_path: String,
}

impl<'a> PermissionsApi<'a> {
    fn new(client: &'a Client, parent_path: String) -> Self {
        Self {
            client,
            parent_path,
        }
    }

    fn collection_url(&self) -> String {
        self.client
            .url(&format!("{}/permissions", self.parent_path))
    }

    pub fn url(&self, permission_token: &str) -> String {
        format!("{}/{}", self.collection_url(), permission_token)
    }

    pub async fn create<A: Serialize + Send + Sync>(
        &self,
        ctx: &Context,
        permission: &NewPermission<'_, A>,
    ) -> Result<Permission, ApiError> {
        self.client
            .send_json(
                ctx,
                Method::POST,
                &self.collection_url(),
                &PermissionPayload { permission },
            )
            .await
    }

    /// `None` when the permission does not exist
    pub async fn get(
        &self,
        ctx: &Context,
        permission_token: &str,
    ) -> Result<Option<Permission>, ApiError> {
        self.client
            .get_optional(ctx, &self.url(permission_token))
            .await
    }

    /// Read a permission, falling back to the entitlement listing when the
    /// single-item endpoint answers 500.
    pub async fn get_or_find(
        &self,
        ctx: &Context,
        permission_token: &str,
    ) -> Result<PermissionLookup, ApiError> {
        let url = self.url(permission_token);
        let response = self.client.execute(ctx, &ApiRequest::get(&url)).await?;

        match response.status() {
            StatusCode::OK => Ok(PermissionLookup::Found(
                decode_response(ctx, &url, response).await?,
            )),
            StatusCode::NOT_FOUND => Ok(PermissionLookup::Gone),
            StatusCode::INTERNAL_SERVER_ERROR => {
                drop(response);
                tracing::warn!(
                    "Reading {} failed with 500, searching the entitlement listing",
                    url
                );

                let entitlements: Vec<Permission> = self
                    .client
                    .list(ctx, &self.collection_url(), "data_source_entitlements")
                    .await?;

                Ok(entitlements
                    .into_iter()
                    .find(|entitlement| entitlement.token == permission_token)
                    .map_or(PermissionLookup::Gone, PermissionLookup::Found))
            }
            _ => Err(error_from_response(ctx, &url, response).await),
        }
    }

    pub async fn update_action<A: Serialize + Send + Sync>(
        &self,
        ctx: &Context,
        permission_token: &str,
        action: A,
    ) -> Result<Permission, ApiError> {
        self.client
            .send_json(
                ctx,
                Method::PATCH,
                &self.url(permission_token),
                &PermissionPayload {
                    permission: ActionChange { action },
                },
            )
            .await
    }

    pub async fn delete(&self, ctx: &Context, permission_token: &str) -> Result<(), ApiError> {
        self.client
            .delete_and_confirm(ctx, &self.url(permission_token))
            .await
    }
}

impl Client {
    pub fn collection_permissions(&self, collection_token: &str) -> PermissionsApi<'_> {
        PermissionsApi::new(self, format!("/spaces/{}", collection_token))
    }

    pub fn data_source_permissions(&self, data_source_token: &str) -> PermissionsApi<'_> {
        PermissionsApi::new(self, format!("/data_sources/{}", data_source_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::create_test_client;
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[test]
    fn actions_use_lowercase_wire_names() {
        assert_eq!(serde_json::to_value(CollectionAction::Edit).unwrap(), json!("edit"));
        assert_eq!(serde_json::to_value(DataSourceAction::Query).unwrap(), json!("query"));
        assert_eq!(serde_json::to_value(AccessorType::UserGroup).unwrap(), json!("UserGroup"));
        assert!(serde_json::from_value::<CollectionAction>(json!("manage")).is_err());
        assert_eq!(AccessorType::default(), AccessorType::Account);
    }

    #[test]
    fn parsed_action_rejects_unknown_actions() {
        let permission = Permission {
            token: "p1".to_string(),
            action: "query".to_string(),
        };
        assert_eq!(
            permission.parsed_action::<DataSourceAction>().unwrap(),
            DataSourceAction::Query
        );
        assert!(permission.parsed_action::<CollectionAction>().is_err());
    }

    #[tokio::test]
    async fn create_collection_permission() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/ws1/spaces/c1/permissions")
            .match_body(Matcher::Json(json!({
                "permission": {"action": "edit", "accessor_type": "UserGroup", "accessor_token": "g1"}
            })))
            .with_body(r#"{"token":"p1","action":"edit"}"#)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let permission = client
            .collection_permissions("c1")
            .create(
                &Context::new(),
                &NewPermission {
                    action: CollectionAction::Edit,
                    accessor_type: AccessorType::UserGroup,
                    accessor_token: "g1",
                },
            )
            .await
            .unwrap();

        assert_eq!(permission.token, "p1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn update_sends_only_action() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PATCH", "/api/ws1/data_sources/d1/permissions/p1")
            .match_body(Matcher::Json(json!({"permission": {"action": "manage"}})))
            .with_body(r#"{"token":"p1","action":"manage"}"#)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let permission = client
            .data_source_permissions("d1")
            .update_action(&Context::new(), "p1", DataSourceAction::Manage)
            .await
            .unwrap();

        assert_eq!(permission.action, "manage");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_error_falls_back_to_entitlement_listing() {
        let mut server = Server::new_async().await;
        let _broken = server
            .mock("GET", "/api/ws1/data_sources/d1/permissions/p2")
            .with_status(500)
            .create_async()
            .await;
        let listing = server
            .mock("GET", "/api/ws1/data_sources/d1/permissions")
            .with_body(
                r#"{"_embedded":{"data_source_entitlements":[
                    {"token":"p1","action":"view"},
                    {"token":"p2","action":"query"}
                ]}}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let lookup = client
            .data_source_permissions("d1")
            .get_or_find(&Context::new(), "p2")
            .await
            .unwrap();

        match lookup {
            PermissionLookup::Found(permission) => assert_eq!(permission.action, "query"),
            PermissionLookup::Gone => panic!("Expected permission p2 in listing"),
        }
        listing.assert_async().await;
    }

    #[tokio::test]
    async fn missing_entitlement_is_gone() {
        let mut server = Server::new_async().await;
        let _broken = server
            .mock("GET", "/api/ws1/data_sources/d1/permissions/p9")
            .with_status(500)
            .create_async()
            .await;
        let _listing = server
            .mock("GET", "/api/ws1/data_sources/d1/permissions")
            .with_body(r#"{"_embedded":{"data_source_entitlements":[{"token":"p1","action":"view"}]}}"#)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let lookup = client
            .data_source_permissions("d1")
            .get_or_find(&Context::new(), "p9")
            .await
            .unwrap();

        assert!(matches!(lookup, PermissionLookup::Gone));
    }

    #[tokio::test]
    async fn collection_permission_get_maps_not_found() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/ws1/spaces/c1/permissions/p1")
            .with_status(404)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let permission = client
            .collection_permissions("c1")
            .get(&Context::new(), "p1")
            .await
            .unwrap();

        assert!(permission.is_none());
    }
}
