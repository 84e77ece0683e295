//! Data source permission resource
//!
//! Reading a single data source permission sometimes fails with 500 upstream.
//! Reads then fall back to the data source's entitlement listing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::api::permissions::{AccessorType, DataSourceAction, NewPermission, PermissionLookup};
use crate::api::ApiError;
use crate::framework::{Context, ModelResource};
use crate::ModeAnalyticsProviderData;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSourcePermissionModel {
    pub data_source_token: String,
    pub action: DataSourceAction,
    pub accessor_token: String,
    pub accessor_type: AccessorType,
    /// Computed
    pub permission_token: String,
}

pub struct DataSourcePermissionResource {
    provider_data: ModeAnalyticsProviderData,
}

impl DataSourcePermissionResource {
    pub fn new(provider_data: ModeAnalyticsProviderData) -> Self {
        Self { provider_data }
    }
}

#[async_trait]
impl ModelResource for DataSourcePermissionResource {
    type Model = DataSourcePermissionModel;

    const TYPE_NAME: &'static str = "modeanalytics_data_source_permission";
    const DISPLAY_NAME: &'static str = "data source permission";
    const IMPORT_ATTRIBUTE: &'static str = "permission_token";

    async fn create(
        &self,
        ctx: &Context,
        plan: DataSourcePermissionModel,
    ) -> Result<DataSourcePermissionModel, ApiError> {
        tracing::debug!(
            "Granting {} on data source {} to {:?} {}",
            plan.action,
            plan.data_source_token,
            plan.accessor_type,
            plan.accessor_token
        );

        let permission = self
            .provider_data
            .client
            .data_source_permissions(&plan.data_source_token)
            .create(
                ctx,
                &NewPermission {
                    action: plan.action,
                    accessor_type: plan.accessor_type,
                    accessor_token: &plan.accessor_token,
                },
            )
            .await?;

        Ok(DataSourcePermissionModel {
            permission_token: permission.token,
            ..plan
        })
    }

    async fn read(
        &self,
        ctx: &Context,
        state: DataSourcePermissionModel,
    ) -> Result<Option<DataSourcePermissionModel>, ApiError> {
        let permissions = self
            .provider_data
            .client
            .data_source_permissions(&state.data_source_token);

        match permissions.get_or_find(ctx, &state.permission_token).await? {
            PermissionLookup::Found(permission) => {
                let action = permission
                    .parsed_action()
                    .map_err(|source| ApiError::Decode {
                        url: permissions.url(&permission.token),
                        source,
                    })?;
                Ok(Some(DataSourcePermissionModel { action, ..state }))
            }
            PermissionLookup::Gone => Ok(None),
        }
    }

    async fn update(
        &self,
        ctx: &Context,
        prior: DataSourcePermissionModel,
        plan: DataSourcePermissionModel,
    ) -> Result<DataSourcePermissionModel, ApiError> {
        let permission = self
            .provider_data
            .client
            .data_source_permissions(&prior.data_source_token)
            .update_action(ctx, &prior.permission_token, plan.action)
            .await?;

        Ok(DataSourcePermissionModel {
            permission_token: if permission.token.is_empty() {
                prior.permission_token
            } else {
                permission.token
            },
            ..plan
        })
    }

    async fn delete(&self, ctx: &Context, state: DataSourcePermissionModel) -> Result<(), ApiError> {
        self.provider_data
            .client
            .data_source_permissions(&state.data_source_token)
            .delete(ctx, &state.permission_token)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::create_test_client;
    use crate::framework::{ReadResourceRequest, Resource};
    use mockito::Server;
    use serde_json::json;

    fn resource(url: &str) -> DataSourcePermissionResource {
        DataSourcePermissionResource::new(ModeAnalyticsProviderData::new(create_test_client(url)))
    }

    fn state() -> serde_json::Value {
        json!({
            "data_source_token": "d1",
            "action": "view",
            "accessor_token": "g1",
            "accessor_type": "UserGroup",
            "permission_token": "p1"
        })
    }

    #[tokio::test]
    async fn read_uses_listing_after_server_error() {
        let mut server = Server::new_async().await;
        let _broken = server
            .mock("GET", "/api/ws1/data_sources/d1/permissions/p1")
            .with_status(500)
            .create_async()
            .await;
        let _listing = server
            .mock("GET", "/api/ws1/data_sources/d1/permissions")
            .with_body(r#"{"_embedded":{"data_source_entitlements":[{"token":"p1","action":"query"}]}}"#)
            .create_async()
            .await;

        let response = Resource::read(
            &resource(&server.url()),
            Context::new(),
            ReadResourceRequest {
                current_state: state(),
            },
        )
        .await;

        assert!(!response.diagnostics.has_errors());
        let new_state = response.new_state.unwrap();
        assert_eq!(new_state["action"], "query");
        assert_eq!(new_state["accessor_type"], "UserGroup");
    }

    #[tokio::test]
    async fn read_removes_permission_missing_from_listing() {
        let mut server = Server::new_async().await;
        let _broken = server
            .mock("GET", "/api/ws1/data_sources/d1/permissions/p1")
            .with_status(500)
            .create_async()
            .await;
        let _listing = server
            .mock("GET", "/api/ws1/data_sources/d1/permissions")
            .with_body(r#"{"_embedded":{"data_source_entitlements":[]}}"#)
            .create_async()
            .await;

        let response = Resource::read(
            &resource(&server.url()),
            Context::new(),
            ReadResourceRequest {
                current_state: state(),
            },
        )
        .await;

        assert!(response.new_state.is_none());
    }

    #[tokio::test]
    async fn read_reports_other_statuses() {
        let mut server = Server::new_async().await;
        let _broken = server
            .mock("GET", "/api/ws1/data_sources/d1/permissions/p1")
            .with_status(502)
            .create_async()
            .await;

        let response = Resource::read(
            &resource(&server.url()),
            Context::new(),
            ReadResourceRequest {
                current_state: state(),
            },
        )
        .await;

        assert!(response.diagnostics.has_errors());
        assert_eq!(response.new_state, Some(state()));
    }
}
