//! Collection permission resource

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::api::permissions::{AccessorType, CollectionAction, NewPermission, Permission};
use crate::api::ApiError;
use crate::framework::{Context, ModelResource};
use crate::ModeAnalyticsProviderData;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionPermissionModel {
    pub collection_token: String,
    pub action: CollectionAction,
    pub accessor_token: String,
    pub accessor_type: AccessorType,
    /// Computed
    pub permission_token: String,
}

pub struct CollectionPermissionResource {
    provider_data: ModeAnalyticsProviderData,
}

impl CollectionPermissionResource {
    pub fn new(provider_data: ModeAnalyticsProviderData) -> Self {
        Self { provider_data }
    }

    fn action_of(&self, model: &CollectionPermissionModel, permission: &Permission) -> Result<CollectionAction, ApiError> {
        permission.parsed_action().map_err(|source| ApiError::Decode {
            url: self
                .provider_data
                .client
                .collection_permissions(&model.collection_token)
                .url(&permission.token),
            source,
        })
    }
}

#[async_trait]
impl ModelResource for CollectionPermissionResource {
    type Model = CollectionPermissionModel;

    const TYPE_NAME: &'static str = "modeanalytics_collection_permission";
    const DISPLAY_NAME: &'static str = "collection permission";
    const IMPORT_ATTRIBUTE: &'static str = "permission_token";

    async fn create(
        &self,
        ctx: &Context,
        plan: CollectionPermissionModel,
    ) -> Result<CollectionPermissionModel, ApiError> {
        tracing::debug!(
            "Granting {} on collection {} to {:?} {}",
            plan.action,
            plan.collection_token,
            plan.accessor_type,
            plan.accessor_token
        );

        let permission = self
            .provider_data
            .client
            .collection_permissions(&plan.collection_token)
            .create(
                ctx,
                &NewPermission {
                    action: plan.action,
                    accessor_type: plan.accessor_type,
                    accessor_token: &plan.accessor_token,
                },
            )
            .await?;

        Ok(CollectionPermissionModel {
            permission_token: permission.token,
            ..plan
        })
    }

    async fn read(
        &self,
        ctx: &Context,
        state: CollectionPermissionModel,
    ) -> Result<Option<CollectionPermissionModel>, ApiError> {
        let permission = self
            .provider_data
            .client
            .collection_permissions(&state.collection_token)
            .get(ctx, &state.permission_token)
            .await?;

        match permission {
            Some(permission) => {
                let action = self.action_of(&state, &permission)?;
                Ok(Some(CollectionPermissionModel { action, ..state }))
            }
            None => Ok(None),
        }
    }

    async fn update(
        &self,
        ctx: &Context,
        prior: CollectionPermissionModel,
        plan: CollectionPermissionModel,
    ) -> Result<CollectionPermissionModel, ApiError> {
        let permission = self
            .provider_data
            .client
            .collection_permissions(&prior.collection_token)
            .update_action(ctx, &prior.permission_token, plan.action)
            .await?;

        Ok(CollectionPermissionModel {
            permission_token: if permission.token.is_empty() {
                prior.permission_token
            } else {
                permission.token
            },
            ..plan
        })
    }

    async fn delete(&self, ctx: &Context, state: CollectionPermissionModel) -> Result<(), ApiError> {
        self.provider_data
            .client
            .collection_permissions(&state.collection_token)
            .delete(ctx, &state.permission_token)
            .await
    }
}
