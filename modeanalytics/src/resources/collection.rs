//! Collection resource

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::api::collections::{Collection, CollectionLookup, CollectionSpec, RESTRICTED_ACCESS};
use crate::api::ApiError;
use crate::framework::{Context, ModelResource};
use crate::ModeAnalyticsProviderData;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionModel {
    /// Computed
    pub collection_token: String,
    /// Computed
    pub id: String,
    /// Computed
    pub state: String,
    pub name: String,
    pub collection_type: String,
    pub description: String,
    pub restricted: bool,
    pub free_default: bool,
    pub viewable: bool,
    pub default_access_level: String,
}

impl Default for CollectionModel {
    fn default() -> Self {
        Self {
            collection_token: String::new(),
            id: String::new(),
            state: String::new(),
            name: String::new(),
            collection_type: "custom".to_string(),
            description: String::new(),
            restricted: false,
            free_default: false,
            viewable: true,
            default_access_level: RESTRICTED_ACCESS.to_string(),
        }
    }
}

impl CollectionModel {
    fn spec(&self) -> CollectionSpec {
        CollectionSpec {
            collection_type: self.collection_type.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            restricted: self.restricted,
            free_default: self.free_default,
            viewable: self.viewable,
            default_access_level: self.default_access_level.clone(),
        }
    }

    /// Overwrite every API-owned field from `collection`. Identity fields
    /// are only replaced when the answer carries them.
    fn refresh(mut self, collection: Collection) -> Self {
        if !collection.token.is_empty() {
            self.collection_token = collection.token;
        }
        if let Some(id) = collection.id {
            self.id = id;
        }
        self.state = collection.state;
        self.name = collection.name;
        self.collection_type = collection.collection_type;
        self.description = collection.description;
        self.restricted = collection.restricted;
        self.free_default = collection.free_default;
        self.viewable = collection.viewable;
        self.default_access_level = collection.default_access_level;
        self
    }
}

pub struct CollectionResource {
    provider_data: ModeAnalyticsProviderData,
}

impl CollectionResource {
    pub fn new(provider_data: ModeAnalyticsProviderData) -> Self {
        Self { provider_data }
    }
}

#[async_trait]
impl ModelResource for CollectionResource {
    type Model = CollectionModel;

    const TYPE_NAME: &'static str = "modeanalytics_collection";
    const DISPLAY_NAME: &'static str = "collection";
    const IMPORT_ATTRIBUTE: &'static str = "collection_token";

    async fn create(&self, ctx: &Context, plan: CollectionModel) -> Result<CollectionModel, ApiError> {
        let collection = self
            .provider_data
            .client
            .collections()
            .create(ctx, &plan.spec())
            .await?;

        Ok(plan.refresh(collection))
    }

    async fn read(
        &self,
        ctx: &Context,
        state: CollectionModel,
    ) -> Result<Option<CollectionModel>, ApiError> {
        let lookup = self
            .provider_data
            .client
            .collections()
            .get(ctx, &state.collection_token)
            .await?;

        Ok(match lookup {
            CollectionLookup::Found(collection) => Some(state.refresh(collection)),
            CollectionLookup::Gone => None,
        })
    }

    async fn update(
        &self,
        ctx: &Context,
        prior: CollectionModel,
        plan: CollectionModel,
    ) -> Result<CollectionModel, ApiError> {
        let collection = self
            .provider_data
            .client
            .collections()
            .update(ctx, &prior.collection_token, &plan.spec())
            .await?;

        Ok(CollectionModel {
            collection_token: prior.collection_token,
            id: prior.id,
            ..plan
        }
        .refresh(collection))
    }

    async fn delete(&self, ctx: &Context, state: CollectionModel) -> Result<(), ApiError> {
        self.provider_data
            .client
            .collections()
            .delete(ctx, &state.collection_token)
            .await
    }
}
