//! Collection data sources

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::api::collections::{Collection, CollectionLookup};
use crate::api::ApiError;
use crate::framework::{Context, ModelDataSource};
use crate::ModeAnalyticsProviderData;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CollectionSummary {
    pub id: String,
    pub name: String,
    pub state: String,
    pub collection_token: String,
    pub collection_type: String,
    pub description: String,
    pub restricted: bool,
    pub free_default: bool,
    pub viewable: bool,
    pub default_access_level: String,
}

impl From<Collection> for CollectionSummary {
    fn from(collection: Collection) -> Self {
        Self {
            id: collection.id.unwrap_or_default(),
            name: collection.name,
            state: collection.state,
            collection_token: collection.token,
            collection_type: collection.collection_type,
            description: collection.description,
            restricted: collection.restricted,
            free_default: collection.free_default,
            viewable: collection.viewable,
            default_access_level: collection.default_access_level,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CollectionConfig {
    pub collection_token: String,
}

pub struct CollectionDataSource {
    provider_data: ModeAnalyticsProviderData,
}

impl CollectionDataSource {
    pub fn new(provider_data: ModeAnalyticsProviderData) -> Self {
        Self { provider_data }
    }
}

#[async_trait]
impl ModelDataSource for CollectionDataSource {
    type Config = CollectionConfig;
    type Model = CollectionSummary;

    const TYPE_NAME: &'static str = "modeanalytics_collection";
    const DISPLAY_NAME: &'static str = "collection";

    async fn read(&self, ctx: &Context, config: CollectionConfig) -> Result<CollectionSummary, ApiError> {
        let collections = self.provider_data.client.collections();

        match collections.get(ctx, &config.collection_token).await? {
            CollectionLookup::Found(collection) => Ok(collection.into()),
            CollectionLookup::Gone => Err(ApiError::Status {
                url: collections.url(&config.collection_token),
                status: 404,
                message: format!("collection {} not found", config.collection_token),
            }),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CollectionsConfig {}

#[derive(Debug, Serialize)]
pub struct CollectionsModel {
    pub collections: Vec<CollectionSummary>,
}

/// Every collection in the workspace, including ones the caller is not a member of
pub struct CollectionsDataSource {
    provider_data: ModeAnalyticsProviderData,
}

impl CollectionsDataSource {
    pub fn new(provider_data: ModeAnalyticsProviderData) -> Self {
        Self { provider_data }
    }
}

#[async_trait]
impl ModelDataSource for CollectionsDataSource {
    type Config = CollectionsConfig;
    type Model = CollectionsModel;

    const TYPE_NAME: &'static str = "modeanalytics_collections";
    const DISPLAY_NAME: &'static str = "collections";

    async fn read(&self, ctx: &Context, _config: CollectionsConfig) -> Result<CollectionsModel, ApiError> {
        let collections = self.provider_data.client.collections().list(ctx).await?;

        Ok(CollectionsModel {
            collections: collections.into_iter().map(CollectionSummary::from).collect(),
        })
    }
}
