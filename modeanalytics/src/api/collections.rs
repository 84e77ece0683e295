//! Collection API
//!
//! Collections are called "spaces" on the wire.

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use super::client::{decode_response, error_from_response, ApiRequest, Client};
use super::common::{string_or_number, ApiQueryParams, SOFT_DELETED};
use super::error::ApiError;
use crate::framework::Context;

/// Access level the API expects in place of `restricted` when creating
pub const NO_DEFAULT_ACCESS: &str = "none";
pub const RESTRICTED_ACCESS: &str = "restricted";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Collection {
    #[serde(default, deserialize_with = "string_or_number::deserialize")]
    pub id: Option<String>,
    pub token: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(rename = "space_type", default)]
    pub collection_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub restricted: bool,
    #[serde(default)]
    pub free_default: bool,
    #[serde(rename = "viewable?", default)]
    pub viewable: bool,
    #[serde(default)]
    pub default_access_level: String,
}

impl Collection {
    pub fn is_soft_deleted(&self) -> bool {
        self.state == SOFT_DELETED
    }
}

/// Writable collection fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionSpec {
    #[serde(rename = "space_type")]
    pub collection_type: String,
    pub name: String,
    pub description: String,
    pub restricted: bool,
    pub free_default: bool,
    #[serde(rename = "viewable?")]
    pub viewable: bool,
    pub default_access_level: String,
}

#[derive(Debug, Serialize)]
pub struct CollectionPayload<'a> {
    pub space: &'a CollectionSpec,
}

/// Outcome of reading a single collection
#[derive(Debug)]
pub enum CollectionLookup {
    Found(Collection),
    /// 404, soft deleted, or the 403-after-delete case
    Gone,
}

pub struct CollectionsApi<'a> {
    client: &'a Client,
}

impl<'a> CollectionsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn url(&self, token: &str) -> String {
        self.client.url(&format!("/spaces/{}", token))
    }

    pub async fn list(&self, ctx: &Context) -> Result<Vec<Collection>, ApiError> {
        let query = ApiQueryParams::new().add("filter", "all").to_query_string();
        let url = self.client.url(&format!("/spaces{}", query));
        self.client.list(ctx, &url, "spaces").await
    }

    /// Read a collection, folding every "it is gone" answer into
    /// [`CollectionLookup::Gone`]
    pub async fn get(&self, ctx: &Context, token: &str) -> Result<CollectionLookup, ApiError> {
        let url = self.url(token);
        let response = self.client.execute(ctx, &ApiRequest::get(&url)).await?;

        match response.status() {
            StatusCode::OK => {
                let collection: Collection = decode_response(ctx, &url, response).await?;
                if collection.is_soft_deleted() {
                    tracing::debug!("Collection {} is soft deleted", token);
                    return Ok(CollectionLookup::Gone);
                }
                Ok(CollectionLookup::Found(collection))
            }
            StatusCode::NOT_FOUND => Ok(CollectionLookup::Gone),
            StatusCode::FORBIDDEN => {
                drop(response);
                self.client
                    .confirm_access_after_forbidden(ctx, &url)
                    .await?;
                tracing::debug!("Collection {} forbidden but listing allowed, treating as gone", token);
                Ok(CollectionLookup::Gone)
            }
            _ => Err(error_from_response(ctx, &url, response).await),
        }
    }

    /// Create a collection. A `restricted` default access level is sent as
    /// `none`, which is what the API accepts on create.
    pub async fn create(&self, ctx: &Context, spec: &CollectionSpec) -> Result<Collection, ApiError> {
        let mut spec = spec.clone();
        if spec.default_access_level == RESTRICTED_ACCESS {
            spec.default_access_level = NO_DEFAULT_ACCESS.to_string();
        }

        self.client
            .send_json(
                ctx,
                Method::POST,
                &self.client.url("/spaces"),
                &CollectionPayload { space: &spec },
            )
            .await
    }

    pub async fn update(
        &self,
        ctx: &Context,
        token: &str,
        spec: &CollectionSpec,
    ) -> Result<Collection, ApiError> {
        self.client
            .send_json(
                ctx,
                Method::PATCH,
                &self.url(token),
                &CollectionPayload { space: spec },
            )
            .await
    }

    pub async fn delete(&self, ctx: &Context, token: &str) -> Result<(), ApiError> {
        self.client.delete_and_confirm(ctx, &self.url(token)).await
    }
}

impl Client {
    pub fn collections(&self) -> CollectionsApi<'_> {
        CollectionsApi::new(self)
    }
}
