//! Resource trait and related types
//!
//! The host drives managed resources through [`Resource`], exchanging state as
//! JSON objects. Handlers implement the typed [`ModelResource`] instead and get
//! the JSON conversion and error reporting from the blanket impl.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::context::Context;
use super::diagnostics::{Diagnostic, Diagnostics};
use crate::api::ApiError;

/// Base trait for resources
#[async_trait]
pub trait Resource: Send + Sync {
    /// Type name, e.g. `modeanalytics_group`
    fn type_name(&self) -> &str;

    /// MUST populate all attributes in response.new_state (including computed)
    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse;

    /// Returns `new_state: None` when the resource no longer exists
    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse;

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse;

    /// Succeeds only once the deletion has been confirmed upstream
    async fn delete(&self, ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse;

    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse;
}

pub struct CreateResourceRequest {
    pub planned_state: Value,
}

pub struct CreateResourceResponse {
    pub new_state: Value,
    pub diagnostics: Diagnostics,
}

pub struct ReadResourceRequest {
    pub current_state: Value,
}

pub struct ReadResourceResponse {
    pub new_state: Option<Value>,
    pub diagnostics: Diagnostics,
}

pub struct UpdateResourceRequest {
    pub prior_state: Value,
    pub planned_state: Value,
}

pub struct UpdateResourceResponse {
    pub new_state: Value,
    pub diagnostics: Diagnostics,
}

pub struct DeleteResourceRequest {
    pub prior_state: Value,
}

pub struct DeleteResourceResponse {
    pub diagnostics: Diagnostics,
}

pub struct ImportResourceStateRequest {
    pub id: String,
}

/// State holding only the import id; the host follows up with a read
pub struct ImportResourceStateResponse {
    pub state: Option<Value>,
    pub diagnostics: Diagnostics,
}

/// Typed resource handler
#[async_trait]
pub trait ModelResource: Send + Sync {
    type Model: Serialize + DeserializeOwned + Send + Sync;

    const TYPE_NAME: &'static str;
    /// Human name used in diagnostics, e.g. "group"
    const DISPLAY_NAME: &'static str;
    /// Attribute the import id is written to
    const IMPORT_ATTRIBUTE: &'static str;

    async fn create(&self, ctx: &Context, plan: Self::Model) -> Result<Self::Model, ApiError>;

    /// `Ok(None)` removes the resource from state
    async fn read(&self, ctx: &Context, state: Self::Model) -> Result<Option<Self::Model>, ApiError>;

    async fn update(
        &self,
        ctx: &Context,
        prior: Self::Model,
        plan: Self::Model,
    ) -> Result<Self::Model, ApiError>;

    async fn delete(&self, ctx: &Context, state: Self::Model) -> Result<(), ApiError>;
}

fn decode_state<M: DeserializeOwned>(state: &Value, diagnostics: &mut Diagnostics) -> Option<M> {
    match serde_json::from_value(state.clone()) {
        Ok(model) => Some(model),
        Err(e) => {
            diagnostics.add_error("Invalid resource state", e.to_string());
            None
        }
    }
}

fn encode_state<M: Serialize>(model: &M, diagnostics: &mut Diagnostics) -> Option<Value> {
    match serde_json::to_value(model) {
        Ok(value) => Some(value),
        Err(e) => {
            diagnostics.add_error("Failed to encode resource state", e.to_string());
            None
        }
    }
}

fn client_error(operation: &str, kind: &str, err: &ApiError) -> Diagnostic {
    tracing::error!("Unable to {} {}: {}", operation, kind, err);
    Diagnostic::error(
        "Client Error",
        format!("Unable to {} {}, got error: {}", operation, kind, err),
    )
}

#[async_trait]
impl<T: ModelResource> Resource for T {
    fn type_name(&self) -> &str {
        T::TYPE_NAME
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        let mut diagnostics = Diagnostics::new();

        let new_state = match decode_state::<T::Model>(&request.planned_state, &mut diagnostics) {
            Some(plan) => match ModelResource::create(self, &ctx, plan).await {
                Ok(created) => {
                    tracing::info!("Created {}", T::TYPE_NAME);
                    encode_state(&created, &mut diagnostics)
                }
                Err(e) => {
                    diagnostics.push(client_error("create", T::DISPLAY_NAME, &e));
                    None
                }
            },
            None => None,
        };

        CreateResourceResponse {
            new_state: new_state.unwrap_or(request.planned_state),
            diagnostics,
        }
    }

    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let mut diagnostics = Diagnostics::new();

        let Some(state) = decode_state::<T::Model>(&request.current_state, &mut diagnostics) else {
            return ReadResourceResponse {
                new_state: Some(request.current_state),
                diagnostics,
            };
        };

        let new_state = match ModelResource::read(self, &ctx, state).await {
            Ok(Some(current)) => encode_state(&current, &mut diagnostics).or(Some(request.current_state)),
            Ok(None) => {
                tracing::info!("{} no longer exists, removing from state", T::TYPE_NAME);
                None
            }
            Err(e) => {
                diagnostics.push(client_error("read", T::DISPLAY_NAME, &e));
                Some(request.current_state)
            }
        };

        ReadResourceResponse {
            new_state,
            diagnostics,
        }
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        let mut diagnostics = Diagnostics::new();

        let prior = decode_state::<T::Model>(&request.prior_state, &mut diagnostics);
        let plan = decode_state::<T::Model>(&request.planned_state, &mut diagnostics);

        let new_state = match (prior, plan) {
            (Some(prior), Some(plan)) => match ModelResource::update(self, &ctx, prior, plan).await {
                Ok(updated) => encode_state(&updated, &mut diagnostics),
                Err(e) => {
                    diagnostics.push(client_error("update", T::DISPLAY_NAME, &e));
                    None
                }
            },
            _ => None,
        };

        UpdateResourceResponse {
            new_state: new_state.unwrap_or(request.prior_state),
            diagnostics,
        }
    }

    async fn delete(&self, ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        let mut diagnostics = Diagnostics::new();

        if let Some(state) = decode_state::<T::Model>(&request.prior_state, &mut diagnostics) {
            match ModelResource::delete(self, &ctx, state).await {
                Ok(()) => tracing::info!("Deleted {}", T::TYPE_NAME),
                Err(e) => diagnostics.push(client_error("delete", T::DISPLAY_NAME, &e)),
            }
        }

        DeleteResourceResponse { diagnostics }
    }

    async fn import_state(
        &self,
        _ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        let mut diagnostics = Diagnostics::new();

        if request.id.is_empty() {
            diagnostics.push(
                Diagnostic::error(
                    "Invalid import id",
                    format!("Import of {} requires a non-empty id", T::TYPE_NAME),
                )
                .with_attribute(T::IMPORT_ATTRIBUTE),
            );
            return ImportResourceStateResponse {
                state: None,
                diagnostics,
            };
        }

        let mut state = serde_json::Map::new();
        state.insert(T::IMPORT_ATTRIBUTE.to_string(), Value::String(request.id));

        ImportResourceStateResponse {
            state: Some(Value::Object(state)),
            diagnostics,
        }
    }
}
