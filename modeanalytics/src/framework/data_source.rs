//! DataSource trait and related types

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::context::Context;
use super::diagnostics::Diagnostics;
use crate::api::ApiError;

/// Base trait for data sources - read is the only operation
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Type name, e.g. `modeanalytics_groups`
    fn type_name(&self) -> &str;

    /// MUST populate all attributes in response.state
    async fn read(&self, ctx: Context, request: ReadDataSourceRequest) -> ReadDataSourceResponse;
}

pub struct ReadDataSourceRequest {
    pub config: Value,
}

pub struct ReadDataSourceResponse {
    pub state: Value,
    pub diagnostics: Diagnostics,
}

/// Typed data source handler
#[async_trait]
pub trait ModelDataSource: Send + Sync {
    type Config: DeserializeOwned + Send;
    type Model: Serialize + Send;

    const TYPE_NAME: &'static str;
    const DISPLAY_NAME: &'static str;

    async fn read(&self, ctx: &Context, config: Self::Config) -> Result<Self::Model, ApiError>;
}

#[async_trait]
impl<T: ModelDataSource> DataSource for T {
    fn type_name(&self) -> &str {
        T::TYPE_NAME
    }

    async fn read(&self, ctx: Context, request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        let mut diagnostics = Diagnostics::new();

        let config: T::Config = match serde_json::from_value(request.config) {
            Ok(config) => config,
            Err(e) => {
                diagnostics.add_error("Invalid data source configuration", e.to_string());
                return ReadDataSourceResponse {
                    state: Value::Null,
                    diagnostics,
                };
            }
        };

        let state = match ModelDataSource::read(self, &ctx, config).await {
            Ok(model) => serde_json::to_value(&model).unwrap_or_else(|e| {
                diagnostics.add_error("Failed to encode data source state", e.to_string());
                Value::Null
            }),
            Err(e) => {
                tracing::error!("Unable to read {}: {}", T::DISPLAY_NAME, e);
                diagnostics.add_error(
                    "Client Error",
                    format!("Unable to read {}, got error: {}", T::DISPLAY_NAME, e),
                );
                Value::Null
            }
        };

        ReadDataSourceResponse { state, diagnostics }
    }
}
