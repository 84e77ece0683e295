//! Provider trait: configuration plus handler factories

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use super::context::Context;
use super::data_source::DataSource;
use super::diagnostics::Diagnostics;
use super::resource::Resource;

#[derive(Debug, Error, PartialEq)]
pub enum ProviderError {
    #[error("Provider not configured")]
    NotConfigured,

    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    #[error("Unknown data source: {0}")]
    UnknownDataSource(String),
}

pub struct ConfigureRequest {
    pub config: Value,
}

pub struct ConfigureResponse {
    pub diagnostics: Diagnostics,
}

#[async_trait]
pub trait Provider: Send + Sync {
    fn type_name(&self) -> &str;

    /// Must succeed before any handler can be created
    async fn configure(&mut self, ctx: Context, request: ConfigureRequest) -> ConfigureResponse;

    fn create_resource(&self, name: &str) -> Result<Box<dyn Resource>, ProviderError>;

    fn create_data_source(&self, name: &str) -> Result<Box<dyn DataSource>, ProviderError>;

    fn resource_names(&self) -> Vec<&'static str>;

    fn data_source_names(&self) -> Vec<&'static str>;
}
