//! Lifecycle plumbing between the host runtime and the handlers

pub mod context;
pub mod data_source;
pub mod diagnostics;
pub mod provider;
pub mod resource;

pub use context::Context;
pub use data_source::{DataSource, ModelDataSource, ReadDataSourceRequest, ReadDataSourceResponse};
pub use diagnostics::{Diagnostic, DiagnosticSeverity, Diagnostics};
pub use provider::{ConfigureRequest, ConfigureResponse, Provider, ProviderError};
pub use resource::{
    CreateResourceRequest, CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ModelResource, ReadResourceRequest,
    ReadResourceResponse, Resource, UpdateResourceRequest, UpdateResourceResponse,
};
