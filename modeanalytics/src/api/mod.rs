pub mod client;
pub mod collections;
pub mod common;
pub mod data_sources;
pub mod deletion;
pub mod error;
pub mod groups;
pub mod memberships;
pub mod permissions;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use client::{ApiRequest, Client, ClientConfig, RetryConfig};
pub use deletion::{collection_listing_url, is_nested_collection_item, DeletionConfig};
pub use error::ApiError;
pub use transport::{Credentials, TransportConfig};
