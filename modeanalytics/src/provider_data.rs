//! Provider data structure passed to resources and data sources

use crate::api::Client;

#[derive(Clone)]
pub struct ModeAnalyticsProviderData {
    pub client: Client,
}

impl ModeAnalyticsProviderData {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}
