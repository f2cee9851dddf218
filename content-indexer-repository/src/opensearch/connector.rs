use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::AccessConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::{ClientConnector, SearchClient};
use crate::opensearch::OpenSearchClient;

/// Builds `OpenSearchClient`s and checks that the engine answers before
/// handing them out.
pub struct OpenSearchConnector {
    config: AccessConfig,
}

impl OpenSearchConnector {
    pub fn new(config: AccessConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ClientConnector for OpenSearchConnector {
    async fn connect(&self) -> Result<Arc<dyn SearchClient>, SearchIndexError> {
        let client = OpenSearchClient::new(&self.config)?;
        client.ping().await?;

        info!(endpoint = %self.config.endpoint_url(), "Connected to search engine");
        Ok(Arc::new(client))
    }
}
