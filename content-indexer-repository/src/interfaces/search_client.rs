//! Search client trait definitions.
//!
//! Documents are addressed by index, collection and id. The collection is the
//! per-content-type routing name of the legacy index (for example `FTCom` for
//! articles), so every document path has the shape `/{index}/{collection}/{id}`.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::SearchIndexError;
use crate::types::{ClusterHealth, DeleteResult, IndexDefinition, IndexResult};

/// Abstracts the underlying search engine (OpenSearch, Elasticsearch, etc.).
///
/// Implementations are installed into `IndexingService` once a connection has
/// been established, and can be replaced by in-memory fakes in tests.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Create or replace a document.
    async fn index_document(
        &self,
        index: &str,
        collection: &str,
        id: &str,
        body: Value,
    ) -> Result<IndexResult, SearchIndexError>;

    /// Delete a document. A missing document is reported through
    /// `DeleteResult::found`, not as an error.
    async fn delete_document(
        &self,
        index: &str,
        collection: &str,
        id: &str,
    ) -> Result<DeleteResult, SearchIndexError>;

    /// Fetch the source of a document, `None` when it does not exist.
    async fn get_document(
        &self,
        index: &str,
        collection: &str,
        id: &str,
    ) -> Result<Option<Value>, SearchIndexError>;

    /// Current cluster health as reported by the engine.
    async fn cluster_health(&self) -> Result<ClusterHealth, SearchIndexError>;

    /// Live settings and mappings of an index.
    async fn get_index(&self, index: &str) -> Result<IndexDefinition, SearchIndexError>;
}

/// Builds a ready-to-use `SearchClient`.
///
/// A successful `connect` means the engine answered; the orchestrator retries
/// failed attempts on its own schedule.
#[async_trait]
pub trait ClientConnector: Send + Sync {
    async fn connect(&self) -> Result<Arc<dyn SearchClient>, SearchIndexError>;
}
