//! Indexing service implementation.
//!
//! This module provides the service the pipeline uses to write and delete
//! documents. It owns the active `SearchClient`, which is installed once a
//! connection has been established and may be replaced on reconnect.
//!
//! # Locking
//!
//! The client slot is guarded by a single readers-writer lock. Writes and
//! deletes take the write lock for the whole remote call, so they are
//! serialized against each other and against client swaps even when messages
//! are handled concurrently. Health checks only take the read lock.

use std::sync::Arc;

use content_indexer_shared::IndexDocument;
use once_cell::sync::OnceCell;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::errors::SearchIndexError;
use crate::interfaces::SearchClient;
use crate::schema::{self, ReferenceSchema, SchemaHealth};
use crate::types::{ClusterHealth, DeleteResult, IndexResult};

/// The main service for interacting with the content index.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use content_indexer_repository::{AccessConfig, IndexingService, OpenSearchClient};
/// use content_indexer_shared::IndexDocument;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let service = IndexingService::new("ft");
/// let client = OpenSearchClient::new(&AccessConfig::new("http://localhost:9200"))?;
/// service.set_client(Arc::new(client)).await;
///
/// service.write_data("FTCom", "b7e1a2d8-5c8a-4c3e-9d39-2f3c1c9f2f10", &IndexDocument::new()).await?;
/// # Ok(())
/// # }
/// ```
pub struct IndexingService {
    client: RwLock<Option<Arc<dyn SearchClient>>>,
    index_name: String,
    reference_schema: OnceCell<ReferenceSchema>,
}

impl IndexingService {
    /// Create a service without a client. Every write or delete fails with
    /// `SearchIndexError::NotConnected` until `set_client` is called.
    pub fn new(index_name: impl Into<String>) -> Self {
        Self {
            client: RwLock::new(None),
            index_name: index_name.into(),
            reference_schema: OnceCell::new(),
        }
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Install or replace the active client.
    pub async fn set_client(&self, client: Arc<dyn SearchClient>) {
        let mut guard = self.client.write().await;
        *guard = Some(client);
    }

    pub async fn is_connected(&self) -> bool {
        self.client.read().await.is_some()
    }

    /// Index a document under `collection` with the given id.
    pub async fn write_data(
        &self,
        collection: &str,
        id: &str,
        document: &IndexDocument,
    ) -> Result<IndexResult, SearchIndexError> {
        let body: Value = serde_json::to_value(document)
            .map_err(|e| SearchIndexError::serialization(e.to_string()))?;

        let guard = self.client.write().await;
        let client = guard.as_ref().ok_or(SearchIndexError::NotConnected)?;
        client
            .index_document(&self.index_name, collection, id, body)
            .await
    }

    /// Delete the document stored under `collection` with the given id.
    pub async fn delete_data(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<DeleteResult, SearchIndexError> {
        let guard = self.client.write().await;
        let client = guard.as_ref().ok_or(SearchIndexError::NotConnected)?;
        client.delete_document(&self.index_name, collection, id).await
    }

    pub async fn get_cluster_health(&self) -> Result<ClusterHealth, SearchIndexError> {
        let guard = self.client.read().await;
        let client = guard.as_ref().ok_or(SearchIndexError::NotConnected)?;
        client.cluster_health().await
    }

    /// Compare the live index against the bundled reference schema.
    ///
    /// An incomplete reference is reported before the connection state, so a
    /// misconfigured index name shows up even while disconnected.
    pub async fn get_schema_health(&self) -> Result<SchemaHealth, SearchIndexError> {
        let reference_schema = self
            .reference_schema
            .get_or_try_init(schema::load_reference_schema)?;

        let Some(reference) = schema::reference_for(reference_schema, &self.index_name) else {
            return Ok(SchemaHealth::WrongReference);
        };

        let guard = self.client.read().await;
        let Some(client) = guard.as_ref() else {
            return Ok(SchemaHealth::NotConnected);
        };

        let live = client.get_index(&self.index_name).await?;
        Ok(schema::compare(live, reference))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IndexDefinition;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Mutex;

    /// Mock client for testing
    struct MockSearchClient {
        indexed: Mutex<Vec<(String, String, String, Value)>>,
        deleted: Mutex<Vec<(String, String, String)>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        delay: Duration,
        live_index: IndexDefinition,
    }

    impl MockSearchClient {
        fn new() -> Self {
            let reference = schema::load_reference_schema().unwrap();
            Self {
                indexed: Mutex::new(Vec::new()),
                deleted: Mutex::new(Vec::new()),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
                delay: Duration::ZERO,
                live_index: reference[schema::REFERENCE_INDEX_NAME].clone(),
            }
        }

        fn with_delay(delay: Duration) -> Self {
            Self {
                delay,
                ..Self::new()
            }
        }

        async fn track<T>(&self, value: T) -> T {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            value
        }
    }

    #[async_trait]
    impl SearchClient for MockSearchClient {
        async fn index_document(
            &self,
            index: &str,
            collection: &str,
            id: &str,
            body: Value,
        ) -> Result<IndexResult, SearchIndexError> {
            self.track(()).await;
            self.indexed.lock().await.push((
                index.to_string(),
                collection.to_string(),
                id.to_string(),
                body,
            ));
            Ok(IndexResult {
                index: index.to_string(),
                collection: collection.to_string(),
                id: id.to_string(),
                version: Some(1),
                created: true,
            })
        }

        async fn delete_document(
            &self,
            index: &str,
            collection: &str,
            id: &str,
        ) -> Result<DeleteResult, SearchIndexError> {
            self.track(()).await;
            self.deleted.lock().await.push((
                index.to_string(),
                collection.to_string(),
                id.to_string(),
            ));
            Ok(DeleteResult {
                index: index.to_string(),
                collection: collection.to_string(),
                id: id.to_string(),
                version: Some(2),
                found: true,
            })
        }

        async fn get_document(
            &self,
            _index: &str,
            _collection: &str,
            _id: &str,
        ) -> Result<Option<Value>, SearchIndexError> {
            Ok(None)
        }

        async fn cluster_health(&self) -> Result<ClusterHealth, SearchIndexError> {
            Ok(ClusterHealth {
                status: "green".to_string(),
                ..Default::default()
            })
        }

        async fn get_index(&self, _index: &str) -> Result<IndexDefinition, SearchIndexError> {
            Ok(self.live_index.clone())
        }
    }

    #[tokio::test]
    async fn test_write_without_client_fails() {
        let service = IndexingService::new("ft");

        let result = service
            .write_data("FTCom", "id-1", &IndexDocument::new())
            .await;

        assert!(matches!(result, Err(SearchIndexError::NotConnected)));
        assert!(!service.is_connected().await);
    }

    #[tokio::test]
    async fn test_delete_without_client_fails() {
        let service = IndexingService::new("ft");
        let result = service.delete_data("FTCom", "id-1").await;
        assert!(matches!(result, Err(SearchIndexError::NotConnected)));
    }

    #[tokio::test]
    async fn test_write_routes_to_index_and_collection() {
        let service = IndexingService::new("ft");
        let client = Arc::new(MockSearchClient::new());
        service.set_client(client.clone()).await;

        let mut doc = IndexDocument::new();
        doc.uid = Some("id-1".to_string());
        let result = service.write_data("FTBlogs", "id-1", &doc).await.unwrap();

        assert!(result.created);
        let indexed = client.indexed.lock().await;
        assert_eq!(indexed.len(), 1);
        assert_eq!(indexed[0].0, "ft");
        assert_eq!(indexed[0].1, "FTBlogs");
        assert_eq!(indexed[0].2, "id-1");
        assert_eq!(indexed[0].3["uid"], "id-1");
    }

    #[tokio::test]
    async fn test_delete_routes_to_index_and_collection() {
        let service = IndexingService::new("ft");
        let client = Arc::new(MockSearchClient::new());
        service.set_client(client.clone()).await;

        let result = service.delete_data("FTCom", "id-2").await.unwrap();

        assert!(result.found);
        let deleted = client.deleted.lock().await;
        assert_eq!(
            deleted[0],
            ("ft".to_string(), "FTCom".to_string(), "id-2".to_string())
        );
    }

    #[tokio::test]
    async fn test_set_client_replaces_previous_client() {
        let service = IndexingService::new("ft");
        let first = Arc::new(MockSearchClient::new());
        let second = Arc::new(MockSearchClient::new());

        service.set_client(first.clone()).await;
        service.set_client(second.clone()).await;
        service.delete_data("FTCom", "id").await.unwrap();

        assert!(first.deleted.lock().await.is_empty());
        assert_eq!(second.deleted.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_writes_are_serialized() {
        let service = Arc::new(IndexingService::new("ft"));
        let client = Arc::new(MockSearchClient::with_delay(Duration::from_millis(20)));
        service.set_client(client.clone()).await;

        let mut handles = Vec::new();
        for i in 0..5 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                let id = format!("id-{}", i);
                if i % 2 == 0 {
                    service
                        .write_data("FTCom", &id, &IndexDocument::new())
                        .await
                        .map(|_| ())
                } else {
                    service.delete_data("FTCom", &id).await.map(|_| ())
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(client.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cluster_health() {
        let service = IndexingService::new("ft");
        assert!(matches!(
            service.get_cluster_health().await,
            Err(SearchIndexError::NotConnected)
        ));

        service.set_client(Arc::new(MockSearchClient::new())).await;
        assert!(service.get_cluster_health().await.unwrap().is_green());
    }

    #[tokio::test]
    async fn test_schema_health_not_connected() {
        let service = IndexingService::new("ft");
        assert_eq!(
            service.get_schema_health().await.unwrap(),
            SchemaHealth::NotConnected
        );
    }

    #[tokio::test]
    async fn test_schema_health_wrong_reference() {
        let service = IndexingService::new("other-index");
        assert_eq!(
            service.get_schema_health().await.unwrap(),
            SchemaHealth::WrongReference
        );
    }

    #[tokio::test]
    async fn test_schema_health_ok_and_wrong_settings() {
        let service = IndexingService::new("ft");
        service.set_client(Arc::new(MockSearchClient::new())).await;
        assert_eq!(service.get_schema_health().await.unwrap(), SchemaHealth::Ok);

        let mut drifted = MockSearchClient::new();
        drifted.live_index.settings = Some(serde_json::json!({"index": {}}));
        service.set_client(Arc::new(drifted)).await;
        assert_eq!(
            service.get_schema_health().await.unwrap(),
            SchemaHealth::WrongSettings
        );
    }
}
