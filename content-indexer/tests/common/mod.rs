//! Shared mocks for the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use content_indexer::concept::MockConceptReader;
use content_indexer::config::AppConfig;
use content_indexer::consumer::{MessageConsumer, MessageProcessor, QueueMessage};
use content_indexer::errors::IngestError;
use content_indexer::processor::{DocumentMapper, MessageHandler};
use content_indexer_repository::{
    ClientConnector, ClusterHealth, DeleteResult, IndexDefinition, IndexResult, IndexingService,
    SearchClient, SearchIndexError,
};
use serde_json::Value;
use tokio::sync::Notify;

pub const METHODE_AUTHORITY: &str = "http://api.ft.com/system/FTCOM-METHODE";
pub const WORDPRESS_AUTHORITY: &str = "http://api.ft.com/system/FT-LABS-WP";
pub const ABOUT: &str = "http://www.ft.com/ontology/annotation/about";
pub const PERSON_TYPE: &str = "http://www.ft.com/ontology/person/Person";

#[derive(Debug, Clone, PartialEq)]
pub struct WrittenDocument {
    pub index: String,
    pub collection: String,
    pub id: String,
    pub body: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedDocument {
    pub index: String,
    pub collection: String,
    pub id: String,
}

/// Search client that records every call.
#[derive(Default)]
pub struct MockSearchClient {
    pub writes: Mutex<Vec<WrittenDocument>>,
    pub deletes: Mutex<Vec<DeletedDocument>>,
}

impl MockSearchClient {
    pub fn writes(&self) -> Vec<WrittenDocument> {
        self.writes.lock().unwrap().clone()
    }

    pub fn deletes(&self) -> Vec<DeletedDocument> {
        self.deletes.lock().unwrap().clone()
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
        self.writes.lock().unwrap().push(WrittenDocument {
            index: index.to_string(),
            collection: collection.to_string(),
            id: id.to_string(),
            body,
        });
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
        self.deletes.lock().unwrap().push(DeletedDocument {
            index: index.to_string(),
            collection: collection.to_string(),
            id: id.to_string(),
        });
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
            cluster_name: "test".to_string(),
            status: "green".to_string(),
            ..Default::default()
        })
    }

    async fn get_index(&self, _index: &str) -> Result<IndexDefinition, SearchIndexError> {
        Ok(IndexDefinition::default())
    }
}

/// Fails the first `failures` attempts, then hands out the shared client.
pub struct MockConnector {
    pub client: Arc<MockSearchClient>,
    pub failures: usize,
    pub attempts: AtomicUsize,
}

impl MockConnector {
    pub fn new(client: Arc<MockSearchClient>, failures: usize) -> Self {
        Self {
            client,
            failures,
            attempts: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ClientConnector for MockConnector {
    async fn connect(&self) -> Result<Arc<dyn SearchClient>, SearchIndexError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < self.failures {
            return Err(SearchIndexError::connection("connection refused"));
        }
        Ok(self.client.clone())
    }
}

/// Delivers a fixed list of messages, then blocks until stopped.
#[derive(Default)]
pub struct MockConsumer {
    messages: Mutex<Vec<QueueMessage>>,
    pub delivered: AtomicUsize,
    stopped: AtomicBool,
    notify: Notify,
}

impl MockConsumer {
    pub fn new(messages: Vec<QueueMessage>) -> Self {
        Self {
            messages: Mutex::new(messages),
            ..Default::default()
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageConsumer for MockConsumer {
    async fn start(&self, processor: Arc<dyn MessageProcessor>) -> Result<(), IngestError> {
        let messages: Vec<QueueMessage> = self.messages.lock().unwrap().drain(..).collect();
        for message in messages {
            processor.process(message).await;
            self.delivered.fetch_add(1, Ordering::SeqCst);
        }

        while !self.stopped.load(Ordering::SeqCst) {
            self.notify.notified().await;
        }
        Ok(())
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
        self.notify.notify_one();
    }

    async fn connectivity_check(&self) -> Result<String, IngestError> {
        Ok("Successfully connected to Kafka".to_string())
    }
}

/// Message handler over a connected mock client.
pub async fn connected_handler(
    concepts: Arc<MockConceptReader>,
) -> (MessageHandler, Arc<MockSearchClient>) {
    let client = Arc::new(MockSearchClient::default());
    let indexing_service = Arc::new(IndexingService::new("ft"));
    indexing_service.set_client(client.clone()).await;
    (handler(concepts, indexing_service), client)
}

pub fn handler(
    concepts: Arc<MockConceptReader>,
    indexing_service: Arc<IndexingService>,
) -> MessageHandler {
    let app_config = Arc::new(AppConfig::embedded().unwrap());
    let mapper = DocumentMapper::new(app_config.clone(), concepts, "https://api.ft.com/");
    MessageHandler::new(app_config, mapper, indexing_service)
}

/// Poll `condition` until it holds or two seconds pass.
pub async fn wait_until<F: Fn() -> bool>(condition: F) {
    for _ in 0..400 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached");
}
