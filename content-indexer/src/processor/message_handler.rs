//! Per-message pipeline: classify, map, then write or delete.

use std::sync::Arc;

use async_trait::async_trait;
use content_indexer_repository::IndexingService;
use content_indexer_shared::RawEvent;
use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::{error, info, instrument};

use crate::config::{AppConfig, ContentType};
use crate::consumer::{
    MessageProcessor, QueueMessage, ORIGIN_SYSTEM_ID_HEADER, SYNTHETIC_REQUEST_PREFIX,
    TRANSACTION_ID_HEADER,
};
use crate::processor::classifier::{Classification, ContentClassifier};
use crate::processor::mapper::DocumentMapper;

const APP_TID_SUFFIX: &str = "content-rw-elasticsearch";

/// Content kinds that are indexed. The empty string covers legacy content.
const ALLOWED_TYPES: &[&str] = &["Article", "Video", "MediaResource", "Audio", ""];

const WRITE_MONITORING_EVENT: &str = "ContentWriteElasticsearch";
const DELETE_MONITORING_EVENT: &str = "ContentDeleteElasticsearch";

/// Why a message was not indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    Synthetic,
    InvalidBody,
    UnsupportedType,
    Unclassified,
    NoContent,
}

/// What happened to a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleOutcome {
    Ignored(IgnoreReason),
    Deleted,
    Written,
    Failed,
}

/// Generate a transaction id for messages that arrive without one.
pub fn generate_transaction_id() -> String {
    let random: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(10)
        .map(char::from)
        .collect();
    format!("tid_{}_{}", random, APP_TID_SUFFIX)
}

/// Turns queue messages into index writes and deletes.
///
/// Failures are logged and end the handling of that message only. Nothing is
/// retried.
pub struct MessageHandler {
    app_config: Arc<AppConfig>,
    classifier: ContentClassifier,
    mapper: DocumentMapper,
    indexing_service: Arc<IndexingService>,
}

impl MessageHandler {
    pub fn new(
        app_config: Arc<AppConfig>,
        mapper: DocumentMapper,
        indexing_service: Arc<IndexingService>,
    ) -> Self {
        Self {
            classifier: ContentClassifier::new(&app_config),
            app_config,
            mapper,
            indexing_service,
        }
    }

    #[instrument(skip(self, message), fields(transaction_id))]
    pub async fn handle(&self, message: &QueueMessage) -> HandleOutcome {
        let tid = match message.header(TRANSACTION_ID_HEADER) {
            Some(tid) if !tid.is_empty() => tid.to_string(),
            _ => {
                let tid = generate_transaction_id();
                info!(transaction_id = %tid, "Generated tid");
                tid
            }
        };
        tracing::Span::current().record("transaction_id", tid.as_str());

        if tid.contains(SYNTHETIC_REQUEST_PREFIX) {
            info!(transaction_id = %tid, "Ignoring synthetic message");
            return HandleOutcome::Ignored(IgnoreReason::Synthetic);
        }

        let mut event: RawEvent = match serde_json::from_str(&message.body) {
            Ok(event) => event,
            Err(e) => {
                error!(transaction_id = %tid, error = %e, "Cannot unmarshal message body");
                return HandleOutcome::Ignored(IgnoreReason::InvalidBody);
            }
        };
        event.normalize_body();

        if !ALLOWED_TYPES.contains(&event.content.content_type.as_str()) {
            info!(
                transaction_id = %tid,
                content_type = %event.content.content_type,
                "Ignoring message of unsupported type"
            );
            return HandleOutcome::Ignored(IgnoreReason::UnsupportedType);
        }

        let uuid = event.uuid.clone();
        info!(transaction_id = %tid, uuid = %uuid, "Processing combined post publication event");

        let content_type = match self.classifier.classify(message, &event.content) {
            Classification::Typed(content_type) => Some(content_type),
            Classification::InternalAuthoring => None,
            Classification::Unclassified => {
                error!(
                    transaction_id = %tid,
                    uuid = %uuid,
                    origin = message.header(ORIGIN_SYSTEM_ID_HEADER).unwrap_or_default(),
                    "Failed to index content. Could not infer type of content"
                );
                return HandleOutcome::Ignored(IgnoreReason::Unclassified);
            }
        };

        // a type-less delete has no collection to delete from
        if event.is_marked_deleted() {
            if let Some(content_type) = content_type {
                return self.delete(&tid, &uuid, content_type).await;
            }
        }

        let content_type = match content_type {
            Some(content_type) if !event.content.uuid.is_empty() => content_type,
            _ => {
                info!(transaction_id = %tid, uuid = %uuid, "Ignoring message with no content");
                return HandleOutcome::Ignored(IgnoreReason::NoContent);
            }
        };

        let document = self.mapper.to_index_document(&event, content_type, &tid).await;
        let collection = self.app_config.content_type_metadata(content_type).collection;

        match self
            .indexing_service
            .write_data(&collection, &uuid, &document)
            .await
        {
            Ok(_) => {
                info!(
                    event = WRITE_MONITORING_EVENT,
                    transaction_id = %tid,
                    uuid = %uuid,
                    content_type = %content_type,
                    collection = %collection,
                    "Successfully saved"
                );
                HandleOutcome::Written
            }
            Err(e) => {
                error!(
                    transaction_id = %tid,
                    uuid = %uuid,
                    collection = %collection,
                    error = %e,
                    "Failed to index content"
                );
                HandleOutcome::Failed
            }
        }
    }

    async fn delete(&self, tid: &str, uuid: &str, content_type: ContentType) -> HandleOutcome {
        let collection = self.app_config.content_type_metadata(content_type).collection;

        match self.indexing_service.delete_data(&collection, uuid).await {
            Ok(result) => {
                info!(
                    event = DELETE_MONITORING_EVENT,
                    transaction_id = %tid,
                    uuid = %uuid,
                    content_type = %content_type,
                    collection = %collection,
                    found = result.found,
                    "Successfully deleted"
                );
                HandleOutcome::Deleted
            }
            Err(e) => {
                error!(
                    transaction_id = %tid,
                    uuid = %uuid,
                    collection = %collection,
                    error = %e,
                    "Failed to delete indexed content"
                );
                HandleOutcome::Failed
            }
        }
    }
}

#[async_trait]
impl MessageProcessor for MessageHandler {
    async fn process(&self, message: QueueMessage) {
        self.handle(&message).await;
    }
}
