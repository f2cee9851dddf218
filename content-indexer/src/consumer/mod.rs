//! Consumer module for the content indexer.
//!
//! Provides the Kafka consumer that delivers content events to a processor.

mod kafka_consumer;
mod messages;

pub use kafka_consumer::{KafkaConsumer, KafkaConsumerConfig};
pub use messages::{
    QueueMessage, ARTICLE_CONTENT_TYPE_MARKER, AUDIO_CONTENT_TYPE_MARKER, CONTENT_TYPE_HEADER,
    ORIGIN_SYSTEM_ID_HEADER, SYNTHETIC_REQUEST_PREFIX, TRANSACTION_ID_HEADER,
};

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::IngestError;

/// Handles one message at a time. Errors are the processor's own concern.
#[async_trait]
pub trait MessageProcessor: Send + Sync {
    async fn process(&self, message: QueueMessage);
}

/// A source of queue messages.
#[async_trait]
pub trait MessageConsumer: Send + Sync {
    /// Deliver messages to `processor` until `stop` is called.
    async fn start(&self, processor: Arc<dyn MessageProcessor>) -> Result<(), IngestError>;

    /// Ask a running `start` to return. Safe to call at any time, any number of times.
    fn stop(&self);

    /// Check that the broker and topic are reachable.
    async fn connectivity_check(&self) -> Result<String, IngestError>;
}
