//! Kafka consumer implementation for the content indexer.
//!
//! Consumes content events from a Kafka topic and hands them to a
//! `MessageProcessor`. Offsets are committed once a message has been
//! dispatched, so a message is processed at most once.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use rdkafka::{
    config::ClientConfig,
    consumer::{CommitMode, Consumer, StreamConsumer},
    message::{BorrowedMessage, Headers, Message as KafkaMessage},
};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn};

use crate::consumer::messages::QueueMessage;
use crate::consumer::{MessageConsumer, MessageProcessor};
use crate::errors::IngestError;

/// Timeout of the metadata request used by the connectivity check.
const METADATA_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings for the consumer.
#[derive(Debug, Clone)]
pub struct KafkaConsumerConfig {
    /// Kafka broker addresses (comma-separated)
    pub brokers: String,
    pub group_id: String,
    pub topic: String,
    /// Handle messages concurrently instead of one after the other.
    pub concurrent_processing: bool,
}

/// Kafka consumer for content events.
pub struct KafkaConsumer {
    consumer: Arc<StreamConsumer>,
    topic: String,
    concurrent_processing: bool,
    shutdown_tx: watch::Sender<bool>,
}

impl KafkaConsumer {
    /// Create a new Kafka consumer.
    ///
    /// No connection is made until `start` or `connectivity_check` is called.
    pub fn new(config: KafkaConsumerConfig) -> Result<Self, IngestError> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("group.id", &config.group_id)
            .set("enable.auto.commit", "false")
            .set("auto.offset.reset", "latest")
            .set("session.timeout.ms", "6000")
            .create()
            .map_err(|e| IngestError::kafka(e.to_string()))?;

        info!(
            brokers = %config.brokers,
            group_id = %config.group_id,
            topic = %config.topic,
            concurrent_processing = config.concurrent_processing,
            "Created Kafka consumer"
        );

        let (shutdown_tx, _) = watch::channel(false);

        Ok(Self {
            consumer: Arc::new(consumer),
            topic: config.topic,
            concurrent_processing: config.concurrent_processing,
            shutdown_tx,
        })
    }

    /// Copy headers and payload out of the broker's buffer.
    fn to_queue_message(msg: &BorrowedMessage<'_>) -> QueueMessage {
        let mut message = QueueMessage::default();

        if let Some(headers) = msg.headers() {
            for header in headers.iter() {
                let value = header
                    .value
                    .map(|v| String::from_utf8_lossy(v).into_owned())
                    .unwrap_or_default();
                message.headers.insert(header.key.to_string(), value);
            }
        }

        if let Some(payload) = msg.payload() {
            message.body = String::from_utf8_lossy(payload).into_owned();
        }

        message
    }

    fn commit(&self, msg: &BorrowedMessage<'_>) {
        if let Err(e) = self.consumer.commit_message(msg, CommitMode::Async) {
            error!(
                topic = %msg.topic(),
                partition = msg.partition(),
                offset = msg.offset(),
                error = %e,
                "Failed to commit offset"
            );
        }
    }
}

#[async_trait]
impl MessageConsumer for KafkaConsumer {
    #[instrument(skip(self, processor), fields(topic = %self.topic))]
    async fn start(&self, processor: Arc<dyn MessageProcessor>) -> Result<(), IngestError> {
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        if *shutdown_rx.borrow_and_update() {
            info!("Consumer stopped before start");
            return Ok(());
        }

        self.consumer
            .subscribe(&[self.topic.as_str()])
            .map_err(|e| IngestError::kafka(e.to_string()))?;
        info!("Subscribed to Kafka topic");

        let mut message_stream = self.consumer.stream();
        let mut in_flight: JoinSet<()> = JoinSet::new();

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Consumer received shutdown signal");
                    break;
                }
                Some(result) = in_flight.join_next(), if !in_flight.is_empty() => {
                    if let Err(e) = result {
                        error!(error = %e, "Message handler task failed");
                    }
                }
                message = message_stream.next() => {
                    match message {
                        Some(Ok(msg)) => {
                            debug!(
                                partition = msg.partition(),
                                offset = msg.offset(),
                                "Received message from Kafka"
                            );
                            let queue_message = Self::to_queue_message(&msg);

                            if self.concurrent_processing {
                                let processor = processor.clone();
                                in_flight.spawn(async move {
                                    processor.process(queue_message).await;
                                });
                            } else {
                                processor.process(queue_message).await;
                            }

                            self.commit(&msg);
                        }
                        Some(Err(e)) => {
                            error!(error = %e, "Kafka error");
                        }
                        None => {
                            warn!("Kafka stream ended");
                            break;
                        }
                    }
                }
            }
        }

        // let in-flight messages finish
        while let Some(result) = in_flight.join_next().await {
            if let Err(e) = result {
                error!(error = %e, "Message handler task failed");
            }
        }

        self.consumer.unsubscribe();
        info!("Consumer stopped");
        Ok(())
    }

    fn stop(&self) {
        self.shutdown_tx.send_replace(true);
    }

    async fn connectivity_check(&self) -> Result<String, IngestError> {
        let consumer = self.consumer.clone();
        let topic = self.topic.clone();

        tokio::task::spawn_blocking(move || {
            let metadata = consumer.fetch_metadata(Some(topic.as_str()), METADATA_TIMEOUT)?;
            let found = metadata
                .topics()
                .iter()
                .any(|t| t.name() == topic && t.error().is_none());

            if found {
                Ok("Successfully connected to Kafka".to_string())
            } else {
                Err(IngestError::kafka(format!("Topic {} is not available", topic)))
            }
        })
        .await
        .map_err(|e| IngestError::task(e.to_string()))?
    }
}
