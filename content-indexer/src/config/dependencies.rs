//! Dependency initialization and wiring for the content indexer.

use std::sync::Arc;

use content_indexer_repository::{IndexingService, OpenSearchConnector};
use tracing::info;

use crate::concept::{ConceptReader, ConcordanceApiClient};
use crate::config::{AppConfig, Settings};
use crate::consumer::{KafkaConsumer, KafkaConsumerConfig, MessageConsumer};
use crate::health::HealthService;
use crate::orchestrator::Orchestrator;
use crate::processor::{DocumentMapper, MessageHandler};
use crate::IndexingError;

/// Container for all initialized dependencies.
pub struct Dependencies {
    pub settings: Settings,
    /// Drives the search engine connection and the consumer.
    pub orchestrator: Arc<Orchestrator>,
    pub health: Arc<HealthService>,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// Nothing here connects to the search engine; the orchestrator does that
    /// in the background once started. See [`Settings::from_env`] for the
    /// variables read.
    pub fn new() -> Result<Self, IndexingError> {
        let settings = Settings::from_env()?;

        info!(
            es_endpoint = %settings.es_endpoint,
            es_index = %settings.es_index,
            kafka_broker = %settings.kafka_broker,
            kafka_consumer_group = %settings.kafka_consumer_group,
            kafka_topic = %settings.kafka_topic,
            concordances_endpoint = %settings.concordances_endpoint,
            retry_interval_secs = settings.es_connect_retry_interval.as_secs(),
            "Initializing dependencies"
        );

        let app_config = Arc::new(AppConfig::embedded()?);

        let concept_reader: Arc<dyn ConceptReader> =
            Arc::new(ConcordanceApiClient::new(&settings.concordances_endpoint));
        let indexing_service = Arc::new(IndexingService::new(settings.es_index.clone()));

        let mapper = DocumentMapper::new(
            app_config.clone(),
            concept_reader.clone(),
            &settings.base_api_url,
        );
        let handler = MessageHandler::new(app_config, mapper, indexing_service.clone());

        let consumer: Arc<dyn MessageConsumer> = Arc::new(
            KafkaConsumer::new(KafkaConsumerConfig {
                brokers: settings.kafka_broker.clone(),
                group_id: settings.kafka_consumer_group.clone(),
                topic: settings.kafka_topic.clone(),
                concurrent_processing: settings.kafka_concurrent_processing,
            })
            .map_err(|e| {
                IndexingError::config(format!("Failed to create Kafka consumer: {}", e))
            })?,
        );

        info!("Kafka consumer created");

        let connector = Arc::new(OpenSearchConnector::new(settings.access_config()));

        let orchestrator = Arc::new(Orchestrator::with_retry_interval(
            connector,
            consumer.clone(),
            Arc::new(handler),
            indexing_service.clone(),
            settings.es_connect_retry_interval,
        ));

        let health = Arc::new(HealthService::new(
            settings.app_system_code.clone(),
            settings.app_name.clone(),
            indexing_service,
            consumer,
            concept_reader,
        ));

        Ok(Self {
            settings,
            orchestrator,
            health,
        })
    }
}
