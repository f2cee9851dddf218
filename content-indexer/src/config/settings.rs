//! Runtime settings read from the environment.

use std::env;
use std::time::Duration;

use content_indexer_repository::AccessConfig;

use crate::IndexingError;

const DEFAULT_APP_SYSTEM_CODE: &str = "content-rw-elasticsearch";
const DEFAULT_APP_NAME: &str = "content-rw-elasticsearch";
const DEFAULT_APP_PORT: u16 = 8080;
const DEFAULT_AWS_REGION: &str = "eu-west-1";
const DEFAULT_ES_ENDPOINT: &str = "http://localhost:9200";
const DEFAULT_ES_INDEX: &str = "ft";
const DEFAULT_KAFKA_BROKER: &str = "localhost:9092";
const DEFAULT_KAFKA_CONSUMER_GROUP: &str = "default-consumer-group";
const DEFAULT_KAFKA_TOPIC: &str = "CombinedPostPublicationEvents";
const DEFAULT_CONCORDANCES_ENDPOINT: &str = "http://public-concordances-api:8080";
const DEFAULT_BASE_API_URL: &str = "https://api.ft.com/";

/// Default interval between search engine connection attempts.
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 60;

/// Settings for every external collaborator of the indexer.
#[derive(Debug, Clone)]
pub struct Settings {
    pub app_system_code: String,
    pub app_name: String,
    pub app_port: u16,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub aws_region: String,
    pub es_endpoint: String,
    pub es_index: String,
    pub kafka_broker: String,
    pub kafka_consumer_group: String,
    pub kafka_topic: String,
    pub kafka_concurrent_processing: bool,
    pub concordances_endpoint: String,
    pub base_api_url: String,
    pub es_connect_retry_interval: Duration,
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `APP_SYSTEM_CODE`, `APP_NAME`: service identity reported by health checks
    /// - `APP_PORT`: port of the health endpoints (default: 8080)
    /// - `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`: request signing keys (default: unsigned)
    /// - `AWS_REGION`: signing region (default: eu-west-1)
    /// - `ELASTICSEARCH_SAPI_ENDPOINT`: search engine endpoint (default: http://localhost:9200)
    /// - `ELASTICSEARCH_SAPI_INDEX`: index name (default: ft)
    /// - `KAFKA_BROKER`: Kafka broker addresses (default: localhost:9092)
    /// - `KAFKA_CONSUMER_GROUP`: consumer group (default: default-consumer-group)
    /// - `KAFKA_TOPIC`: topic to consume (default: CombinedPostPublicationEvents)
    /// - `KAFKA_CONCURRENT_PROCESSING`: handle messages concurrently (default: false)
    /// - `PUBLIC_CONCORDANCES_ENDPOINT`: concordance service base URL
    /// - `BASE_API_URL`: base of the `model_api_url` field (default: https://api.ft.com/)
    /// - `ES_CONNECT_RETRY_INTERVAL_SECS`: delay between connection attempts (default: 60)
    pub fn from_env() -> Result<Self, IndexingError> {
        let app_port = match env::var("APP_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .map_err(|e| IndexingError::config(format!("Invalid APP_PORT {}: {}", value, e)))?,
            Err(_) => DEFAULT_APP_PORT,
        };

        let kafka_concurrent_processing = match env::var("KAFKA_CONCURRENT_PROCESSING") {
            Ok(value) => parse_bool(&value).ok_or_else(|| {
                IndexingError::config(format!("Invalid KAFKA_CONCURRENT_PROCESSING {}", value))
            })?,
            Err(_) => false,
        };

        let retry_interval = env::var("ES_CONNECT_RETRY_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_INTERVAL_SECS);

        Ok(Self {
            app_system_code: var_or("APP_SYSTEM_CODE", DEFAULT_APP_SYSTEM_CODE),
            app_name: var_or("APP_NAME", DEFAULT_APP_NAME),
            app_port,
            aws_access_key_id: var_or("AWS_ACCESS_KEY_ID", ""),
            aws_secret_access_key: var_or("AWS_SECRET_ACCESS_KEY", ""),
            aws_region: var_or("AWS_REGION", DEFAULT_AWS_REGION),
            es_endpoint: var_or("ELASTICSEARCH_SAPI_ENDPOINT", DEFAULT_ES_ENDPOINT),
            es_index: var_or("ELASTICSEARCH_SAPI_INDEX", DEFAULT_ES_INDEX),
            kafka_broker: var_or("KAFKA_BROKER", DEFAULT_KAFKA_BROKER),
            kafka_consumer_group: var_or("KAFKA_CONSUMER_GROUP", DEFAULT_KAFKA_CONSUMER_GROUP),
            kafka_topic: var_or("KAFKA_TOPIC", DEFAULT_KAFKA_TOPIC),
            kafka_concurrent_processing,
            concordances_endpoint: var_or(
                "PUBLIC_CONCORDANCES_ENDPOINT",
                DEFAULT_CONCORDANCES_ENDPOINT,
            ),
            base_api_url: var_or("BASE_API_URL", DEFAULT_BASE_API_URL),
            es_connect_retry_interval: Duration::from_secs(retry_interval),
        })
    }

    /// Search engine access derived from these settings.
    pub fn access_config(&self) -> AccessConfig {
        AccessConfig::new(self.es_endpoint.clone()).with_credentials(
            self.aws_access_key_id.clone(),
            self.aws_secret_access_key.clone(),
            self.aws_region.clone(),
        )
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" | "" => Some(false),
        _ => None,
    }
}
