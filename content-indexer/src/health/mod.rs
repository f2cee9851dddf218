//! Operational health endpoints.
//!
//! - `/__health`: every check with its outcome
//! - `/__health-details`: raw cluster health from the search engine
//! - `/__gtg`: 200 when every check passes, 503 otherwise
//! - `/__build-info`: name and version of the running binary

pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use chrono::Utc;
use content_indexer_repository::IndexingService;
use serde::Serialize;
use tracing::info;

use crate::concept::ConceptReader;
use crate::consumer::MessageConsumer;
use crate::IndexingError;

const PANIC_GUIDE: &str = "https://runbooks.in.ft.com/content-rw-elasticsearch";
const SCHEMA_VERSION: u8 = 1;

/// Outcome of a single health check.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub id: String,
    pub name: String,
    pub ok: bool,
    pub severity: u8,
    pub business_impact: String,
    pub technical_summary: String,
    pub panic_guide: String,
    pub check_output: String,
    pub last_updated: String,
}

/// Body of `/__health`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub schema_version: u8,
    pub system_code: String,
    pub name: String,
    pub description: String,
    pub ok: bool,
    pub checks: Vec<CheckResult>,
}

/// Static description of a check.
struct CheckSpec {
    id: &'static str,
    name: &'static str,
    severity: u8,
    business_impact: &'static str,
    technical_summary: &'static str,
}

impl CheckSpec {
    fn result(&self, outcome: Result<String, String>) -> CheckResult {
        let (ok, check_output) = match outcome {
            Ok(output) => (true, output),
            Err(output) => (false, output),
        };

        CheckResult {
            id: self.id.to_string(),
            name: self.name.to_string(),
            ok,
            severity: self.severity,
            business_impact: self.business_impact.to_string(),
            technical_summary: self.technical_summary.to_string(),
            panic_guide: PANIC_GUIDE.to_string(),
            check_output,
            last_updated: Utc::now().to_rfc3339(),
        }
    }
}

const CLUSTER_HEALTH_CHECK: CheckSpec = CheckSpec {
    id: "elasticsearch-cluster-health",
    name: "Check Elasticsearch cluster health",
    severity: 2,
    business_impact: "Full or partial degradation in serving requests from Elasticsearch",
    technical_summary: "Elasticsearch cluster is not healthy. Details on /__health-details",
};

const CONNECTIVITY_CHECK: CheckSpec = CheckSpec {
    id: "elasticsearch-connectivity",
    name: "Check connectivity to the Elasticsearch cluster",
    severity: 1,
    business_impact: "Content published will not be indexed",
    technical_summary: "Connection to Elasticsearch cluster could not be created. Please check your AWS credentials.",
};

const SCHEMA_CHECK: CheckSpec = CheckSpec {
    id: "elasticsearch-schema",
    name: "Check Elasticsearch mapping",
    severity: 1,
    business_impact: "Search results may be inconsistent",
    technical_summary: "Elasticsearch mapping does not match the expected mapping. Please check index against the reference schema.",
};

const KAFKA_CHECK: CheckSpec = CheckSpec {
    id: "kafka-connectivity",
    name: "Check connectivity to Kafka",
    severity: 1,
    business_impact: "Content published will not be indexed",
    technical_summary: "Kafka is not reachable or the topic is missing",
};

const CONCORDANCE_CHECK: CheckSpec = CheckSpec {
    id: "concordance-api",
    name: "Check connectivity to the public concordances API",
    severity: 2,
    business_impact: "Indexed content will miss annotation facets",
    technical_summary: "The concordances API is not reachable",
};

/// Runs health checks against every collaborator.
pub struct HealthService {
    system_code: String,
    name: String,
    indexing_service: Arc<IndexingService>,
    consumer: Arc<dyn MessageConsumer>,
    concept_reader: Arc<dyn ConceptReader>,
}

impl HealthService {
    pub fn new(
        system_code: impl Into<String>,
        name: impl Into<String>,
        indexing_service: Arc<IndexingService>,
        consumer: Arc<dyn MessageConsumer>,
        concept_reader: Arc<dyn ConceptReader>,
    ) -> Self {
        Self {
            system_code: system_code.into(),
            name: name.into(),
            indexing_service,
            consumer,
            concept_reader,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn indexing_service(&self) -> &Arc<IndexingService> {
        &self.indexing_service
    }

    pub async fn cluster_health_check(&self) -> CheckResult {
        let outcome = match self.indexing_service.get_cluster_health().await {
            Ok(health) if health.is_green() => Ok("Cluster is healthy".to_string()),
            Ok(health) => Err(format!("Cluster is not healthy: cluster is {}", health.status)),
            Err(e) => Err(format!("Cluster is not healthy: {}", e)),
        };
        CLUSTER_HEALTH_CHECK.result(outcome)
    }

    pub async fn connectivity_check(&self) -> CheckResult {
        let outcome = match self.indexing_service.get_cluster_health().await {
            Ok(_) => Ok("Successfully connected to the cluster".to_string()),
            Err(e) => Err(format!("Could not connect to elasticsearch: {}", e)),
        };
        CONNECTIVITY_CHECK.result(outcome)
    }

    pub async fn schema_check(&self) -> CheckResult {
        let outcome = match self.indexing_service.get_schema_health().await {
            Ok(status) if status.is_ok() => Ok("Schema is healthy".to_string()),
            Ok(status) => Err(format!("Schema is not healthy: {}", status)),
            Err(e) => Err(format!("Schema is not healthy: {}", e)),
        };
        SCHEMA_CHECK.result(outcome)
    }

    pub async fn kafka_check(&self) -> CheckResult {
        let outcome = self
            .consumer
            .connectivity_check()
            .await
            .map_err(|e| e.to_string());
        KAFKA_CHECK.result(outcome)
    }

    pub async fn concordance_check(&self) -> CheckResult {
        let outcome = self
            .concept_reader
            .health_check()
            .await
            .map_err(|e| e.to_string());
        CONCORDANCE_CHECK.result(outcome)
    }

    pub async fn checks(&self) -> Vec<CheckResult> {
        let (cluster, connectivity, schema, kafka, concordance) = tokio::join!(
            self.cluster_health_check(),
            self.connectivity_check(),
            self.schema_check(),
            self.kafka_check(),
            self.concordance_check(),
        );
        vec![cluster, connectivity, schema, kafka, concordance]
    }

    pub async fn report(&self) -> HealthReport {
        let checks = self.checks().await;
        HealthReport {
            schema_version: SCHEMA_VERSION,
            system_code: self.system_code.clone(),
            name: self.name.clone(),
            description: "Indexes published content into the search engine".to_string(),
            ok: checks.iter().all(|check| check.ok),
            checks,
        }
    }
}

/// Router serving the health endpoints.
pub fn create_app(health: Arc<HealthService>) -> Router {
    Router::new()
        .route("/__health", get(handlers::health))
        .route("/__health-details", get(handlers::health_details))
        .route("/__gtg", get(handlers::good_to_go))
        .route("/__build-info", get(handlers::build_info))
        .with_state(health)
}

/// Serve `app` on `addr` until `shutdown` resolves.
pub async fn run_server<F>(app: Router, addr: SocketAddr, shutdown: F) -> Result<(), IndexingError>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    info!(address = %addr, "Health server listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| IndexingError::config(format!("Failed to bind {}: {}", addr, e)))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| IndexingError::config(format!("Health server failed: {}", e)))
}
