//! HTTP handlers for the health endpoints.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::warn;

use crate::health::HealthService;

pub async fn health(State(health): State<Arc<HealthService>>) -> impl IntoResponse {
    Json(health.report().await)
}

pub async fn health_details(State(health): State<Arc<HealthService>>) -> impl IntoResponse {
    match health.indexing_service().get_cluster_health().await {
        Ok(cluster_health) => (StatusCode::OK, Json(cluster_health)).into_response(),
        Err(e) => {
            warn!(error = %e, "Could not read cluster health");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "message": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// 503 when any check fails.
pub async fn good_to_go(State(health): State<Arc<HealthService>>) -> impl IntoResponse {
    let failed: Vec<String> = health
        .checks()
        .await
        .into_iter()
        .filter(|check| !check.ok)
        .map(|check| check.check_output)
        .collect();

    if failed.is_empty() {
        (StatusCode::OK, "OK".to_string())
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, failed.join("\n"))
    }
}

pub async fn build_info(State(health): State<Arc<HealthService>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "name": health.name(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
