//! Content Indexer Main Entry Point
//!
//! Consumes content events from Kafka, indexes them into the search engine
//! and serves the health endpoints until interrupted.

use std::env;
use std::net::SocketAddr;

use content_indexer::health::{create_app, run_server};
use content_indexer::{Dependencies, IndexingError};
use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() -> Result<(), IndexingError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("content_indexer=info,content_indexer_repository=info")
    });

    let json_logs = env::var("AXIOM_TOKEN").is_ok()
        || env::var("LOG_FORMAT").map(|f| f == "json").unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init()
            .map_err(|e| IndexingError::config(e.to_string()))?;

        info!(
            service_name = "content-indexer",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .try_init()
            .map_err(|e| IndexingError::config(e.to_string()))?;

        info!(
            service_name = "content-indexer",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console output"
        );
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), IndexingError> {
    dotenv().ok();

    init_tracing()?;

    info!("Starting content indexer");

    let deps = match Dependencies::new() {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    deps.orchestrator.start().await?;

    let addr = SocketAddr::from(([0, 0, 0, 0], deps.settings.app_port));
    let result = run_server(create_app(deps.health.clone()), addr, shutdown_signal()).await;

    deps.orchestrator.stop().await;

    match result {
        Ok(()) => {
            info!("Content indexer stopped");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Content indexer failed");
            Err(e)
        }
    }
}
