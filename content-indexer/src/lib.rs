//! # Content Indexer
//!
//! Keeps a search index synchronized with the content repository. Consumes
//! enriched content events from Kafka, maps them into search documents and
//! writes or deletes them in the search engine.
//!
//! ## Architecture
//!
//! 1. **Consumer**: Receives content events from Kafka
//! 2. **Processor**: Classifies events and maps them into documents
//! 3. **Concept**: Resolves annotations against the concordance service
//! 4. **Orchestrator**: Connects to the search engine and drives the consumer
//! 5. **Health**: Operational endpoints
//!
//! ## Modules
//!
//! - [`config`]: Settings, mapping tables and dependency wiring
//! - [`consumer`]: Kafka consumer for content events
//! - [`concept`]: Concordance lookups
//! - [`processor`]: Classification, sanitization and document mapping
//! - [`orchestrator`]: Connection and consumer lifecycle
//! - [`health`]: Health check endpoints
//! - [`errors`]: Error types for the indexer

pub mod concept;
pub mod config;
pub mod consumer;
pub mod errors;
pub mod health;
pub mod orchestrator;
pub mod processor;

pub use config::Dependencies;
pub use errors::IngestError;

use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Ingest error.
    #[error("Ingest error: {0}")]
    IngestError(#[from] IngestError),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
