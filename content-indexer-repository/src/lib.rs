//! # Content Indexer Repository
//!
//! This crate provides the seam between the content indexer and the search
//! engine. It includes the error type, the `SearchClient` and
//! `ClientConnector` traits, an OpenSearch-backed implementation with optional
//! AWS request signing, the reference schema used for drift detection, and the
//! `IndexingService` that guards the active client.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod schema;
pub mod service;
pub mod types;

pub use config::AccessConfig;
pub use errors::SearchIndexError;
pub use interfaces::{ClientConnector, SearchClient};
pub use opensearch::{OpenSearchClient, OpenSearchConnector};
pub use schema::SchemaHealth;
pub use service::IndexingService;
pub use types::{ClusterHealth, DeleteResult, IndexDefinition, IndexResult};
