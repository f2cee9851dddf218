//! Concept resolution against the concordance service.
//!
//! This module provides:
//! - [`ConceptReader`] trait for resolving concept ids into legacy taxonomy ids
//! - [`ConcordanceApiClient`] production client for the concordance HTTP API
//! - [`MockConceptReader`] in-memory reader for tests and local runs

mod concordance;
mod mock;

pub use concordance::{
    transform_to_concept_models, Concordance, ConcordanceApiClient, ConcordancesResponse,
    ConcordanceConcept, ConcordanceIdentifier,
};
pub use mock::MockConceptReader;

use async_trait::async_trait;
use content_indexer_shared::ConceptModels;

use crate::errors::ConceptError;

/// Prefix of every concept URI.
pub const THING_URI_PREFIX: &str = "http://api.ft.com/things/";

/// Resolves a batch of concept ids.
///
/// The returned map is keyed by full concept URI. Ids the service knows
/// nothing about are simply absent.
#[async_trait]
pub trait ConceptReader: Send + Sync {
    async fn get_concepts(&self, tid: &str, ids: &[String]) -> Result<ConceptModels, ConceptError>;

    /// Check that the service behind the reader is reachable.
    async fn health_check(&self) -> Result<String, ConceptError>;
}
