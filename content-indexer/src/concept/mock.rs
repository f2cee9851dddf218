use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use content_indexer_shared::{ConceptModel, ConceptModels};
use tokio::sync::RwLock;

use crate::concept::ConceptReader;
use crate::errors::ConceptError;

/// In-memory concept reader.
///
/// Returns the registered model for each requested id and skips the rest.
/// Can be switched into a failing mode to exercise error paths.
#[derive(Default)]
pub struct MockConceptReader {
    concepts: RwLock<HashMap<String, ConceptModel>>,
    fail_with_status: RwLock<Option<u16>>,
    calls: AtomicUsize,
}

impl MockConceptReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_concept(&self, id: impl Into<String>, tme_ids: Vec<String>) {
        self.concepts
            .write()
            .await
            .insert(id.into(), ConceptModel::new(tme_ids));
    }

    /// Make every subsequent lookup fail with the given HTTP status.
    pub async fn fail_with(&self, status: u16) {
        *self.fail_with_status.write().await = Some(status);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConceptReader for MockConceptReader {
    async fn get_concepts(&self, _tid: &str, ids: &[String]) -> Result<ConceptModels, ConceptError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(status) = *self.fail_with_status.read().await {
            return Err(ConceptError::UnexpectedStatus(status));
        }

        let concepts = self.concepts.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| concepts.get(id).map(|model| (id.clone(), model.clone())))
            .collect())
    }

    async fn health_check(&self) -> Result<String, ConceptError> {
        match *self.fail_with_status.read().await {
            Some(status) => Err(ConceptError::UnexpectedStatus(status)),
            None => Ok("Concordance API is healthy".to_string()),
        }
    }
}
