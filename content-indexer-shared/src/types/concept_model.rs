//! Concept models resolved from the concordance service.

use std::collections::HashMap;

/// Legacy taxonomy identifiers known for a single concept.
///
/// `tme_ids` is empty when the concordance service has no legacy mapping
/// for the concept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConceptModel {
    pub tme_ids: Vec<String>,
}

impl ConceptModel {
    pub fn new(tme_ids: Vec<String>) -> Self {
        Self { tme_ids }
    }
}

/// Concept models keyed by full concept URI.
pub type ConceptModels = HashMap<String, ConceptModel>;
