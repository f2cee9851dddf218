//! # Content Indexer Shared
//!
//! This crate defines the data structures shared across the content indexer:
//! the enriched content events read from the queue, the concept models returned
//! by the concordance service and the documents written to the search index.

pub mod types;

pub use types::concept_model::{ConceptModel, ConceptModels};
pub use types::index_document::{FacetFamily, IndexDocument};
pub use types::raw_event::{Annotation, Content, DataSource, Identifier, RawEvent, Thing};
