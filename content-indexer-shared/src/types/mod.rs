//! This module defines the core data structures used across the content indexer.
//! It re-exports the event, concept and document types.

pub mod concept_model;
pub mod index_document;
pub mod raw_event;

pub use concept_model::{ConceptModel, ConceptModels};
pub use index_document::{FacetFamily, IndexDocument};
pub use raw_event::{Annotation, Content, DataSource, Identifier, RawEvent, Thing};
