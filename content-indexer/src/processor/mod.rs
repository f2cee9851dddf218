//! Processing of content events into search documents.
//!
//! - [`classifier`]: infers the content type of an event
//! - [`sanitizer`]: text clean-up pipelines
//! - [`taxonomy`]: facet assignment for annotations
//! - [`image`]: image identifier derivation for thumbnails
//! - [`mapper`]: document assembly
//! - [`message_handler`]: the per-message pipeline

pub mod classifier;
pub mod image;
pub mod mapper;
pub mod message_handler;
pub mod sanitizer;
pub mod taxonomy;

pub use classifier::{Classification, ContentClassifier};
pub use mapper::DocumentMapper;
pub use message_handler::{generate_transaction_id, HandleOutcome, IgnoreReason, MessageHandler};
pub use taxonomy::TaxonomyResolver;
