//! OpenSearch implementation of the search client.
//!
//! This module provides concrete implementations of `SearchClient` and
//! `ClientConnector` using OpenSearch (or a compatible Elasticsearch service)
//! as the backend.

mod client;
mod connector;

pub use client::OpenSearchClient;
pub use connector::OpenSearchConnector;
