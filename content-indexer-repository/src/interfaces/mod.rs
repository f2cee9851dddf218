//! Interface definitions for the search engine client.
//!
//! This module defines the `SearchClient` and `ClientConnector` traits that
//! allow the indexing service to swap clients and run against test doubles.

mod search_client;

pub use search_client::{ClientConnector, SearchClient};
