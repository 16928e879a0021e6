//! Interface definitions for the search connector.
//!
//! This module defines the abstract `SearchConnector` trait so the demo flow
//! can run against the OpenSearch client or the in-memory cluster.

mod search_connector;

pub use search_connector::SearchConnector;
