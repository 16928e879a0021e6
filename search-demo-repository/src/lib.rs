//! # Search Demo Repository
//!
//! This crate provides the connector trait for talking to a search cluster,
//! a concrete implementation on top of the OpenSearch client, an in-memory
//! cluster for tests and dry runs, and the scroll driver both share.

pub mod config;
pub mod documents;
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod opensearch;
pub mod scroll;
pub mod types;

pub use config::{ClusterAddress, ConnectorConfig, ScrollConfig};
pub use errors::SearchError;
pub use interfaces::SearchConnector;
pub use memory::{ClusterStatus, InMemoryConnector};
pub use opensearch::OpenSearchConnector;
pub use types::{ScrollEnd, ScrollOutcome, ScrollPage};
