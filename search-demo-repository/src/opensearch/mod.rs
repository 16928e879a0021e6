//! OpenSearch implementation of the search connector.
//!
//! This module provides a concrete implementation of `SearchConnector`
//! using the OpenSearch client as the transport, plus the JSON bodies it
//! sends.

mod client;
mod index_config;
pub mod queries;
mod responses;

pub use client::OpenSearchConnector;
pub use index_config::index_settings;
