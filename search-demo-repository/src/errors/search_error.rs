//! Search error types.
//!
//! This module defines the error types that can occur while talking to the
//! search cluster. Business-level outcomes (an unhealthy cluster, an
//! unacknowledged index creation, a failed bulk item) are not errors; the
//! connector reports those as booleans.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during search engine operations.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The configured host address could not be turned into a URL.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Failed to establish connection to the search engine.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// An operation did not complete in time.
    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    /// Search or scroll request failed.
    #[error("Query error: {0}")]
    QueryError(String),

    /// Failed to create the search index.
    #[error("Index creation error: {0}")]
    IndexCreationError(String),

    /// Bulk indexing request was rejected as a whole.
    #[error("Bulk index error: {0}")]
    BulkIndexError(String),

    /// Delete-by-query request failed.
    #[error("Delete error: {0}")]
    DeleteError(String),

    /// Failed to parse a response or an input document.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to read an input file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SearchError {
    /// Create an invalid address error.
    pub fn invalid_address(msg: impl Into<String>) -> Self {
        Self::InvalidAddress(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a timeout error.
    pub fn timeout(operation: &'static str, timeout: Duration) -> Self {
        Self::Timeout { operation, timeout }
    }

    /// Create a query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError(msg.into())
    }

    /// Create an index creation error.
    pub fn index_creation(msg: impl Into<String>) -> Self {
        Self::IndexCreationError(msg.into())
    }

    /// Create a bulk index error.
    pub fn bulk_index(msg: impl Into<String>) -> Self {
        Self::BulkIndexError(msg.into())
    }

    /// Create a delete error.
    pub fn delete(msg: impl Into<String>) -> Self {
        Self::DeleteError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message() {
        let err = SearchError::timeout("index_exists", Duration::from_secs(1));
        assert_eq!(err.to_string(), "index_exists timed out after 1s");
    }

    #[test]
    fn test_from_json_error() {
        let err: SearchError = serde_json::from_str::<serde_json::Value>("[1,")
            .unwrap_err()
            .into();
        assert!(matches!(err, SearchError::ParseError(_)));
    }
}
