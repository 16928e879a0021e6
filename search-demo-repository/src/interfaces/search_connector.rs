//! Search connector trait definition.
//!
//! This module defines the operations the demo performs against a search
//! cluster. They mirror the store's administrative and data APIs one to one.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::ScrollConfig;
use crate::documents::load_documents;
use crate::errors::SearchError;
use crate::opensearch::queries;
use crate::scroll;
use crate::types::{ScrollOutcome, ScrollPage};
use search_demo_shared::{AgeRange, Document};

/// Abstract interface for the search cluster.
///
/// # Error Handling
///
/// Transport failures are returned as `Err(SearchError)`. Business-level
/// outcomes are plain booleans: an unhealthy cluster, an unacknowledged
/// index creation and a bulk request with failed items all return
/// `Ok(false)` after logging the reason.
#[async_trait]
pub trait SearchConnector: Send + Sync {
    /// Wait for the cluster to report green.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The cluster went green within the health timeout
    /// * `Ok(false)` - The wait timed out; the cluster is considered unhealthy
    /// * `Err(SearchError)` - The health request itself failed
    async fn health_check(&self) -> Result<bool, SearchError>;

    /// Check whether `index` exists.
    ///
    /// Fails with `SearchError::Timeout` when the check exceeds the
    /// configured exists timeout.
    async fn index_exists(&self, index: &str) -> Result<bool, SearchError>;

    /// Create `index` with the given shard and replica counts.
    ///
    /// Returns whether the cluster acknowledged the creation. Nothing is
    /// rolled back when it did not.
    async fn create_index(
        &self,
        index: &str,
        shards: u32,
        replicas: u32,
    ) -> Result<bool, SearchError>;

    /// Index `documents` in a single bulk request with immediate refresh.
    ///
    /// `kind` is the configured document kind. It is logged but not sent,
    /// since current clusters no longer accept mapping types.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - Every item was indexed and is visible to searches
    /// * `Ok(false)` - At least one item failed; failures are logged
    async fn bulk_index(
        &self,
        index: &str,
        kind: &str,
        documents: &[Value],
    ) -> Result<bool, SearchError>;

    /// Start a scrolled search and return its first page.
    async fn open_scroll(
        &self,
        index: &str,
        query: &Value,
        config: &ScrollConfig,
    ) -> Result<ScrollPage, SearchError>;

    /// Fetch the next page of an open scroll, extending its keep-alive.
    async fn next_scroll_page(
        &self,
        scroll_id: &str,
        keep_alive: Duration,
    ) -> Result<ScrollPage, SearchError>;

    /// Release a scroll context on the server.
    async fn clear_scroll(&self, scroll_id: &str) -> Result<(), SearchError>;

    /// Delete every document whose `key` field matches `value`, then
    /// refresh the index.
    ///
    /// Returns the number of deleted documents.
    async fn delete_by_field(&self, index: &str, key: &str, value: &str)
        -> Result<u64, SearchError>;

    /// Release the connection.
    async fn close(self)
    where
        Self: Sized;

    /// Bulk insert the built-in sample documents.
    async fn bulk_insert(&self, index: &str, kind: &str) -> Result<bool, SearchError> {
        let documents: Vec<Value> = Document::samples().iter().map(Document::to_source).collect();
        self.bulk_index(index, kind, &documents).await
    }

    /// Bulk insert the JSON array stored at `path`.
    ///
    /// File and parse errors are returned before anything is sent.
    async fn bulk_insert_from_file(
        &self,
        index: &str,
        kind: &str,
        path: &Path,
    ) -> Result<bool, SearchError> {
        let documents = load_documents(path).await?;
        self.bulk_index(index, kind, &documents).await
    }

    /// Scroll through every document whose `age` lies in `range`, logging
    /// each field of each hit.
    async fn query_age_range(
        &self,
        index: &str,
        range: AgeRange,
        config: &ScrollConfig,
    ) -> Result<ScrollOutcome, SearchError> {
        let query = queries::age_range_query(range);
        scroll::scroll_all(self, index, &query, config).await
    }
}
