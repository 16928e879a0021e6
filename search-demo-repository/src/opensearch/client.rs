//! OpenSearch connector implementation.
//!
//! This module provides the concrete implementation of `SearchConnector`
//! using the OpenSearch Rust client. The REST endpoints it calls are shared
//! with Elasticsearch, so the connector works against either.

use std::time::Duration;

use async_trait::async_trait;
use opensearch::{
    cluster::ClusterHealthParts,
    http::request::JsonBody,
    http::response::Response,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesExistsParts},
    params::{Refresh, WaitForStatus},
    BulkParts, ClearScrollParts, DeleteByQueryParts, OpenSearch, ScrollParts, SearchParts,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::config::{time_param, ClusterAddress, ConnectorConfig, ScrollConfig};
use crate::errors::SearchError;
use crate::interfaces::SearchConnector;
use crate::opensearch::index_config::index_settings;
use crate::opensearch::queries;
use crate::opensearch::responses::{
    AcknowledgedResponse, BulkResponse, DeleteByQueryResponse, HealthResponse, ScrollResponse,
};
use crate::types::ScrollPage;

/// OpenSearch connector.
///
/// Holds the single connection handle of the demo. The handle only exists
/// once `connect` succeeded and is released by `close`, which consumes the
/// connector.
///
/// # Example
///
/// ```ignore
/// let address = ClusterAddress::new("elasticsearch", "127.0.0.1", 9200);
/// let connector = OpenSearchConnector::connect(&address, ConnectorConfig::default())?;
///
/// if !connector.index_exists("people").await? {
///     connector.create_index("people", 1, 0).await?;
///     connector.bulk_insert("people", "person").await?;
/// }
/// connector.close().await;
/// ```
pub struct OpenSearchConnector {
    client: OpenSearch,
    address: ClusterAddress,
    config: ConnectorConfig,
}

impl OpenSearchConnector {
    /// Create a connector for the node at `address`.
    ///
    /// No request is sent here; an unreachable node shows up on the first
    /// call.
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchConnector)` - A new connector
    /// * `Err(SearchError::InvalidAddress)` - If host, port and scheme do not form a URL
    /// * `Err(SearchError::ConnectionError)` - If the transport cannot be built
    pub fn connect(address: &ClusterAddress, config: ConnectorConfig) -> Result<Self, SearchError> {
        let url = address.url()?;

        let conn_pool = SingleNodeConnectionPool::new(url.clone());
        let mut builder = TransportBuilder::new(conn_pool).disable_proxy();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let transport = builder
            .build()
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            cluster = %address.cluster_name,
            url = %url,
            "Connection {} established",
            address
        );

        Ok(Self {
            client,
            address: address.clone(),
            config,
        })
    }

    pub fn address(&self) -> &ClusterAddress {
        &self.address
    }

    /// Read a successful response body, or turn the status and body of a
    /// failed one into an error built by `on_error`.
    async fn read_json<T>(
        response: Response,
        on_error: fn(String) -> SearchError,
    ) -> Result<T, SearchError>
    where
        T: DeserializeOwned,
    {
        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Request failed");
            return Err(on_error(format!(
                "Request failed with status {}: {}",
                status, error_body
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))
    }

    async fn read_page(response: Response) -> Result<ScrollPage, SearchError> {
        let body: ScrollResponse = Self::read_json(response, SearchError::QueryError).await?;
        Ok(ScrollPage::new(
            body.scroll_id,
            body.hits.hits.into_iter().map(Into::into).collect(),
        ))
    }
}

#[async_trait]
impl SearchConnector for OpenSearchConnector {
    /// Wait for green status for at most the health timeout.
    ///
    /// The cluster answers a timed-out wait with `408` and `timed_out: true`;
    /// that is reported as unhealthy rather than as an error.
    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<bool, SearchError> {
        let timeout = time_param(self.config.health_timeout);

        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .wait_for_status(WaitForStatus::Green)
            .timeout(&timeout)
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let status = response.status_code().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;
        let health = read_health(status, &body)?;

        if !health.cluster_name.is_empty() && health.cluster_name != self.address.cluster_name {
            warn!(
                expected = %self.address.cluster_name,
                reported = %health.cluster_name,
                "Connected to a differently named cluster"
            );
        }

        if !health.is_healthy() {
            info!(status = %health.status, "The cluster is unhealthy");
            return Ok(false);
        }

        info!(status = %health.status, "The cluster is healthy");
        Ok(true)
    }

    #[instrument(skip(self))]
    async fn index_exists(&self, index: &str) -> Result<bool, SearchError> {
        let indices = [index];
        let indices_api = self.client.indices();
        let request = indices_api
            .exists(IndicesExistsParts::Index(&indices))
            .send();

        let response = tokio::time::timeout(self.config.exists_timeout, request)
            .await
            .map_err(|_| SearchError::timeout("index_exists", self.config.exists_timeout))?
            .map_err(|e| SearchError::connection(e.to_string()))?;

        match response.status_code().as_u16() {
            200 => {
                info!(index = %index, "Index already created");
                Ok(true)
            }
            404 => {
                debug!(index = %index, "Index not found");
                Ok(false)
            }
            other => Err(SearchError::query(format!(
                "Index exists check returned status {}",
                other
            ))),
        }
    }

    #[instrument(skip(self))]
    async fn create_index(
        &self,
        index: &str,
        shards: u32,
        replicas: u32,
    ) -> Result<bool, SearchError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(index_settings(shards, replicas))
            .send()
            .await
            .map_err(|e| SearchError::index_creation(e.to_string()))?;

        let body: AcknowledgedResponse =
            Self::read_json(response, SearchError::IndexCreationError).await?;

        if body.acknowledged {
            info!(
                index = %index,
                shards,
                replicas,
                "Created index with {} shard(s) and {} replica(s)",
                shards,
                replicas
            );
        } else {
            warn!(index = %index, "Index creation was not acknowledged");
        }

        Ok(body.acknowledged)
    }

    #[instrument(skip(self, documents), fields(count = documents.len()))]
    async fn bulk_index(
        &self,
        index: &str,
        kind: &str,
        documents: &[Value],
    ) -> Result<bool, SearchError> {
        if documents.is_empty() {
            debug!("Nothing to index");
            return Ok(true);
        }

        let body: Vec<JsonBody<Value>> = queries::bulk_index_lines(documents)
            .into_iter()
            .map(Into::into)
            .collect();

        let response = self
            .client
            .bulk(BulkParts::Index(index))
            .refresh(Refresh::True)
            .body(body)
            .send()
            .await
            .map_err(|e| SearchError::bulk_index(e.to_string()))?;

        let bulk: BulkResponse = Self::read_json(response, SearchError::BulkIndexError).await?;

        if bulk.errors {
            let failures = bulk.failure_reasons();
            warn!(
                failed = failures.len(),
                first_reason = failures.first().map(String::as_str).unwrap_or("unknown"),
                "Bulk insert failed"
            );
            return Ok(false);
        }

        info!(index = %index, kind = %kind, count = documents.len(), "Bulk insert complete");
        Ok(true)
    }

    #[instrument(skip(self, query, config))]
    async fn open_scroll(
        &self,
        index: &str,
        query: &Value,
        config: &ScrollConfig,
    ) -> Result<ScrollPage, SearchError> {
        let keep_alive = time_param(config.keep_alive);

        let response = self
            .client
            .search(SearchParts::Index(&[index]))
            .scroll(&keep_alive)
            .size(config.page_size as i64)
            .body(query.clone())
            .send()
            .await
            .map_err(|e| SearchError::query(e.to_string()))?;

        Self::read_page(response).await
    }

    async fn next_scroll_page(
        &self,
        scroll_id: &str,
        keep_alive: Duration,
    ) -> Result<ScrollPage, SearchError> {
        let keep_alive = time_param(keep_alive);

        let response = self
            .client
            .scroll(ScrollParts::None)
            .body(queries::scroll_continuation(scroll_id, &keep_alive))
            .send()
            .await
            .map_err(|e| SearchError::query(e.to_string()))?;

        Self::read_page(response).await
    }

    async fn clear_scroll(&self, scroll_id: &str) -> Result<(), SearchError> {
        let response = self
            .client
            .clear_scroll(ClearScrollParts::None)
            .body(queries::clear_scroll_body(scroll_id))
            .send()
            .await
            .map_err(|e| SearchError::query(e.to_string()))?;

        // 404: the context already expired.
        let status = response.status_code();
        if !status.is_success() && status.as_u16() != 404 {
            return Err(SearchError::query(format!(
                "Clear scroll failed with status {}",
                status
            )));
        }

        debug!("Scroll context cleared");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_by_field(
        &self,
        index: &str,
        key: &str,
        value: &str,
    ) -> Result<u64, SearchError> {
        let response = self
            .client
            .delete_by_query(DeleteByQueryParts::Index(&[index]))
            .refresh(true)
            .body(queries::field_match_query(key, value))
            .send()
            .await
            .map_err(|e| SearchError::delete(e.to_string()))?;

        let body: DeleteByQueryResponse = Self::read_json(response, SearchError::DeleteError).await?;

        if !body.failures.is_empty() {
            warn!(failures = body.failures.len(), "Delete by query reported failures");
        }

        info!(deleted = body.deleted, "Deleted {} element(s)", body.deleted);
        Ok(body.deleted)
    }

    async fn close(self) {
        // Dropping the client releases its pooled connections.
        drop(self.client);
        info!(address = %self.address, "Connection closed");
    }
}

/// Interpret a `_cluster/health` reply.
///
/// A wait for green that ran out answers `408`; that is an unhealthy
/// cluster, not a failed request. Any other failure status is an error.
fn read_health(status: u16, body: &str) -> Result<HealthResponse, SearchError> {
    let timed_out = status == 408;
    if !(200..300).contains(&status) && !timed_out {
        error!(status, body = %body, "Health request failed");
        return Err(SearchError::connection(format!(
            "Health check failed with status {}: {}",
            status, body
        )));
    }

    let mut health: HealthResponse =
        serde_json::from_str(body).map_err(|e| SearchError::parse(e.to_string()))?;
    health.timed_out |= timed_out;
    Ok(health)
}
