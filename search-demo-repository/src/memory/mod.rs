//! In-memory search cluster.
//!
//! A single-process stand-in for a real cluster, used by the tests and by
//! `--dry-run`. It keeps documents in insertion order, which doubles as the
//! `_doc` sort order, and makes every write visible immediately.
//!
//! Query support is limited to what the demo sends: an optional `range`
//! filter (as `post_filter` or `query`) and `match` deletes with all terms
//! required.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::{ConnectorConfig, ScrollConfig};
use crate::errors::SearchError;
use crate::interfaces::SearchConnector;
use crate::types::ScrollPage;
use search_demo_shared::SearchHit;

/// Health colour reported by the simulated cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClusterStatus {
    #[default]
    Green,
    Yellow,
    Red,
}

impl fmt::Display for ClusterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClusterStatus::Green => "green",
            ClusterStatus::Yellow => "yellow",
            ClusterStatus::Red => "red",
        };
        f.write_str(name)
    }
}

struct StoredIndex {
    /// Set when the index was created explicitly with the demo mapping.
    typed_age: bool,
    docs: Vec<(String, Map<String, Value>)>,
}

#[derive(Default)]
struct ClusterState {
    indices: BTreeMap<String, StoredIndex>,
    scrolls: HashMap<String, VecDeque<Vec<SearchHit>>>,
    next_doc_id: u64,
    next_scroll_id: u64,
}

/// In-memory implementation of `SearchConnector`.
pub struct InMemoryConnector {
    cluster_name: String,
    config: ConnectorConfig,
    status: ClusterStatus,
    time_to_green: Option<Duration>,
    latency: Duration,
    acknowledge_creates: bool,
    state: Mutex<ClusterState>,
}

impl InMemoryConnector {
    /// Create an empty, green cluster.
    pub fn new(cluster_name: impl Into<String>, config: ConnectorConfig) -> Self {
        info!("Using in-memory cluster");
        Self {
            cluster_name: cluster_name.into(),
            config,
            status: ClusterStatus::Green,
            time_to_green: None,
            latency: Duration::ZERO,
            acknowledge_creates: true,
            state: Mutex::new(ClusterState::default()),
        }
    }

    /// Report `status` to health checks.
    pub fn with_status(mut self, status: ClusterStatus) -> Self {
        self.status = status;
        self
    }

    /// Turn green `delay` after a health check starts waiting.
    pub fn with_time_to_green(mut self, delay: Duration) -> Self {
        self.time_to_green = Some(delay);
        self
    }

    /// Delay every request by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Create indices but report them as unacknowledged.
    pub fn without_acknowledgements(mut self) -> Self {
        self.acknowledge_creates = false;
        self
    }

    /// Number of documents currently stored in `index`.
    pub async fn document_count(&self, index: &str) -> usize {
        let state = self.state.lock().await;
        state.indices.get(index).map_or(0, |stored| stored.docs.len())
    }

    /// Number of scroll contexts still open.
    pub async fn open_scrolls(&self) -> usize {
        self.state.lock().await.scrolls.len()
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn take_page(pages: &mut VecDeque<Vec<SearchHit>>) -> Vec<SearchHit> {
        pages.pop_front().unwrap_or_default()
    }
}

/// Check a source against the `range` clause of `query`, if there is one.
fn matches_range(query: &Value, source: &Map<String, Value>) -> bool {
    let range = query
        .pointer("/post_filter/range")
        .or_else(|| query.pointer("/query/range"))
        .and_then(Value::as_object);

    let Some(range) = range else {
        return true;
    };

    range.iter().all(|(field, bounds)| {
        let Some(actual) = source.get(field).and_then(Value::as_f64) else {
            return false;
        };
        let bound = |name: &str| bounds.get(name).and_then(Value::as_f64);

        bound("gte").map_or(true, |b| actual >= b)
            && bound("gt").map_or(true, |b| actual > b)
            && bound("lte").map_or(true, |b| actual <= b)
            && bound("lt").map_or(true, |b| actual < b)
    })
}

/// `match` with `operator: and`: every term of `value` appears in the field.
fn matches_field(source: &Map<String, Value>, key: &str, value: &str) -> bool {
    match source.get(key) {
        Some(Value::String(text)) => {
            let terms: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();
            let wanted: Vec<String> = value.split_whitespace().map(str::to_lowercase).collect();
            !wanted.is_empty() && wanted.iter().all(|term| terms.contains(term))
        }
        Some(Value::Number(number)) => number.to_string() == value.trim(),
        Some(Value::Bool(flag)) => flag.to_string() == value.trim(),
        _ => false,
    }
}

#[async_trait]
impl SearchConnector for InMemoryConnector {
    async fn health_check(&self) -> Result<bool, SearchError> {
        self.simulate_latency().await;

        if self.status == ClusterStatus::Green {
            info!(status = %self.status, "The cluster is healthy");
            return Ok(true);
        }

        match self.time_to_green {
            Some(delay) if delay <= self.config.health_timeout => {
                tokio::time::sleep(delay).await;
                info!(status = %ClusterStatus::Green, "The cluster is healthy");
                Ok(true)
            }
            _ => {
                tokio::time::sleep(self.config.health_timeout).await;
                info!(status = %self.status, "The cluster is unhealthy");
                Ok(false)
            }
        }
    }

    async fn index_exists(&self, index: &str) -> Result<bool, SearchError> {
        let check = async {
            self.simulate_latency().await;
            self.state.lock().await.indices.contains_key(index)
        };

        let exists = tokio::time::timeout(self.config.exists_timeout, check)
            .await
            .map_err(|_| SearchError::timeout("index_exists", self.config.exists_timeout))?;

        if exists {
            info!(index = %index, "Index already created");
        }
        Ok(exists)
    }

    async fn create_index(
        &self,
        index: &str,
        shards: u32,
        replicas: u32,
    ) -> Result<bool, SearchError> {
        self.simulate_latency().await;
        let mut state = self.state.lock().await;

        if state.indices.contains_key(index) {
            return Err(SearchError::index_creation(format!(
                "resource_already_exists_exception: index [{}] already exists",
                index
            )));
        }

        state.indices.insert(
            index.to_string(),
            StoredIndex {
                typed_age: true,
                docs: Vec::new(),
            },
        );

        if self.acknowledge_creates {
            info!(index = %index, shards, replicas, "Created index");
        } else {
            warn!(index = %index, "Index creation was not acknowledged");
        }
        Ok(self.acknowledge_creates)
    }

    async fn bulk_index(
        &self,
        index: &str,
        kind: &str,
        documents: &[Value],
    ) -> Result<bool, SearchError> {
        self.simulate_latency().await;
        let mut state = self.state.lock().await;
        let state = &mut *state;

        let stored = state
            .indices
            .entry(index.to_string())
            .or_insert_with(|| StoredIndex {
                typed_age: false,
                docs: Vec::new(),
            });

        let mut failures = Vec::new();
        for doc in documents {
            let Some(source) = doc.as_object() else {
                failures.push("document is not an object".to_string());
                continue;
            };
            if stored.typed_age {
                if let Some(age) = source.get("age") {
                    if age.as_i64().is_none() {
                        failures.push("failed to parse field [age] of type [integer]".to_string());
                        continue;
                    }
                }
            }

            state.next_doc_id += 1;
            stored
                .docs
                .push((state.next_doc_id.to_string(), source.clone()));
        }

        if !failures.is_empty() {
            warn!(
                failed = failures.len(),
                first_reason = %failures[0],
                "Bulk insert failed"
            );
            return Ok(false);
        }

        info!(index = %index, kind = %kind, count = documents.len(), "Bulk insert complete");
        Ok(true)
    }

    async fn open_scroll(
        &self,
        index: &str,
        query: &Value,
        config: &ScrollConfig,
    ) -> Result<ScrollPage, SearchError> {
        self.simulate_latency().await;
        let mut state = self.state.lock().await;

        let stored = state.indices.get(index).ok_or_else(|| {
            SearchError::query(format!("index_not_found_exception: no such index [{}]", index))
        })?;

        let hits: Vec<SearchHit> = stored
            .docs
            .iter()
            .filter(|(_, source)| matches_range(query, source))
            .map(|(id, source)| SearchHit::new(id.clone(), source.clone()))
            .collect();

        let mut pages: VecDeque<Vec<SearchHit>> = hits
            .chunks(config.page_size.max(1))
            .map(<[SearchHit]>::to_vec)
            .collect();
        let first = Self::take_page(&mut pages);

        state.next_scroll_id += 1;
        let scroll_id = format!("scroll-{}", state.next_scroll_id);
        state.scrolls.insert(scroll_id.clone(), pages);

        debug!(scroll_id = %scroll_id, hits = first.len(), "Opened scroll");
        Ok(ScrollPage::new(Some(scroll_id), first))
    }

    async fn next_scroll_page(
        &self,
        scroll_id: &str,
        _keep_alive: Duration,
    ) -> Result<ScrollPage, SearchError> {
        self.simulate_latency().await;
        let mut state = self.state.lock().await;

        let pages = state.scrolls.get_mut(scroll_id).ok_or_else(|| {
            SearchError::query(format!(
                "search_context_missing_exception: no search context found for id [{}]",
                scroll_id
            ))
        })?;

        let page = Self::take_page(pages);
        Ok(ScrollPage::new(Some(scroll_id.to_string()), page))
    }

    async fn clear_scroll(&self, scroll_id: &str) -> Result<(), SearchError> {
        self.state.lock().await.scrolls.remove(scroll_id);
        Ok(())
    }

    async fn delete_by_field(
        &self,
        index: &str,
        key: &str,
        value: &str,
    ) -> Result<u64, SearchError> {
        self.simulate_latency().await;
        let mut state = self.state.lock().await;

        let stored = state.indices.get_mut(index).ok_or_else(|| {
            SearchError::delete(format!("index_not_found_exception: no such index [{}]", index))
        })?;

        let before = stored.docs.len();
        stored
            .docs
            .retain(|(_, source)| !matches_field(source, key, value));
        let deleted = (before - stored.docs.len()) as u64;

        info!(deleted, "Deleted {} element(s)", deleted);
        Ok(deleted)
    }

    async fn close(self) {
        info!(cluster = %self.cluster_name, "In-memory cluster closed");
    }
}
