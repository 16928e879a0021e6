//! Response bodies read back from the cluster.
//!
//! Only the fields the connector looks at are modelled; everything else in
//! the body is ignored.

use serde::Deserialize;
use serde_json::{Map, Value};

use search_demo_shared::SearchHit;

/// `GET _cluster/health`.
#[derive(Debug, Deserialize)]
pub(crate) struct HealthResponse {
    #[serde(default)]
    pub cluster_name: String,
    pub status: String,
    #[serde(default)]
    pub timed_out: bool,
}

impl HealthResponse {
    /// Whether the cluster reached the requested status before the wait ran out.
    pub fn is_healthy(&self) -> bool {
        !self.timed_out
    }
}

/// Any acknowledged admin call such as index creation.
#[derive(Debug, Deserialize)]
pub(crate) struct AcknowledgedResponse {
    #[serde(default)]
    pub acknowledged: bool,
}

/// `POST _bulk`.
#[derive(Debug, Deserialize)]
pub(crate) struct BulkResponse {
    pub errors: bool,
    #[serde(default)]
    pub items: Vec<Value>,
}

impl BulkResponse {
    /// Failure reasons of the items that did not make it, in request order.
    pub fn failure_reasons(&self) -> Vec<String> {
        self.items
            .iter()
            .filter_map(|item| item.get("index").and_then(|action| action.get("error")))
            .map(|error| {
                error
                    .get("reason")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| error.to_string())
            })
            .collect()
    }
}

/// `POST {index}/_search?scroll=..` and `POST _search/scroll`.
#[derive(Debug, Deserialize)]
pub(crate) struct ScrollResponse {
    #[serde(rename = "_scroll_id")]
    pub scroll_id: Option<String>,
    pub hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HitsEnvelope {
    #[serde(default)]
    pub hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawHit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_source", default)]
    pub source: Map<String, Value>,
}

impl From<RawHit> for SearchHit {
    fn from(raw: RawHit) -> Self {
        SearchHit::new(raw.id, raw.source)
    }
}

/// `POST {index}/_delete_by_query`.
#[derive(Debug, Deserialize)]
pub(crate) struct DeleteByQueryResponse {
    #[serde(default)]
    pub deleted: u64,
    #[serde(default)]
    pub failures: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_health_timed_out() {
        let body = json!({
            "cluster_name": "elasticsearch",
            "status": "yellow",
            "timed_out": true,
            "number_of_nodes": 1
        });

        let health: HealthResponse = serde_json::from_value(body).unwrap();

        assert_eq!(health.cluster_name, "elasticsearch");
        assert_eq!(health.status, "yellow");
        assert!(health.timed_out);
    }

    #[test]
    fn test_bulk_failure_reasons() {
        let body = json!({
            "took": 3,
            "errors": true,
            "items": [
                { "index": { "_id": "a", "status": 201, "result": "created" } },
                { "index": { "_id": "b", "status": 400, "error": {
                    "type": "mapper_parsing_exception",
                    "reason": "failed to parse field [age] of type [integer]"
                } } }
            ]
        });

        let bulk: BulkResponse = serde_json::from_value(body).unwrap();

        assert!(bulk.errors);
        assert_eq!(
            bulk.failure_reasons(),
            vec!["failed to parse field [age] of type [integer]".to_string()]
        );
    }

    #[test]
    fn test_scroll_response_into_hits() {
        let body = json!({
            "_scroll_id": "FGluY2x1ZGVfY29udGV4dF91dWlk",
            "took": 1,
            "hits": {
                "total": { "value": 1, "relation": "eq" },
                "hits": [
                    { "_index": "people", "_id": "x1", "_score": null,
                      "_source": { "name": "John Doe", "age": 20 }, "sort": [0] }
                ]
            }
        });

        let response: ScrollResponse = serde_json::from_value(body).unwrap();
        let hits: Vec<SearchHit> = response.hits.hits.into_iter().map(Into::into).collect();

        assert_eq!(response.scroll_id.as_deref(), Some("FGluY2x1ZGVfY29udGV4dF91dWlk"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "x1");
        assert_eq!(hits[0].name(), Some("John Doe"));
    }

    #[test]
    fn test_delete_by_query_response() {
        let body = json!({ "took": 12, "timed_out": false, "total": 1, "deleted": 1, "failures": [] });

        let response: DeleteByQueryResponse = serde_json::from_value(body).unwrap();

        assert_eq!(response.deleted, 1);
        assert!(response.failures.is_empty());
    }
}
