//! Query and request body builders.
//!
//! Bodies are plain JSON so the same query can be sent through the
//! OpenSearch client or evaluated by the in-memory cluster.

use serde_json::{json, Value};

use search_demo_shared::AgeRange;

/// Build the scrolled age-range search.
///
/// Hits are sorted by internal document order (`_doc`), the cheapest order
/// for a scroll. The range is applied as a post filter with inclusive
/// bounds on both ends.
pub fn age_range_query(range: AgeRange) -> Value {
    json!({
        "sort": ["_doc"],
        "post_filter": {
            "range": {
                "age": {
                    "gte": range.from,
                    "lte": range.to
                }
            }
        }
    })
}

/// Build the delete-by-query body matching `value` on `key`.
///
/// Every term of `value` has to match, so "Peter Pan" does not also take out
/// a "Peter Parker".
pub fn field_match_query(key: &str, value: &str) -> Value {
    json!({
        "query": {
            "match": {
                key: {
                    "query": value,
                    "operator": "and"
                }
            }
        }
    })
}

/// Build the NDJSON lines of a bulk index request.
///
/// Every document gets an `index` action with a store-assigned id.
pub fn bulk_index_lines(documents: &[Value]) -> Vec<Value> {
    let mut lines = Vec::with_capacity(documents.len() * 2);
    for doc in documents {
        lines.push(json!({ "index": {} }));
        lines.push(doc.clone());
    }
    lines
}

/// Body for continuing a scroll.
pub fn scroll_continuation(scroll_id: &str, keep_alive: &str) -> Value {
    json!({
        "scroll": keep_alive,
        "scroll_id": scroll_id
    })
}

/// Body for releasing scroll contexts.
pub fn clear_scroll_body(scroll_id: &str) -> Value {
    json!({ "scroll_id": [scroll_id] })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_range_query_structure() {
        let query = age_range_query(AgeRange::new(15, 50));

        assert_eq!(query["sort"][0], "_doc");
        assert_eq!(query["post_filter"]["range"]["age"]["gte"], 15);
        assert_eq!(query["post_filter"]["range"]["age"]["lte"], 50);
        assert!(query.get("query").is_none());
    }

    #[test]
    fn test_field_match_query_uses_key() {
        let query = field_match_query("name", "Peter Pan");

        assert_eq!(query["query"]["match"]["name"]["query"], "Peter Pan");
        assert_eq!(query["query"]["match"]["name"]["operator"], "and");
    }

    #[test]
    fn test_bulk_lines_pair_actions_with_sources() {
        let docs = vec![
            json!({ "name": "Mark Twain", "age": 75 }),
            json!({ "name": "Tom Sawyer", "age": 12 }),
        ];

        let lines = bulk_index_lines(&docs);

        assert_eq!(lines.len(), 4);
        assert!(lines[0]["index"].is_object());
        assert_eq!(lines[1]["name"], "Mark Twain");
        assert!(lines[2]["index"].is_object());
        assert_eq!(lines[3]["age"], 12);
    }

    #[test]
    fn test_scroll_bodies() {
        let next = scroll_continuation("abc", "60s");
        assert_eq!(next["scroll"], "60s");
        assert_eq!(next["scroll_id"], "abc");

        let clear = clear_scroll_body("abc");
        assert_eq!(clear["scroll_id"][0], "abc");
    }
}
