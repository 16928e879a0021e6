//! A single search hit.

use serde_json::{Map, Value};

/// A document returned by a search, as the store reported it.
///
/// Hits are logged field by field; `name` is what callers compare on.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// The store-assigned document id.
    pub id: String,
    /// The document `_source`.
    pub source: Map<String, Value>,
}

impl SearchHit {
    pub fn new(id: impl Into<String>, source: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            source,
        }
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.source.get(key)
    }

    pub fn name(&self) -> Option<&str> {
        self.field("name").and_then(Value::as_str)
    }
}
