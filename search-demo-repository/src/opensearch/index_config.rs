//! Index settings and mappings for the demo index.

use serde_json::{json, Value};

/// Settings and mappings sent with the create-index request.
///
/// `name` is full-text with a `keyword` sub-field for exact lookups; `age`
/// is an integer so range filters compare numerically.
pub fn index_settings(shards: u32, replicas: u32) -> Value {
    json!({
        "settings": {
            "index": {
                "number_of_shards": shards,
                "number_of_replicas": replicas
            }
        },
        "mappings": {
            "properties": {
                "name": {
                    "type": "text",
                    "fields": {
                        "keyword": {
                            "type": "keyword",
                            "ignore_above": 256
                        }
                    }
                },
                "age": {
                    "type": "integer"
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_settings_structure() {
        let settings = index_settings(3, 2);

        assert_eq!(settings["settings"]["index"]["number_of_shards"], 3);
        assert_eq!(settings["settings"]["index"]["number_of_replicas"], 2);

        assert_eq!(settings["mappings"]["properties"]["name"]["type"], "text");
        assert_eq!(
            settings["mappings"]["properties"]["name"]["fields"]["keyword"]["type"],
            "keyword"
        );
        assert_eq!(settings["mappings"]["properties"]["age"]["type"], "integer");
    }
}
