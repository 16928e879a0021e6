//! Recognized configuration keys.

pub const NUMBER_OF_SHARDS: &str = "number_of_shards";
pub const NUMBER_OF_REPLICAS: &str = "number_of_replicas";
pub const CLUSTER_NAME: &str = "cluster_name";
pub const INDEX_NAME: &str = "index_name";
pub const INDEX_TYPE: &str = "index_type";
pub const MASTER_IP: &str = "master_ip";
pub const MASTER_PORT: &str = "master_port";

pub const SCHEME: &str = "scheme";
pub const REQUEST_TIMEOUT_SECS: &str = "request_timeout_secs";
pub const HEALTH_TIMEOUT_SECS: &str = "health_timeout_secs";
pub const EXISTS_TIMEOUT_SECS: &str = "exists_timeout_secs";
pub const SCROLL_PAGE_SIZE: &str = "scroll_page_size";
pub const SCROLL_KEEP_ALIVE_SECS: &str = "scroll_keep_alive_secs";
pub const SCROLL_MAX_PAGES: &str = "scroll_max_pages";
pub const SCROLL_DEADLINE_SECS: &str = "scroll_deadline_secs";
pub const DATA_FILE: &str = "data_file";
pub const QUERY_FROM: &str = "query_from";
pub const QUERY_TO: &str = "query_to";
pub const DELETE_FIELD: &str = "delete_field";
pub const DELETE_VALUE: &str = "delete_value";

/// Prefix of environment variables that override file values.
pub const ENV_PREFIX: &str = "SEARCH_DEMO_";

/// Environment variable overriding `key`, e.g. `SEARCH_DEMO_MASTER_PORT`.
pub fn env_var_name(key: &str) -> String {
    format!("{}{}", ENV_PREFIX, key.to_ascii_uppercase())
}
