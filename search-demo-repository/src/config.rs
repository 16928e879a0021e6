//! Configuration types for the search connectors.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::errors::SearchError;

/// Where the cluster lives and what it is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterAddress {
    /// Expected cluster name. Only compared against the health report.
    pub cluster_name: String,
    /// URL scheme, `http` unless configured otherwise.
    pub scheme: String,
    pub host: String,
    pub port: u16,
}

impl ClusterAddress {
    pub fn new(cluster_name: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            cluster_name: cluster_name.into(),
            scheme: "http".to_string(),
            host: host.into(),
            port,
        }
    }

    /// Use a different URL scheme (e.g. `https`).
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Build the node URL.
    ///
    /// Bare IPv6 literals are wrapped in brackets.
    pub fn url(&self) -> Result<Url, SearchError> {
        if self.host.trim().is_empty() {
            return Err(SearchError::invalid_address("host is empty"));
        }

        let host = if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };

        let raw = format!("{}://{}:{}", self.scheme, host, self.port);
        Url::parse(&raw).map_err(|e| SearchError::invalid_address(format!("{}: {}", raw, e)))
    }
}

impl fmt::Display for ClusterAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}", self.cluster_name, self.host, self.port)
    }
}

/// Timeouts applied by the connectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorConfig {
    /// How long the cluster may take to report green.
    pub health_timeout: Duration,
    /// Upper bound for the index existence check.
    pub exists_timeout: Duration,
    /// Transport-level timeout for every request. `None` keeps the client default.
    pub request_timeout: Option<Duration>,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            health_timeout: Duration::from_secs(2),
            exists_timeout: Duration::from_secs(1),
            request_timeout: Some(Duration::from_secs(30)),
        }
    }
}

/// Paging limits for a scrolled search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollConfig {
    /// Hits per page.
    pub page_size: usize,
    /// How long the server keeps the scroll context between pages.
    pub keep_alive: Duration,
    /// Hard cap on fetched pages, including the first one.
    pub max_pages: usize,
    /// Overall time budget for the whole scroll.
    pub deadline: Duration,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            keep_alive: Duration::from_secs(60),
            max_pages: 1000,
            deadline: Duration::from_secs(300),
        }
    }
}

/// Render a duration the way the search REST API expects time units.
pub(crate) fn time_param(duration: Duration) -> String {
    if duration.subsec_millis() == 0 {
        format!("{}s", duration.as_secs())
    } else {
        format!("{}ms", duration.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_from_ip_and_port() {
        let address = ClusterAddress::new("demo", "127.0.0.1", 9200);
        let url = address.url().unwrap();

        assert_eq!(url.as_str(), "http://127.0.0.1:9200/");
    }

    #[test]
    fn test_url_ipv6_and_scheme() {
        let address = ClusterAddress::new("demo", "::1", 9243).with_scheme("https");
        let url = address.url().unwrap();

        assert_eq!(url.as_str(), "https://[::1]:9243/");
    }

    #[test]
    fn test_url_rejects_empty_host() {
        let address = ClusterAddress::new("demo", "  ", 9200);
        assert!(matches!(
            address.url(),
            Err(SearchError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_url_rejects_malformed_host() {
        let address = ClusterAddress::new("demo", "bad host", 9200);
        assert!(matches!(
            address.url(),
            Err(SearchError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_display() {
        let address = ClusterAddress::new("elasticsearch", "10.0.0.5", 9300);
        assert_eq!(address.to_string(), "elasticsearch@10.0.0.5:9300");
    }

    #[test]
    fn test_time_param() {
        assert_eq!(time_param(Duration::from_secs(60)), "60s");
        assert_eq!(time_param(Duration::from_millis(1500)), "1500ms");
    }

    #[test]
    fn test_defaults() {
        let connector = ConnectorConfig::default();
        assert_eq!(connector.health_timeout, Duration::from_secs(2));
        assert_eq!(connector.exists_timeout, Duration::from_secs(1));

        let scroll = ScrollConfig::default();
        assert_eq!(scroll.page_size, 100);
        assert_eq!(scroll.keep_alive, Duration::from_secs(60));
    }
}
