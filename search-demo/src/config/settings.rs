//! Typed settings built from the raw configuration.

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use search_demo_repository::{ClusterAddress, ConnectorConfig, ScrollConfig};
use search_demo_shared::AgeRange;

use crate::config::keys;
use crate::config::PropertyReader;
use crate::DemoError;

/// Everything the demo run needs, validated up front.
///
/// Building settings is the only place configuration can fail; once a
/// `DemoSettings` exists, every value the connector and the run use is
/// present.
#[derive(Debug, Clone)]
pub struct DemoSettings {
    pub address: ClusterAddress,
    pub connector: ConnectorConfig,
    pub scroll: ScrollConfig,
    pub index_name: String,
    /// Document kind. Logged only; see `SearchConnector::bulk_index`.
    pub index_type: String,
    pub number_of_shards: u32,
    pub number_of_replicas: u32,
    /// JSON array to seed from instead of the built-in samples.
    pub data_file: Option<PathBuf>,
    pub query_range: AgeRange,
    pub delete_field: String,
    pub delete_value: String,
}

impl DemoSettings {
    /// Build settings from `properties`, letting `SEARCH_DEMO_*` environment
    /// variables override file values.
    pub fn from_properties(properties: &PropertyReader) -> Result<Self, DemoError> {
        Self::from_sources(properties, |name| env::var(name).ok())
    }

    /// Build settings from `properties` with an explicit environment lookup.
    pub fn from_sources<F>(properties: &PropertyReader, env_lookup: F) -> Result<Self, DemoError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let source = Source {
            properties,
            env_lookup,
        };

        let address = ClusterAddress::new(
            source.required(keys::CLUSTER_NAME)?,
            source.required(keys::MASTER_IP)?,
            source.required_parsed::<u16>(keys::MASTER_PORT)?,
        )
        .with_scheme(source.get(keys::SCHEME).unwrap_or_else(|| "http".to_string()));

        let connector_defaults = ConnectorConfig::default();
        let request_timeout = match source.parsed::<u64>(keys::REQUEST_TIMEOUT_SECS)? {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => connector_defaults.request_timeout,
        };
        let connector = ConnectorConfig {
            health_timeout: source
                .seconds(keys::HEALTH_TIMEOUT_SECS)?
                .unwrap_or(connector_defaults.health_timeout),
            exists_timeout: source
                .seconds(keys::EXISTS_TIMEOUT_SECS)?
                .unwrap_or(connector_defaults.exists_timeout),
            request_timeout,
        };

        let scroll_defaults = ScrollConfig::default();
        let scroll = ScrollConfig {
            page_size: source
                .positive(keys::SCROLL_PAGE_SIZE)?
                .unwrap_or(scroll_defaults.page_size),
            keep_alive: source
                .seconds(keys::SCROLL_KEEP_ALIVE_SECS)?
                .unwrap_or(scroll_defaults.keep_alive),
            max_pages: source
                .positive(keys::SCROLL_MAX_PAGES)?
                .unwrap_or(scroll_defaults.max_pages),
            deadline: source
                .seconds(keys::SCROLL_DEADLINE_SECS)?
                .unwrap_or(scroll_defaults.deadline),
        };

        let data_file = source
            .get(keys::DATA_FILE)
            .filter(|value| !value.is_empty())
            .map(|value| resolve_relative(properties.path(), Path::new(&value)));

        Ok(Self {
            address,
            connector,
            scroll,
            index_name: source.required(keys::INDEX_NAME)?,
            index_type: source.required(keys::INDEX_TYPE)?,
            number_of_shards: source.required_parsed(keys::NUMBER_OF_SHARDS)?,
            number_of_replicas: source.required_parsed(keys::NUMBER_OF_REPLICAS)?,
            data_file,
            query_range: AgeRange::new(
                source.parsed(keys::QUERY_FROM)?.unwrap_or(15),
                source.parsed(keys::QUERY_TO)?.unwrap_or(50),
            ),
            delete_field: source
                .get(keys::DELETE_FIELD)
                .unwrap_or_else(|| "name".to_string()),
            delete_value: source
                .get(keys::DELETE_VALUE)
                .unwrap_or_else(|| "Peter Pan".to_string()),
        })
    }
}

/// Resolve `path` against the directory holding the configuration file.
fn resolve_relative(config_path: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match config_path.parent() {
        Some(dir) => dir.join(path),
        None => path.to_path_buf(),
    }
}

struct Source<'a, F> {
    properties: &'a PropertyReader,
    env_lookup: F,
}

impl<F> Source<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.env_lookup)(&keys::env_var_name(key))
            .or_else(|| self.properties.read(key).map(str::to_string))
            .map(|value| value.trim().to_string())
    }

    fn required(&self, key: &str) -> Result<String, DemoError> {
        self.get(key)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| DemoError::config(format!("missing required key `{}`", key)))
    }

    fn parsed<T: FromStr>(&self, key: &str) -> Result<Option<T>, DemoError> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) if raw.is_empty() => Ok(None),
            Some(raw) => raw.parse::<T>().map(Some).map_err(|_| {
                DemoError::config(format!("`{}` has an invalid value `{}`", key, raw))
            }),
        }
    }

    fn required_parsed<T: FromStr>(&self, key: &str) -> Result<T, DemoError> {
        self.parsed(key)?
            .ok_or_else(|| DemoError::config(format!("missing required key `{}`", key)))
    }

    fn seconds(&self, key: &str) -> Result<Option<Duration>, DemoError> {
        Ok(self.parsed::<u64>(key)?.map(Duration::from_secs))
    }

    fn positive(&self, key: &str) -> Result<Option<usize>, DemoError> {
        match self.parsed::<usize>(key)? {
            Some(0) => Err(DemoError::config(format!("`{}` must be greater than 0", key))),
            other => Ok(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    const BASE: &str = "number_of_shards=1\n\
                        number_of_replicas=0\n\
                        cluster_name=elasticsearch\n\
                        index_name=people\n\
                        index_type=person\n\
                        master_ip=127.0.0.1\n\
                        master_port=9200\n";

    fn reader(dir: &TempDir, contents: &str) -> PropertyReader {
        let path = dir.path().join("config.properties");
        fs::write(&path, contents).unwrap();
        PropertyReader::load(path)
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_required_keys_and_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = DemoSettings::from_sources(&reader(&dir, BASE), no_env).unwrap();

        assert_eq!(settings.address, ClusterAddress::new("elasticsearch", "127.0.0.1", 9200));
        assert_eq!(settings.index_name, "people");
        assert_eq!(settings.index_type, "person");
        assert_eq!(settings.number_of_shards, 1);
        assert_eq!(settings.number_of_replicas, 0);
        assert_eq!(settings.connector, ConnectorConfig::default());
        assert_eq!(settings.scroll, ScrollConfig::default());
        assert_eq!(settings.query_range, AgeRange::new(15, 50));
        assert_eq!(settings.delete_field, "name");
        assert_eq!(settings.delete_value, "Peter Pan");
        assert!(settings.data_file.is_none());
    }

    #[test]
    fn test_missing_required_key() {
        let dir = TempDir::new().unwrap();
        let contents = BASE.replace("index_name=people\n", "");

        let err = DemoSettings::from_sources(&reader(&dir, &contents), no_env).unwrap_err();

        assert!(err.to_string().contains("index_name"));
    }

    #[test]
    fn test_empty_configuration_fails_before_connecting() {
        let dir = TempDir::new().unwrap();
        let properties = PropertyReader::load(dir.path().join("absent.properties"));

        let result = DemoSettings::from_sources(&properties, no_env);

        assert!(matches!(result, Err(DemoError::ConfigError(_))));
    }

    #[test]
    fn test_invalid_port() {
        let dir = TempDir::new().unwrap();
        let contents = BASE.replace("master_port=9200", "master_port=ninety");

        let err = DemoSettings::from_sources(&reader(&dir, &contents), no_env).unwrap_err();

        assert!(err.to_string().contains("master_port"));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let dir = TempDir::new().unwrap();
        let contents = format!("{}scroll_page_size=0\n", BASE);

        let result = DemoSettings::from_sources(&reader(&dir, &contents), no_env);

        assert!(result.is_err());
    }

    #[test]
    fn test_optional_keys() {
        let dir = TempDir::new().unwrap();
        let contents = format!(
            "{}scheme=https\n\
             health_timeout_secs=5\n\
             request_timeout_secs=0\n\
             scroll_page_size=10\n\
             scroll_max_pages=3\n\
             query_from=18\n\
             query_to=40\n\
             delete_field=age\n\
             delete_value=20\n\
             data_file=data.json\n",
            BASE
        );

        let settings = DemoSettings::from_sources(&reader(&dir, &contents), no_env).unwrap();

        assert_eq!(settings.address.scheme, "https");
        assert_eq!(settings.connector.health_timeout, Duration::from_secs(5));
        assert_eq!(settings.connector.request_timeout, None);
        assert_eq!(settings.scroll.page_size, 10);
        assert_eq!(settings.scroll.max_pages, 3);
        assert_eq!(settings.query_range, AgeRange::new(18, 40));
        assert_eq!(settings.delete_field, "age");
        assert_eq!(settings.delete_value, "20");
        assert_eq!(settings.data_file, Some(dir.path().join("data.json")));
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = TempDir::new().unwrap();
        let overrides: HashMap<String, String> = [
            ("SEARCH_DEMO_MASTER_PORT", "9201"),
            ("SEARCH_DEMO_INDEX_NAME", "people-v2"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let settings =
            DemoSettings::from_sources(&reader(&dir, BASE), |name| overrides.get(name).cloned())
                .unwrap();

        assert_eq!(settings.address.port, 9201);
        assert_eq!(settings.index_name, "people-v2");
        assert_eq!(settings.index_type, "person");
    }
}
