//! Flat key-value configuration file.
//!
//! The file uses the Java properties format: `key=value`, `key: value` or
//! `key value`, with `#` and `!` comments. Values are taken literally, so
//! `delete_value=Peter Pan` needs no quoting. Nothing read here is exported
//! to the process environment.

use std::collections::BTreeMap;
use std::error::Error;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use java_properties::{PropertiesIter, PropertiesWriter};
use tracing::{debug, error, warn};

/// In-memory copy of a configuration file.
///
/// Loading never fails: problems are logged and the affected keys are
/// simply absent, so `read` returns `None` for them.
#[derive(Debug, Clone)]
pub struct PropertyReader {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl PropertyReader {
    /// Read and parse the file at `path`.
    ///
    /// A malformed line stops parsing; the entries before it are kept.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut values = BTreeMap::new();

        match File::open(&path) {
            Ok(file) => {
                let parsed = PropertiesIter::new(BufReader::new(file)).read_into(|key, value| {
                    values.insert(key, value);
                });
                if let Err(e) = parsed {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        kept = values.len(),
                        "Stopped reading configuration file"
                    );
                }
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to read configuration file");
            }
        }

        debug!(path = %path.display(), keys = values.len(), "Configuration loaded");
        Self { path, values }
    }

    /// Look up `key`. No file access.
    pub fn read(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Set `key` in memory and persist the whole file.
    ///
    /// The in-memory value is updated even when persisting fails; the
    /// failure is logged and `false` is returned.
    pub fn write(&mut self, key: &str, value: &str) -> bool {
        self.values.insert(key.to_string(), value.to_string());

        match self.persist() {
            Ok(()) => true,
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Failed to write configuration file");
                false
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Rewrite the file with every entry, sorted by key.
    fn persist(&self) -> Result<(), Box<dyn Error>> {
        let mut contents = Vec::new();
        {
            let mut writer = PropertiesWriter::new(&mut contents);
            writer.write_comment("search-demo configuration")?;
            for (key, value) in &self.values {
                writer.write(key, value)?;
            }
            writer.finish()?;
        }
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("config.properties");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_key_values() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "# cluster\n\
             cluster_name=elasticsearch\n\
             master_ip = 127.0.0.1\n\
             \n\
             ! port\n\
             master_port:9200\n",
        );

        let reader = PropertyReader::load(&path);

        assert_eq!(reader.len(), 3);
        assert_eq!(reader.read("cluster_name"), Some("elasticsearch"));
        assert_eq!(reader.read("master_ip"), Some("127.0.0.1"));
        assert_eq!(reader.read("master_port"), Some("9200"));
        assert_eq!(reader.read("index_name"), None);
    }

    #[test]
    fn test_values_are_literal() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "delete_value=Peter Pan\n\
             index_name=peo$ple\n\
             master_ip: 10.0.0.1\n\
             quoted=\"kept\"\n",
        );

        let reader = PropertyReader::load(&path);

        assert_eq!(reader.read("delete_value"), Some("Peter Pan"));
        assert_eq!(reader.read("index_name"), Some("peo$ple"));
        assert_eq!(reader.read("master_ip"), Some("10.0.0.1"));
        assert_eq!(reader.read("quoted"), Some("\"kept\""));
    }

    #[test]
    fn test_whitespace_separates_key_without_equals() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "index_name=people\nindex_type person\n");

        let reader = PropertyReader::load(&path);

        assert_eq!(reader.read("index_name"), Some("people"));
        assert_eq!(reader.read("index_type"), Some("person"));
    }

    #[test]
    fn test_missing_file_leaves_reader_empty() {
        let dir = TempDir::new().unwrap();

        let reader = PropertyReader::load(dir.path().join("absent.properties"));

        assert!(reader.is_empty());
        assert_eq!(reader.read("cluster_name"), None);
    }

    #[test]
    fn test_write_persists_and_reloads() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "index_name=people\n");
        let mut reader = PropertyReader::load(&path);

        assert!(reader.write("master_port", "9201"));
        assert!(reader.write("delete_value", "Peter Pan"));
        assert!(reader.write("odd", "it's $HOME #1 = \"quoted\": yes"));

        assert_eq!(reader.read("master_port"), Some("9201"));

        let reloaded = PropertyReader::load(&path);
        assert_eq!(reloaded.len(), 4);
        assert_eq!(reloaded.read("index_name"), Some("people"));
        assert_eq!(reloaded.read("master_port"), Some("9201"));
        assert_eq!(reloaded.read("delete_value"), Some("Peter Pan"));
        assert_eq!(reloaded.read("odd"), Some("it's $HOME #1 = \"quoted\": yes"));
    }

    #[test]
    fn test_write_failure_keeps_value_in_memory() {
        let dir = TempDir::new().unwrap();
        let mut reader = PropertyReader::load(dir.path().join("missing-dir").join("config.properties"));

        assert!(!reader.write("index_name", "people"));
        assert_eq!(reader.read("index_name"), Some("people"));
    }
}
