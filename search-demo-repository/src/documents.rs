//! Loading documents from a JSON file.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use crate::errors::SearchError;

/// Read a JSON array of objects from `path`.
///
/// Each element becomes one index request without transformation. An
/// element that is not an object is rejected, naming its position.
pub async fn load_documents(path: &Path) -> Result<Vec<Value>, SearchError> {
    let raw = tokio::fs::read_to_string(path).await?;
    let parsed: Value = serde_json::from_str(&raw)?;

    let Value::Array(items) = parsed else {
        return Err(SearchError::parse(format!(
            "{} does not contain a JSON array",
            path.display()
        )));
    };

    for (position, item) in items.iter().enumerate() {
        if !item.is_object() {
            return Err(SearchError::parse(format!(
                "element {} of {} is not a JSON object",
                position,
                path.display()
            )));
        }
        debug!(document = %item, "Loaded document");
    }

    info!(path = %path.display(), count = items.len(), "Loaded documents from file");
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_array_of_objects() {
        let file = write_temp(r#"[{"name": "Mark Twain", "age": 75}, {"name": "John Doe", "age": 20}]"#);

        let documents = load_documents(file.path()).await.unwrap();

        assert_eq!(documents.len(), 2);
        assert_eq!(documents[1]["name"], "John Doe");
    }

    #[tokio::test]
    async fn test_load_empty_array() {
        let file = write_temp("[]");
        assert!(load_documents(file.path()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let result = load_documents(Path::new("/nonexistent/data.json")).await;
        assert!(matches!(result, Err(SearchError::Io(_))));
    }

    #[tokio::test]
    async fn test_malformed_json_is_parse_error() {
        let file = write_temp(r#"[{"name": "broken""#);
        let result = load_documents(file.path()).await;
        assert!(matches!(result, Err(SearchError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_not_an_array() {
        let file = write_temp(r#"{"name": "Mark Twain"}"#);
        let result = load_documents(file.path()).await;
        assert!(matches!(result, Err(SearchError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_non_object_element() {
        let file = write_temp(r#"[{"name": "Mark Twain"}, 42]"#);

        let err = load_documents(file.path()).await.unwrap_err();

        assert!(err.to_string().contains("element 1"));
    }
}
