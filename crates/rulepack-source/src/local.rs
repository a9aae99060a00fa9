//! Local file source.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::SourceError;
use crate::ConfigSource;

/// Default input path, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "data/SpeedReaderConfig.json";

/// Reads a configuration document from a JSON file.
#[derive(Debug, Clone)]
pub struct LocalFileSource {
    path: PathBuf,
}

impl LocalFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigSource for LocalFileSource {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    async fn fetch(&self) -> Result<Value, SourceError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SourceError::NotFound {
                    path: self.path.clone(),
                }
            } else {
                SourceError::Io {
                    path: self.path.clone(),
                    source: e,
                }
            }
        })?;

        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "read configuration file");

        serde_json::from_slice(&bytes).map_err(|source| SourceError::Parse {
            origin: self.path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn reads_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"[{"domain":"example.com","url_rules":["example.com/*"]}]"#).unwrap();

        let value = LocalFileSource::new(&path).fetch().await.unwrap();
        assert_eq!(value, json!([{"domain": "example.com", "url_rules": ["example.com/*"]}]));
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = LocalFileSource::new(dir.path().join("absent.json"))
            .fetch()
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::NotFound { .. }), "got: {err}");
    }

    #[tokio::test]
    async fn directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = LocalFileSource::new(dir.path()).fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }), "got: {err}");
    }

    #[tokio::test]
    async fn invalid_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "domain: example.com").unwrap();

        let err = LocalFileSource::new(&path).fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Parse { .. }), "got: {err}");
    }

    #[test]
    fn describe_names_the_path() {
        let source = LocalFileSource::new("data/SpeedReaderConfig.json");
        assert_eq!(source.describe(), "file data/SpeedReaderConfig.json");
        assert_eq!(source.path(), Path::new(DEFAULT_CONFIG_FILE));
    }
}
