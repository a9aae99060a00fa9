//! Config source error types.

use std::path::PathBuf;

use rulepack_core::RulepackError;

/// Errors from fetching a configuration document.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The local file does not exist.
    #[error("configuration file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Reading the local file failed for a reason other than absence.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The remote base URL or path does not form a valid URL.
    #[error("invalid remote URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// HTTP transport failure or non-success status.
    #[error("fetching {url} failed: {reason}")]
    Network { url: String, reason: String },

    /// The document body is not valid JSON.
    #[error("failed to parse JSON from {origin}: {source}")]
    Parse {
        origin: String,
        source: serde_json::Error,
    },
}

impl From<SourceError> for RulepackError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::NotFound { .. } => RulepackError::NotFound(err.to_string()),
            SourceError::Io { path, source } => RulepackError::Io(std::io::Error::new(
                source.kind(),
                format!("{}: {source}", path.display()),
            )),
            SourceError::InvalidUrl { .. } | SourceError::Network { .. } => {
                RulepackError::Network(err.to_string())
            }
            SourceError::Parse { .. } => RulepackError::Parse(err.to_string()),
        }
    }
}
