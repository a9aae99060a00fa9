//! Pack-specific error types.
//!
//! Structured errors for compressing, decompressing and persisting
//! artifacts. Write errors carry the destination path.

use std::path::PathBuf;

use thiserror::Error;

use rulepack_core::RulepackError;

/// Errors that can occur during pack operations.
#[derive(Debug, Error)]
pub enum PackError {
    /// The input is not valid gzip framing.
    #[error("corrupt artifact: {reason}")]
    CorruptArtifact { reason: String },

    /// The decompressed payload is not a configuration document.
    #[error("artifact payload is not a configuration document: {0}")]
    Payload(#[source] serde_json::Error),

    /// Writing the artifact failed. Nothing was left at `path`.
    #[error("failed to write artifact {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Canonicalization error (delegated from rulepack-core).
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] rulepack_core::CanonicalizationError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<PackError> for RulepackError {
    fn from(err: PackError) -> Self {
        match err {
            PackError::CorruptArtifact { .. } | PackError::Payload(_) => {
                RulepackError::CorruptArtifact(err.to_string())
            }
            PackError::Canonicalization(e) => RulepackError::Canonicalization(e),
            PackError::Write { path, source } => RulepackError::Io(std::io::Error::new(
                source.kind(),
                format!("{}: {source}", path.display()),
            )),
            PackError::Io(e) => RulepackError::Io(e),
        }
    }
}
