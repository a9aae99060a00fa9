//! # Error Types: Structured Error Hierarchy
//!
//! Defines the error categories shared across rulepack. Every crate keeps its
//! own `thiserror` enum for detail and converts into [`RulepackError`] when a
//! failure crosses a crate boundary.
//!
//! ## Design
//!
//! - Every error is terminal. Nothing in the pipeline retries or recovers.
//! - Validation errors carry the full concatenated error text so a single
//!   diagnostic line explains every violation.

use thiserror::Error;

/// Top-level error category for rulepack.
#[derive(Error, Debug)]
pub enum RulepackError {
    /// The schema document could not be produced or compiled.
    #[error("schema generation error: {0}")]
    SchemaGeneration(String),

    /// A local resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Remote transport failure.
    #[error("network error: {0}")]
    Network(String),

    /// A source produced a body that is not valid JSON.
    #[error("parse error: {0}")]
    Parse(String),

    /// The configuration does not match the expected format.
    #[error("the configuration does not match expected format: {0}")]
    Validation(String),

    /// The artifact is not valid gzip framing.
    #[error("corrupt artifact: {0}")]
    CorruptArtifact(String),

    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
