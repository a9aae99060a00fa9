//! # Canonical Serialization: Artifact Payload Bytes
//!
//! This module defines `CanonicalBytes`, the sole construction path for the
//! bytes that get compressed into an artifact.
//!
//! ## Invariant
//!
//! The inner field is private and the only constructor takes a typed
//! [`Configuration`]. A raw JSON tree that skipped validation cannot reach
//! the codec, and every artifact is produced by the same encoder.
//!
//! ## Encoding
//!
//! Compact UTF-8 JSON, no whitespace, object fields in declaration order,
//! absent optional fields omitted. For a document that was already in that
//! form the output is byte-identical to the input, which is what the
//! runtime component and its existing fixtures expect.

use crate::error::CanonicalizationError;
use crate::model::Configuration;

/// Bytes produced exclusively by canonical encoding of a [`Configuration`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Encode a configuration document.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::SerializationFailed` if JSON
    /// serialization fails.
    pub fn new(config: &Configuration) -> Result<Self, CanonicalizationError> {
        let bytes = serde_json::to_vec(config)?;
        Ok(Self(bytes))
    }

    /// Access the encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the encoded byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the encoded byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes self and returns the inner bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
