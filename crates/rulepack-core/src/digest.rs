//! # Content Digest: Artifact Identifiers
//!
//! A SHA-256 digest over the packed artifact bytes. Two builds of the same
//! configuration produce the same digest, so the digest printed after a
//! build can be compared with the one reported by `rulepack inspect`.

use sha2::{Digest, Sha256};

/// A SHA-256 digest of an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest {
    bytes: [u8; 32],
}

impl ContentDigest {
    /// Wrap a raw 32-byte digest value.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

/// Compute a SHA-256 digest of arbitrary bytes.
pub fn sha256_digest(data: &[u8]) -> ContentDigest {
    let hash = Sha256::digest(data);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest::new(bytes)
}

/// Convenience wrapper around [`sha256_digest()`] returning the hex string.
pub fn sha256_hex(data: &[u8]) -> String {
    sha256_digest(data).to_hex()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_matches_known_vector() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn display_carries_algorithm_prefix() {
        let digest = sha256_digest(b"abc");
        let shown = digest.to_string();
        assert!(shown.starts_with("sha256:"));
        assert_eq!(shown.len(), "sha256:".len() + 64);
        assert_eq!(
            digest.to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn digest_is_deterministic() {
        assert_eq!(sha256_digest(b"[]"), sha256_digest(b"[]"));
        assert_ne!(sha256_digest(b"[]"), sha256_digest(b"[ ]"));
    }
}
