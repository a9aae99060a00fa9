//! # Artifact: packed configuration
//!
//! An [`Artifact`] is the gzip-compressed canonical encoding of a
//! [`Configuration`] together with the SHA-256 digest of the compressed
//! bytes. It is the unit written to disk and shipped to the runtime.
//!
//! ## Persistence
//!
//! [`write_artifact`] writes to a temporary file in the destination
//! directory and renames it into place. A failed write leaves the previous
//! file (or no file) at the destination, never a truncated artifact.

use std::io::Write;
use std::path::Path;

use rulepack_core::{sha256_digest, CanonicalBytes, Configuration, ContentDigest};

use crate::codec;
use crate::error::PackError;

/// Compressed configuration bytes plus their digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    bytes: Vec<u8>,
    digest: ContentDigest,
}

impl Artifact {
    /// Compress canonical bytes into an artifact.
    ///
    /// # Errors
    ///
    /// Returns `PackError::Io` if the encoder fails.
    pub fn pack(payload: &CanonicalBytes) -> Result<Self, PackError> {
        let bytes = codec::compress(payload.as_bytes())?;
        Ok(Self::from_compressed(bytes))
    }

    /// Canonicalize and compress a configuration in one step.
    ///
    /// # Errors
    ///
    /// Returns `PackError::Canonicalization` if encoding fails.
    pub fn from_configuration(config: &Configuration) -> Result<Self, PackError> {
        Self::pack(&CanonicalBytes::new(config)?)
    }

    /// Wrap bytes that are already compressed, e.g. read back from disk.
    pub fn from_compressed(bytes: Vec<u8>) -> Self {
        let digest = sha256_digest(&bytes);
        Self { bytes, digest }
    }

    /// The compressed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Compressed size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the artifact holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// SHA-256 of the compressed bytes.
    pub fn digest(&self) -> &ContentDigest {
        &self.digest
    }

    /// Decompress to the raw JSON payload.
    ///
    /// # Errors
    ///
    /// Returns `PackError::CorruptArtifact` if the bytes are not gzip.
    pub fn payload(&self) -> Result<Vec<u8>, PackError> {
        codec::decompress(&self.bytes)
    }

    /// Decompress and parse the configuration.
    ///
    /// # Errors
    ///
    /// Returns `PackError::CorruptArtifact` for bad framing and
    /// `PackError::Payload` if the payload is not a configuration document.
    pub fn unpack(&self) -> Result<Configuration, PackError> {
        let payload = self.payload()?;
        serde_json::from_slice(&payload).map_err(PackError::Payload)
    }
}

/// Read an artifact from disk without decompressing it.
///
/// # Errors
///
/// Returns `PackError::Io` if the file cannot be read.
pub fn read_artifact(path: &Path) -> Result<Artifact, PackError> {
    let bytes = std::fs::read(path)?;
    Ok(Artifact::from_compressed(bytes))
}

/// Persist an artifact atomically, creating the parent directory if needed.
///
/// # Errors
///
/// Returns `PackError::Write` if any step fails. The destination is left
/// as it was before the call.
pub fn write_artifact(path: &Path, artifact: &Artifact) -> Result<(), PackError> {
    let write_err = |source: std::io::Error| PackError::Write {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(write_err)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(write_err)?;
    tmp.write_all(artifact.as_bytes()).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    tracing::debug!(
        path = %path.display(),
        bytes = artifact.len(),
        digest = %artifact.digest(),
        "artifact written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulepack_core::DomainRule;

    fn sample() -> Configuration {
        Configuration::new(vec![DomainRule::new(
            "example.com",
            vec!["example.com/*".into()],
        )])
    }

    #[test]
    fn pack_then_unpack() {
        let artifact = Artifact::from_configuration(&sample()).unwrap();
        assert_eq!(artifact.as_bytes()[..2], crate::codec::GZIP_MAGIC);
        assert_eq!(artifact.unpack().unwrap(), sample());
        assert_eq!(
            artifact.payload().unwrap(),
            br#"[{"domain":"example.com","url_rules":["example.com/*"]}]"#
        );
    }

    #[test]
    fn digest_covers_compressed_bytes() {
        let artifact = Artifact::from_configuration(&sample()).unwrap();
        assert_eq!(artifact.digest(), &sha256_digest(artifact.as_bytes()));
        let reread = Artifact::from_compressed(artifact.as_bytes().to_vec());
        assert_eq!(reread, artifact);
    }

    #[test]
    fn unpack_rejects_non_gzip() {
        let artifact = Artifact::from_compressed(b"not gzip at all".to_vec());
        assert!(matches!(
            artifact.unpack().unwrap_err(),
            PackError::CorruptArtifact { .. }
        ));
    }

    #[test]
    fn unpack_rejects_non_configuration_payload() {
        let bytes = crate::codec::compress(br#"{"not": "an array"}"#).unwrap();
        let err = Artifact::from_compressed(bytes).unpack().unwrap_err();
        assert!(matches!(err, PackError::Payload(_)), "got: {err}");
    }

    #[test]
    fn write_creates_parent_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("speedreader-updater.dat");
        let artifact = Artifact::from_configuration(&sample()).unwrap();

        write_artifact(&path, &artifact).unwrap();

        let reread = read_artifact(&path).unwrap();
        assert_eq!(reread, artifact);
        assert_eq!(reread.unpack().unwrap(), sample());
    }

    #[test]
    fn write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.dat");
        std::fs::write(&path, b"stale").unwrap();

        let artifact = Artifact::from_configuration(&sample()).unwrap();
        write_artifact(&path, &artifact).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), artifact.as_bytes());
    }

    #[test]
    fn write_into_file_parent_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"a file, not a directory").unwrap();
        let path = blocker.join("out.dat");

        let artifact = Artifact::from_configuration(&sample()).unwrap();
        let err = write_artifact(&path, &artifact).unwrap_err();
        assert!(matches!(err, PackError::Write { .. }), "got: {err}");
        assert!(!path.exists());
        // No stray temp files next to the blocker.
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
