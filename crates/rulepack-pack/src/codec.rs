//! # Codec: gzip framing
//!
//! The artifact is a single gzip member wrapping the canonical JSON bytes.
//! The runtime component opens it with any RFC 1952 reader, so the framing
//! is plain gzip with the default compression level and no extra headers.
//!
//! Round-trip law: `decompress(&compress(x)?)? == x` for every byte
//! sequence `x`.

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::PackError;

/// The two magic bytes that open every gzip member.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Fixed gzip header length; nothing shorter can be a gzip member.
const GZIP_HEADER_LEN: usize = 10;

/// Compress `data` into a gzip member.
///
/// # Errors
///
/// Returns `PackError::Io` if the encoder fails. Writing into memory does
/// not fail in practice.
pub fn compress(data: &[u8]) -> Result<Vec<u8>, PackError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Decompress a gzip member produced by [`compress`].
///
/// # Errors
///
/// Returns `PackError::CorruptArtifact` if the input does not start with
/// the gzip magic, is truncated, or fails its checksum.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, PackError> {
    if data.len() < GZIP_HEADER_LEN || data[..2] != GZIP_MAGIC {
        return Err(PackError::CorruptArtifact {
            reason: format!("missing gzip header ({} bytes of input)", data.len()),
        });
    }

    let mut decoder = GzDecoder::new(data);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| PackError::CorruptArtifact {
            reason: format!("invalid gzip stream: {e}"),
        })?;
    Ok(decompressed)
}
