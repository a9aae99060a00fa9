//! # rulepack-pack: Artifact Packing
//!
//! Turns a validated configuration into the compressed artifact the
//! SpeedReader runtime loads, and reads artifacts back:
//!
//! - **Codec** ([`codec`]): gzip compress/decompress with a strict check
//!   that decompression input really is gzip.
//!
//! - **Artifact** ([`artifact`]): compressed bytes plus SHA-256 digest,
//!   and atomic persistence via a temp file and rename.
//!
//! ## Crate Policy
//!
//! - Depends only on `rulepack-core` internally.
//! - Artifacts are always built from [`rulepack_core::CanonicalBytes`].

pub mod artifact;
pub mod codec;
pub mod error;

pub use artifact::{read_artifact, write_artifact, Artifact};
pub use codec::{compress, decompress};
pub use error::PackError;
