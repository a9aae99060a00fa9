//! # rulepack-core: Foundational Types for rulepack
//!
//! This crate is the leaf of the rulepack workspace. It defines the domain
//! rule data model that the SpeedReader runtime consumes, the canonical byte
//! representation that gets compressed into the artifact, and the error
//! categories every other crate reports into.
//!
//! ## Key Design Principles
//!
//! 1. **Typed configuration.** The artifact is always serialized from a
//!    [`Configuration`] value, never from an arbitrary JSON tree, so the
//!    runtime only ever sees fields it knows about.
//!
//! 2. **`CanonicalBytes` newtype.** The bytes handed to the codec flow
//!    through [`CanonicalBytes::new()`]. No raw `serde_json::to_vec()` at
//!    call sites.
//!
//! 3. **Digests over artifact bytes.** [`sha256_digest()`] identifies a
//!    packed artifact so builds can be compared without unpacking.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `rulepack-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod model;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, sha256_hex, ContentDigest};
pub use error::{CanonicalizationError, RulepackError};
pub use model::{AttributePair, AttributeRewrite, Configuration, DomainRule, RewriteRules};
