//! # rulepack-schema: Schema Provider & Validator
//!
//! Checks configuration documents against the SpeedReader configuration
//! schema before they are packed.
//!
//! ## Schema Provider (`provider`)
//!
//! [`SchemaDocument`] wraps the schema compiled into the binary from
//! `schemas/configuration.schema.json`, or an override loaded from disk.
//! Either way the root type `Configuration` must be defined.
//!
//! ## Validation (`validate`)
//!
//! [`Validator`] normalizes a copy of the document and then runs a
//! compiled `jsonschema` validator over it, collecting every violation:
//!
//! - [`Validator::validate`]: returns a [`ValidationOutcome`] with the
//!   normalized document and all violations.
//! - [`Validator::validate_typed`]: same, then deserializes into
//!   [`rulepack_core::Configuration`].
//!
//! ## Crate Policy
//!
//! - Depends only on `rulepack-core` internally.
//! - The normalization rules (array coercion, additional-property removal,
//!   default filling) are relied on by existing artifact consumers. Do not
//!   tighten them into strict validation.

mod normalize;
pub mod provider;
pub mod validate;

pub use provider::{SchemaDocument, SchemaOrigin, ROOT_TYPE};
pub use validate::{
    validate, SchemaError, ValidationError, ValidationOutcome, Validator, Violation, Violations,
};
