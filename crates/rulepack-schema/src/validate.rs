//! # Schema Validation
//!
//! Lenient validation of configuration documents against the schema
//! (Draft 7).
//!
//! ## Pipeline
//!
//! 1. The input is copied and normalized (see [`crate::normalize`]):
//!    scalars coerced to arrays, undeclared properties stripped, declared
//!    defaults filled in.
//! 2. The normalized copy is checked with a compiled `jsonschema`
//!    validator. Every violation is collected; validation never stops at
//!    the first failure.
//! 3. The normalized copy is returned as the canonical document. Callers
//!    must use it rather than their original input.
//!
//! ## Schema Resolution
//!
//! Only local `#/definitions/...` references are supported. A retriever
//! that refuses every external URI is installed so validation never makes
//! network requests.

use std::fmt;

use jsonschema::{Retrieve, Uri, ValidationOptions};
use serde_json::Value;
use thiserror::Error;

use rulepack_core::{Configuration, RulepackError};

use crate::normalize::Normalizer;
use crate::provider::SchemaDocument;

/// Retriever that refuses to resolve anything outside the schema document.
struct OfflineRetriever;

impl Retrieve for OfflineRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        Err(format!("external schema reference not supported: {}", uri.as_str()).into())
    }
}

/// The schema document could not be produced or compiled.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The schema file could not be read or parsed.
    #[error("schema load error for '{origin}': {reason}")]
    Load {
        /// Schema file path or `embedded`.
        origin: String,
        /// Reason the schema could not be loaded.
        reason: String,
    },

    /// The schema does not define the root type.
    #[error("schema '{origin}' does not define root type '{root}'")]
    RootTypeMissing {
        /// Schema file path or `embedded`.
        origin: String,
        /// The root type that was looked up.
        root: String,
    },

    /// The compiled validator could not be built (e.g., invalid schema).
    #[error("validator build error for schema '{origin}': {reason}")]
    Build {
        /// Schema file path or `embedded`.
        origin: String,
        /// Reason the validator could not be built.
        reason: String,
    },
}

/// The document failed validation.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The normalized document still violates the schema.
    #[error("{error_text}")]
    Rejected {
        /// Concatenated, lower-cased violation text.
        error_text: String,
        /// Structured list of individual violations.
        violations: Violations,
    },

    /// The document passed the schema but does not fit the typed model.
    #[error("validated document does not match the configuration model: {0}")]
    Model(#[source] serde_json::Error),
}

impl From<SchemaError> for RulepackError {
    fn from(err: SchemaError) -> Self {
        RulepackError::SchemaGeneration(err.to_string())
    }
}

impl From<ValidationError> for RulepackError {
    fn from(err: ValidationError) -> Self {
        RulepackError::Validation(err.to_string())
    }
}

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer path to the violating field in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of validation violations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations {
    violations: Vec<Violation>,
}

impl Violations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Each violation rendered as one lower-cased line.
    pub fn messages(&self) -> Vec<String> {
        self.violations
            .iter()
            .map(|v| v.to_string().to_lowercase())
            .collect()
    }

    /// All violations joined with `", "` and lower-cased. Empty when valid.
    pub fn error_text(&self) -> String {
        self.messages().join(", ")
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.error_text())
    }
}

/// Result of validating one document.
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    /// True when the normalized document satisfies every constraint.
    pub valid: bool,
    /// Every violation found, in validator order.
    pub violations: Violations,
    /// The normalized document. Canonical whether or not it is valid.
    pub document: Value,
}

impl ValidationOutcome {
    /// Violation lines, lower-cased.
    pub fn errors(&self) -> Vec<String> {
        self.violations.messages()
    }

    /// Concatenated violation text; empty when valid.
    pub fn error_text(&self) -> String {
        self.violations.error_text()
    }

    /// Turn the outcome into a typed configuration.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Rejected` if the document is invalid, and
    /// `ValidationError::Model` if it cannot be read as a [`Configuration`].
    pub fn into_configuration(self) -> Result<Configuration, ValidationError> {
        if !self.valid {
            return Err(ValidationError::Rejected {
                error_text: self.violations.error_text(),
                violations: self.violations,
            });
        }
        serde_json::from_value(self.document).map_err(ValidationError::Model)
    }
}

/// A compiled schema plus the normalization rules that go with it.
///
/// Compile once, validate any number of documents. `Send + Sync`.
pub struct Validator {
    schema: SchemaDocument,
    compiled: jsonschema::Validator,
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("schema", &self.schema.origin())
            .finish_non_exhaustive()
    }
}

impl Validator {
    /// Compile a validator for `schema`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Build` if the schema is not a valid Draft 7
    /// schema or references something outside itself.
    pub fn new(schema: SchemaDocument) -> Result<Self, SchemaError> {
        let compiled = build_options()
            .build(schema.as_value())
            .map_err(|e| SchemaError::Build {
                origin: schema.origin().to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { schema, compiled })
    }

    /// Compile the embedded schema.
    ///
    /// # Errors
    ///
    /// See [`SchemaDocument::embedded`] and [`Validator::new`].
    pub fn embedded() -> Result<Self, SchemaError> {
        Self::new(SchemaDocument::embedded()?)
    }

    /// The schema this validator was compiled from.
    pub fn schema(&self) -> &SchemaDocument {
        &self.schema
    }

    /// Normalize a copy of `document` and check it.
    ///
    /// The input is never modified.
    pub fn validate(&self, document: &Value) -> ValidationOutcome {
        self.validate_owned(document.clone())
    }

    /// Normalize `document` in place and check it.
    pub fn validate_owned(&self, mut document: Value) -> ValidationOutcome {
        Normalizer::new(self.schema.as_value()).normalize_root(&mut document);

        let violations: Vec<Violation> = self
            .compiled
            .iter_errors(&document)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        tracing::debug!(
            schema = %self.schema.origin(),
            violations = violations.len(),
            "validated configuration document"
        );

        ValidationOutcome {
            valid: violations.is_empty(),
            violations: Violations { violations },
            document,
        }
    }

    /// Validate and deserialize into the typed model in one step.
    ///
    /// # Errors
    ///
    /// See [`ValidationOutcome::into_configuration`].
    pub fn validate_typed(&self, document: Value) -> Result<Configuration, ValidationError> {
        self.validate_owned(document).into_configuration()
    }
}

/// Compile `schema` and validate `document` against it.
///
/// Convenience for one-off checks; use [`Validator`] to validate several
/// documents against the same schema.
///
/// # Errors
///
/// Returns `SchemaError` if the schema cannot be compiled. An invalid
/// document is not an error here; inspect [`ValidationOutcome::valid`].
pub fn validate(schema: &SchemaDocument, document: Value) -> Result<ValidationOutcome, SchemaError> {
    let validator = Validator::new(schema.clone())?;
    Ok(validator.validate_owned(document))
}

fn build_options() -> ValidationOptions {
    let mut opts = jsonschema::options();
    opts.with_draft(jsonschema::Draft::Draft7);
    opts.with_retriever(OfflineRetriever);
    opts
}
