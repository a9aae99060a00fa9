//! # Schema Provider
//!
//! Supplies the JSON Schema describing a configuration document. The schema
//! is a static, version-controlled file (`schemas/configuration.schema.json`)
//! compiled into the binary. An override file can be loaded for testing a
//! schema change without rebuilding; it must define the root type under
//! `definitions`.

use std::path::Path;

use serde_json::Value;

use crate::validate::SchemaError;

/// Name of the root type every schema document must define.
pub const ROOT_TYPE: &str = "Configuration";

const EMBEDDED_SCHEMA: &str = include_str!("../../../schemas/configuration.schema.json");

/// Where a schema document came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaOrigin {
    /// Compiled into the binary.
    Embedded,
    /// Loaded from a file on disk.
    File(String),
    /// Built in memory.
    Inline,
}

impl std::fmt::Display for SchemaOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Embedded => f.write_str("embedded"),
            Self::File(path) => f.write_str(path),
            Self::Inline => f.write_str("inline"),
        }
    }
}

/// A parsed schema document whose root type has been checked.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    value: Value,
    origin: SchemaOrigin,
}

impl SchemaDocument {
    /// The schema compiled into the binary.
    ///
    /// # Errors
    ///
    /// Fails only if the embedded file is malformed, which the test suite
    /// rules out.
    pub fn embedded() -> Result<Self, SchemaError> {
        let value: Value =
            serde_json::from_str(EMBEDDED_SCHEMA).map_err(|e| SchemaError::Load {
                origin: SchemaOrigin::Embedded.to_string(),
                reason: format!("invalid JSON: {e}"),
            })?;
        Self::checked(value, SchemaOrigin::Embedded)
    }

    /// Load a schema override from disk.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Load` if the file cannot be read or is not JSON,
    /// and `SchemaError::RootTypeMissing` if it does not define
    /// `definitions.Configuration`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let origin = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| SchemaError::Load {
            origin: origin.clone(),
            reason: format!("cannot read file: {e}"),
        })?;
        let value: Value = serde_json::from_str(&content).map_err(|e| SchemaError::Load {
            origin: origin.clone(),
            reason: format!("invalid JSON: {e}"),
        })?;
        Self::checked(value, SchemaOrigin::File(origin))
    }

    /// Wrap an in-memory schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::RootTypeMissing` if the root type is absent.
    pub fn from_value(value: Value) -> Result<Self, SchemaError> {
        Self::checked(value, SchemaOrigin::Inline)
    }

    fn checked(value: Value, origin: SchemaOrigin) -> Result<Self, SchemaError> {
        let has_root = value
            .get("definitions")
            .and_then(|defs| defs.get(ROOT_TYPE))
            .is_some();
        if !has_root {
            return Err(SchemaError::RootTypeMissing {
                origin: origin.to_string(),
                root: ROOT_TYPE.to_string(),
            });
        }
        Ok(Self { value, origin })
    }

    /// The schema as a JSON value.
    pub fn as_value(&self) -> &Value {
        &self.value
    }

    /// Where this schema came from.
    pub fn origin(&self) -> &SchemaOrigin {
        &self.origin
    }

    /// Pretty-printed schema text.
    pub fn to_pretty_string(&self) -> String {
        // Serializing a `Value` cannot fail.
        serde_json::to_string_pretty(&self.value).unwrap_or_default()
    }
}
