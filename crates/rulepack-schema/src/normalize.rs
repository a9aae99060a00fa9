//! # Lenient Normalization
//!
//! Rewrites a JSON document in place so that it lines up with the schema
//! before constraint checking. Existing artifact consumers were built
//! against documents repaired this way, so the rules are fixed:
//!
//! 1. **Type coercion.** A value whose JSON type is not allowed by the
//!    schema is converted to the first allowed type it can be converted to.
//!    A scalar becomes a one-element array where an array is expected, and
//!    a one-element array collapses to its item where a scalar is expected.
//! 2. **Additional properties.** Where an object schema says
//!    `"additionalProperties": false`, undeclared keys are removed.
//! 3. **Defaults.** A declared property that is absent, `null`, or `""` and
//!    whose schema carries a `default` receives a copy of that default.
//! 4. **Nullable optionals.** An optional property flagged `"nullable": true`
//!    whose value is `null` is removed, so it reads as "not present".
//!
//! Anything that still does not fit after these steps is left for the
//! constraint check to report.

use serde_json::{Map, Number, Value};

/// Maximum `$ref` hops followed before giving up on a reference chain.
const MAX_REF_DEPTH: usize = 32;

/// Walks a document alongside its schema, resolving local `$ref`s
/// against the schema root.
pub(crate) struct Normalizer<'s> {
    root: &'s Value,
}

impl<'s> Normalizer<'s> {
    pub(crate) fn new(root: &'s Value) -> Self {
        Self { root }
    }

    /// Normalize `value` against the root schema.
    pub(crate) fn normalize_root(&self, value: &mut Value) {
        self.normalize(self.root, value);
    }

    /// Follow local `#/...` references until a concrete schema is reached.
    ///
    /// Remote or dangling references resolve to the referencing schema
    /// itself, which normalizes as a no-op apart from its sibling keywords.
    fn resolve(&self, mut schema: &'s Value) -> &'s Value {
        for _ in 0..MAX_REF_DEPTH {
            let Some(target) = schema
                .get("$ref")
                .and_then(Value::as_str)
                .and_then(|r| r.strip_prefix('#'))
                .and_then(|pointer| self.root.pointer(pointer))
            else {
                return schema;
            };
            schema = target;
        }
        schema
    }

    fn normalize(&self, schema: &'s Value, value: &mut Value) {
        let schema = self.resolve(schema);

        let allowed = allowed_types(schema);
        if !allowed.is_empty() {
            coerce(value, &allowed);
        }

        match value {
            Value::Object(map) => self.normalize_object(schema, map),
            Value::Array(items) => self.normalize_array(schema, items),
            _ => {}
        }
    }

    fn normalize_object(&self, schema: &'s Value, map: &mut Map<String, Value>) {
        let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
            return;
        };

        if schema.get("additionalProperties") == Some(&Value::Bool(false)) {
            map.retain(|key, _| properties.contains_key(key));
        }

        let required: Vec<&str> = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|r| r.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        for (name, prop_schema) in properties {
            let resolved = self.resolve(prop_schema);

            if is_empty_slot(map.get(name)) {
                if let Some(default) = keyword(prop_schema, resolved, "default") {
                    map.insert(name.clone(), default.clone());
                }
            }

            if map.get(name) == Some(&Value::Null)
                && !required.contains(&name.as_str())
                && keyword(prop_schema, resolved, "nullable") == Some(&Value::Bool(true))
            {
                map.remove(name);
                continue;
            }

            if let Some(child) = map.get_mut(name) {
                self.normalize(prop_schema, child);
            }
        }
    }

    fn normalize_array(&self, schema: &'s Value, items: &mut [Value]) {
        match schema.get("items") {
            Some(Value::Array(tuple)) => {
                for (item_schema, item) in tuple.iter().zip(items.iter_mut()) {
                    self.normalize(item_schema, item);
                }
            }
            Some(item_schema @ Value::Object(_)) => {
                for item in items.iter_mut() {
                    self.normalize(item_schema, item);
                }
            }
            _ => {}
        }
    }
}

/// Look a keyword up on the property schema first, then on its `$ref` target.
fn keyword<'s>(raw: &'s Value, resolved: &'s Value, name: &str) -> Option<&'s Value> {
    raw.get(name).or_else(|| resolved.get(name))
}

/// Absent, `null`, or the empty string.
fn is_empty_slot(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// The JSON types a schema permits, in declaration order.
fn allowed_types(schema: &Value) -> Vec<&str> {
    match schema.get("type") {
        Some(Value::String(t)) => vec![t.as_str()],
        Some(Value::Array(ts)) => ts.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

/// Whether `value` already satisfies one of the `allowed` types.
fn matches_any(value: &Value, allowed: &[&str]) -> bool {
    allowed.iter().any(|t| match (*t, value) {
        ("null", Value::Null)
        | ("boolean", Value::Bool(_))
        | ("number", Value::Number(_))
        | ("string", Value::String(_))
        | ("array", Value::Array(_))
        | ("object", Value::Object(_)) => true,
        ("integer", Value::Number(n)) => is_integral(n),
        _ => false,
    })
}

fn is_integral(n: &Number) -> bool {
    n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
}

const SCALAR_TYPES: [&str; 5] = ["string", "number", "integer", "boolean", "null"];

/// Coerce `value` to the first allowed type it converts to. Leaves it
/// untouched when no conversion applies.
pub(crate) fn coerce(value: &mut Value, allowed: &[&str]) {
    if matches_any(value, allowed) {
        return;
    }

    // A one-element array standing in for a scalar.
    let wants_scalar = allowed.iter().any(|t| SCALAR_TYPES.contains(t));
    if wants_scalar && !allowed.contains(&"array") {
        if let Value::Array(items) = value {
            if items.len() == 1 && !items[0].is_array() && !items[0].is_object() {
                let inner = items.remove(0);
                *value = inner;
                if matches_any(value, allowed) {
                    return;
                }
            }
        }
    }

    for target in allowed {
        if let Some(converted) = convert(value, target) {
            *value = converted;
            return;
        }
    }
}

fn convert(value: &Value, target: &str) -> Option<Value> {
    match (target, value) {
        ("string", Value::Number(n)) => Some(Value::String(n.to_string())),
        ("string", Value::Bool(b)) => Some(Value::String(b.to_string())),
        ("string", Value::Null) => Some(Value::String(String::new())),

        ("number" | "integer", Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            if let Ok(i) = trimmed.parse::<i64>() {
                return Some(Value::Number(i.into()));
            }
            if target == "integer" {
                return None;
            }
            trimmed
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
        }
        ("number" | "integer", Value::Bool(b)) => Some(Value::Number(u8::from(*b).into())),
        ("number" | "integer", Value::Null) => Some(Value::Number(0.into())),

        ("boolean", Value::String(s)) => match s.as_str() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        ("boolean", Value::Number(n)) => match n.as_f64() {
            Some(f) if f == 1.0 => Some(Value::Bool(true)),
            Some(f) if f == 0.0 => Some(Value::Bool(false)),
            _ => None,
        },
        ("boolean", Value::Null) => Some(Value::Bool(false)),

        ("null", Value::String(s)) if s.is_empty() => Some(Value::Null),
        ("null", Value::Number(n)) if n.as_f64() == Some(0.0) => Some(Value::Null),
        ("null", Value::Bool(false)) => Some(Value::Null),

        ("array", other) if !other.is_array() => Some(Value::Array(vec![other.clone()])),

        _ => None,
    }
}
