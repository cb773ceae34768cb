//! Parameter bags and the validate-then-bind extractor.
//!
//! A [`ParamBag`] is whatever the caller sent. [`extract`] checks it against an
//! operation's [`FieldSpec`] list and produces [`BoundArgs`], which handlers
//! read with typed accessors. Extraction is pure: it never reaches a
//! collaborator, so a bad request is rejected before any side effect.

use super::field::{FieldSpec, is_secret_name};
use crate::error::{ValidationError, ValidationResult};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Untyped key/value input supplied with an operation selector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamBag {
    values: Map<String, Value>,
}

impl ParamBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a JSON object. `null` is treated as an empty bag.
    pub fn from_value(value: Value) -> ValidationResult<Self> {
        match value {
            Value::Object(values) => Ok(Self { values }),
            Value::Null => Ok(Self::default()),
            other => Err(ValidationError::InvalidParams {
                actual: json_type_name(&other).to_string(),
            }),
        }
    }

    /// Parse a JSON text. Blank input is an empty bag.
    pub fn from_json_str(text: &str) -> ValidationResult<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value =
            serde_json::from_str(text).map_err(|e| ValidationError::InvalidParams {
                actual: format!("unparseable JSON ({})", e),
            })?;
        Self::from_value(value)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Present and non-null value for `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key).filter(|v| !v.is_null())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, Value)> for ParamBag {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl TryFrom<Value> for ParamBag {
    type Error = ValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

/// Arguments bound for one operation, keyed by field name.
///
/// Only fields declared in the operation's spec are present; values are
/// already type-checked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArgs {
    values: Map<String, Value>,
}

impl BoundArgs {
    fn bound(&self, field: &str) -> ValidationResult<&Value> {
        self.values
            .get(field)
            .ok_or_else(|| ValidationError::missing_field(field))
    }

    pub fn string(&self, field: &str) -> ValidationResult<String> {
        match self.bound(field)? {
            Value::String(s) => Ok(s.clone()),
            other => Err(ValidationError::invalid_type(
                field,
                "string",
                json_type_name(other),
            )),
        }
    }

    pub fn bool(&self, field: &str) -> ValidationResult<bool> {
        match self.bound(field)? {
            Value::Bool(b) => Ok(*b),
            other => Err(ValidationError::invalid_type(
                field,
                "boolean",
                json_type_name(other),
            )),
        }
    }

    pub fn object(&self, field: &str) -> ValidationResult<&Map<String, Value>> {
        match self.bound(field)? {
            Value::Object(map) => Ok(map),
            other => Err(ValidationError::invalid_type(
                field,
                "object",
                json_type_name(other),
            )),
        }
    }

    /// Bind an object field to a typed record.
    pub fn record<T: DeserializeOwned>(&self, field: &str) -> ValidationResult<T> {
        let object = self.object(field)?;
        serde_json::from_value(Value::Object(object.clone())).map_err(|e| {
            ValidationError::MalformedRecord {
                field: field.to_string(),
                message: e.to_string(),
            }
        })
    }

    /// Split a comma-separated string field into trimmed, non-empty items.
    pub fn string_list(&self, field: &str) -> ValidationResult<Vec<String>> {
        Ok(self
            .string(field)?
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// Bound values as a JSON object, with secret fields masked.
    ///
    /// Records are walked too: any member named like a password or secret
    /// is masked, as is the `value` of a credential.
    pub fn redacted(&self, fields: &[FieldSpec]) -> Value {
        let mut out = Value::Object(self.values.clone());
        mask_secrets(&mut out);
        if let Value::Object(map) = &mut out {
            for spec in fields.iter().filter(|spec| spec.is_secret()) {
                if let Some(value) = map.get_mut(spec.name) {
                    *value = Value::String(MASK.to_string());
                }
            }
        }
        out
    }
}

const MASK: &str = "***";

fn mask_secrets(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let credential = map.contains_key("type") && map.contains_key("value");
            for (key, member) in map.iter_mut() {
                if is_secret_name(key) || (credential && key == "value") {
                    *member = Value::String(MASK.to_string());
                } else {
                    mask_secrets(member);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(mask_secrets),
        _ => {}
    }
}

/// Validate `bag` against `fields` and bind the declared values.
///
/// Fields are processed in declaration order, so the first missing or
/// mistyped field is the one reported.
pub fn extract(fields: &[FieldSpec], bag: &ParamBag) -> ValidationResult<BoundArgs> {
    let mut values = Map::new();

    for spec in fields {
        match bag.get(spec.name) {
            Some(value) => {
                if !spec.kind.matches(value) {
                    return Err(ValidationError::invalid_type(
                        spec.name,
                        spec.kind.json_type(),
                        json_type_name(value),
                    ));
                }
                values.insert(spec.name.to_string(), value.clone());
            }
            None if spec.required => return Err(ValidationError::missing_field(spec.name)),
            None => {
                if let Some(default) = spec.default {
                    values.insert(spec.name.to_string(), default.to_value());
                }
            }
        }
    }

    Ok(BoundArgs { values })
}

/// JSON type name used in validation messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
