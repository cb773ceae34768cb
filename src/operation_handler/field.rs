//! Field declarations for operation parameters.

use serde_json::Value;

/// JSON shape a field must have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Bool,
    Object,
}

impl FieldKind {
    /// Whether `value` has this shape. `null` never matches.
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Bool => value.is_boolean(),
            Self::Object => value.is_object(),
        }
    }

    /// JSON Schema type name.
    pub fn json_type(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "boolean",
            Self::Object => "object",
        }
    }
}

/// Value substituted for an omitted optional field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    Bool(bool),
    Str(&'static str),
}

impl FieldDefault {
    pub fn to_value(self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(b),
            Self::Str(s) => Value::String(s.to_string()),
        }
    }
}

/// Declared schema of one operation parameter.
///
/// Specs are `const` so each handler module can declare its field lists as
/// static slices next to the handler that consumes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    pub kind: FieldKind,
    pub default: Option<FieldDefault>,
    /// Hint shown to agents in the tool descriptor
    pub description: Option<&'static str>,
}

impl FieldSpec {
    pub const fn required_string(name: &'static str) -> Self {
        Self {
            name,
            required: true,
            kind: FieldKind::String,
            default: None,
            description: None,
        }
    }

    pub const fn required_object(name: &'static str) -> Self {
        Self {
            name,
            required: true,
            kind: FieldKind::Object,
            default: None,
            description: None,
        }
    }

    pub const fn optional_string(name: &'static str, default: &'static str) -> Self {
        Self {
            name,
            required: false,
            kind: FieldKind::String,
            default: Some(FieldDefault::Str(default)),
            description: None,
        }
    }

    pub const fn optional_bool(name: &'static str, default: bool) -> Self {
        Self {
            name,
            required: false,
            kind: FieldKind::Bool,
            default: Some(FieldDefault::Bool(default)),
            description: None,
        }
    }

    pub const fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    /// A sensitive field whose value must never reach the logs.
    pub fn is_secret(&self) -> bool {
        is_secret_name(self.name)
    }
}

/// Whether a parameter or member name refers to a password or secret.
pub fn is_secret_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.contains("password") || lower.contains("secret")
}
