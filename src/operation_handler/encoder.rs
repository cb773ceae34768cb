//! Result encoding.
//!
//! Handlers return a [`HandlerOutput`]; [`encode`] turns it into the text sent
//! back to the caller. Records and lists become compact JSON. Scalars and
//! messages are sent as plain text. An absent value is the literal `null`,
//! which is how a lookup of a nonexistent entity answers when the collaborator
//! returned "no value" instead of signalling not found.

use crate::error::OperationResult;
use serde::Serialize;
use serde_json::Value;

/// Value produced by an operation handler, before encoding
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerOutput {
    /// A single entity
    Record(Value),
    /// Entities in the collaborator's order
    List(Vec<Value>),
    /// A bare string, number or boolean
    Scalar(Value),
    /// Human-readable confirmation of a mutation
    Message(String),
    /// The collaborator legitimately returned no value
    Absent,
}

impl HandlerOutput {
    pub fn record<T: Serialize>(value: &T) -> OperationResult<Self> {
        Ok(Self::Record(serde_json::to_value(value)?))
    }

    pub fn list<T: Serialize>(values: &[T]) -> OperationResult<Self> {
        let encoded = values
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::List(encoded))
    }

    /// `Record` when present, `Absent` otherwise.
    pub fn optional<T: Serialize>(value: Option<&T>) -> OperationResult<Self> {
        match value {
            Some(value) => Self::record(value),
            None => Ok(Self::Absent),
        }
    }

    /// Short label for log lines.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Record(_) => "record",
            Self::List(_) => "list",
            Self::Scalar(_) => "scalar",
            Self::Message(_) => "message",
            Self::Absent => "absent",
        }
    }
}

/// Encode a handler result as outbound text.
pub fn encode(output: &HandlerOutput) -> Result<String, serde_json::Error> {
    match output {
        HandlerOutput::Record(value) => serde_json::to_string(value),
        HandlerOutput::List(values) => serde_json::to_string(values),
        HandlerOutput::Scalar(Value::String(s)) => Ok(s.clone()),
        HandlerOutput::Scalar(value) => serde_json::to_string(value),
        HandlerOutput::Message(text) => Ok(text.clone()),
        HandlerOutput::Absent => Ok("null".to_string()),
    }
}
