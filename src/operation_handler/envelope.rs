//! The uniform response contract.
//!
//! Every dispatch ends in an [`Envelope`]: either the encoded payload or one
//! [`OperationFailure`] naming the attempted operation. This module holds the
//! single place where internal errors become caller-visible failures.

use crate::error::{FailureKind, OperationError, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of one dispatch
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Success(String),
    Failure(OperationFailure),
}

/// Structured failure returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationFailure {
    /// Operation name exactly as the caller supplied it
    pub operation_name: String,
    pub kind: FailureKind,
    pub message: String,
    /// Offending field for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl OperationFailure {
    /// Map an internal error to the caller-visible failure.
    pub fn from_error(operation_name: impl Into<String>, error: OperationError) -> Self {
        let operation_name = operation_name.into();
        let kind = error.kind();
        let field = match &error {
            OperationError::Validation(ve) => ve.field().map(str::to_string),
            _ => None,
        };
        let message = match &error {
            OperationError::UnknownOperation { name } => format!("unknown operation: {}", name),
            OperationError::Validation(ve) => format_validation(&operation_name, ve),
            OperationError::NotFound { message } => message.clone(),
            OperationError::Upstream { message } => {
                format!("Failed to execute operation {}: {}", operation_name, message)
            }
            OperationError::Serialization(e) => {
                format!("Failed to encode result of {}: {}", operation_name, e)
            }
        };

        Self {
            operation_name,
            kind,
            message,
            field,
        }
    }

    pub fn error_code(&self) -> &'static str {
        self.kind.code()
    }
}

fn format_validation(operation_name: &str, error: &ValidationError) -> String {
    format!("Invalid parameters for {}: {}", operation_name, error)
}

impl fmt::Display for OperationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.operation_name, self.kind, self.message)
    }
}

impl std::error::Error for OperationFailure {}

impl Envelope {
    pub fn failure(operation_name: impl Into<String>, error: OperationError) -> Self {
        Self::Failure(OperationFailure::from_error(operation_name, error))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn payload(&self) -> Option<&str> {
        match self {
            Self::Success(payload) => Some(payload),
            Self::Failure(_) => None,
        }
    }

    pub fn failure_ref(&self) -> Option<&OperationFailure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }

    pub fn kind(&self) -> Option<FailureKind> {
        self.failure_ref().map(|f| f.kind)
    }

    pub fn into_result(self) -> Result<String, OperationFailure> {
        match self {
            Self::Success(payload) => Ok(payload),
            Self::Failure(failure) => Err(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;

    #[test]
    fn test_unknown_operation_message() {
        let failure =
            OperationFailure::from_error("FROB", OperationError::unknown_operation("FROB"));
        assert_eq!(failure.kind, FailureKind::UnknownOperation);
        assert_eq!(failure.message, "unknown operation: FROB");
        assert_eq!(failure.operation_name, "FROB");
    }

    #[test]
    fn test_validation_failure_names_field() {
        let failure = OperationFailure::from_error(
            "CREATE_USER",
            ValidationError::missing_field("password").into(),
        );
        assert_eq!(failure.kind, FailureKind::ValidationError);
        assert_eq!(failure.field.as_deref(), Some("password"));
        assert!(failure.message.contains("CREATE_USER"));
        assert!(failure.message.contains("password"));
    }

    #[test]
    fn test_upstream_failure_includes_operation() {
        let failure = OperationFailure::from_error(
            "CREATE_REALM",
            ServiceError::conflict("Realm", "demo").into(),
        );
        assert_eq!(failure.kind, FailureKind::UpstreamError);
        assert!(failure.message.contains("CREATE_REALM"));
        assert!(failure.message.contains("demo"));
        assert_eq!(failure.field, None);
    }

    #[test]
    fn test_encoding_failure_names_operation() {
        let json_error = serde_json::from_str::<serde_json::Value>("x").unwrap_err();
        let failure = OperationFailure::from_error("GET_USERS", json_error.into());
        assert_eq!(failure.kind, FailureKind::SerializationError);
        assert_eq!(failure.error_code(), "SERIALIZATION_ERROR");
        assert!(failure.message.starts_with("Failed to encode result of GET_USERS"));
        assert_eq!(failure.field, None);
    }

    #[test]
    fn test_failure_serializes_for_transports() {
        let failure = OperationFailure::from_error(
            "DELETE_USER",
            ServiceError::not_found("User", "ghost").into(),
        );
        let value = serde_json::to_value(&failure).unwrap();
        assert_eq!(value["operationName"], "DELETE_USER");
        assert_eq!(value["kind"], "NOT_FOUND");
        assert!(value.get("field").is_none());
    }

    #[test]
    fn test_into_result() {
        assert_eq!(
            Envelope::Success("[]".to_string()).into_result().unwrap(),
            "[]"
        );
        let err = Envelope::failure("X", OperationError::unknown_operation("X"))
            .into_result()
            .unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_OPERATION");
    }
}
