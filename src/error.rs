//! Error types for Keycloak operation dispatch.
//!
//! Errors are layered the same way the dispatcher is: collaborators report
//! [`ServiceError`], parameter extraction reports [`ValidationError`], catalog
//! construction reports [`CatalogError`], and everything a caller can observe is
//! folded into [`OperationError`] before it is wrapped in an envelope.

use std::fmt;

/// Main error type for a single operation dispatch.
///
/// Every non-success path of the dispatcher ends in exactly one of these
/// variants. The operation name is attached later, when the error is converted
/// into an [`OperationFailure`](crate::operation_handler::OperationFailure).
#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    /// The operation selector does not name a catalog entry
    #[error("unknown operation: {name}")]
    UnknownOperation { name: String },

    /// A field in the parameter bag is missing or has the wrong shape
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The collaborator reported that the referenced entity does not exist
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Any other collaborator failure
    #[error("Upstream error: {message}")]
    Upstream { message: String },

    /// The handler result could not be encoded as text
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Validation errors raised while binding a parameter bag.
///
/// Each variant names the offending field so callers can correct their input
/// without guessing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Required field is absent (or explicitly `null`)
    #[error("Required field '{field}' is missing")]
    MissingField { field: String },

    /// Field is present but has the wrong JSON type
    #[error("Field '{field}' has invalid type, expected {expected}, got {actual}")]
    InvalidType {
        field: String,
        expected: String,
        actual: String,
    },

    /// The parameter bag itself is not a JSON object
    #[error("Parameters must be a JSON object, got {actual}")]
    InvalidParams { actual: String },

    /// An object field could not be bound to its typed record
    #[error("Field '{field}' is not a valid record: {message}")]
    MalformedRecord { field: String, message: String },
}

/// Errors reported by collaborator services.
///
/// `NotFound` is the one condition the dispatcher distinguishes; every other
/// variant surfaces as an upstream failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The referenced entity does not exist
    #[error("{entity} not found: {key}")]
    NotFound { entity: String, key: String },

    /// The entity already exists
    #[error("{entity} already exists: {key}")]
    Conflict { entity: String, key: String },

    /// The identity platform rejected the request
    #[error("request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The identity platform could not be reached
    #[error("service unavailable: {message}")]
    Unavailable { message: String },
}

/// Errors that can occur while building the operation catalog.
///
/// These are programming errors and surface at startup, never per call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// An operation has no registered handler
    #[error("No handler registered for operation {operation}")]
    MissingHandler { operation: String },

    /// An operation was registered twice
    #[error("Operation {operation} registered more than once")]
    DuplicateEntry { operation: String },
}

/// Stable failure categories exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    UnknownOperation,
    ValidationError,
    NotFound,
    UpstreamError,
    SerializationError,
}

impl FailureKind {
    /// Error code for programmatic handling.
    pub fn code(self) -> &'static str {
        match self {
            Self::UnknownOperation => "UNKNOWN_OPERATION",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::UpstreamError => "UPSTREAM_ERROR",
            Self::SerializationError => "SERIALIZATION_ERROR",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl OperationError {
    /// Create an unknown operation error
    pub fn unknown_operation(name: impl Into<String>) -> Self {
        Self::UnknownOperation { name: name.into() }
    }

    /// Create an upstream error
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    /// The caller-visible category of this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::UnknownOperation { .. } => FailureKind::UnknownOperation,
            Self::Validation(_) => FailureKind::ValidationError,
            Self::NotFound { .. } => FailureKind::NotFound,
            Self::Upstream { .. } => FailureKind::UpstreamError,
            Self::Serialization(_) => FailureKind::SerializationError,
        }
    }
}

impl From<ServiceError> for OperationError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::NotFound { .. } => Self::NotFound {
                message: error.to_string(),
            },
            other => Self::Upstream {
                message: other.to_string(),
            },
        }
    }
}

impl ValidationError {
    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an invalid type error
    pub fn invalid_type(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::InvalidType {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// The field this error is about, if it concerns a single field.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingField { field }
            | Self::InvalidType { field, .. }
            | Self::MalformedRecord { field, .. } => Some(field),
            Self::InvalidParams { .. } => None,
        }
    }
}

impl ServiceError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            key: key.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(entity: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Conflict {
            entity: entity.into(),
            key: key.into(),
        }
    }

    /// Create a rejected request error
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Whether this error is the collaborator's "entity not found" signal.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// Result type aliases for convenience
pub type OperationResult<T> = Result<T, OperationError>;
pub type ValidationResult<T> = Result<T, ValidationError>;
pub type ServiceResult<T> = Result<T, ServiceError>;
pub type CatalogResult<T> = Result<T, CatalogError>;
