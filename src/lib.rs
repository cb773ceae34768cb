//! Unified dispatcher for Keycloak administrative operations.
//!
//! Agents invoke a single entry point with an operation name and a parameter
//! bag. The dispatcher validates the bag against the operation's declared
//! fields, delegates to exactly one collaborator call and returns a text
//! payload or a structured failure.
//!
//! # Core Components
//!
//! - [`OperationDispatcher`] - Resolves, validates and runs operations
//! - [`OperationCatalog`] - Table of operations, parameter fields and handlers
//! - [`services`] - Collaborator traits the handlers delegate to
//! - [`InMemoryIdentityStore`] - Reference collaborator for tests and local use
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use keycloak_operations::{Collaborators, InMemoryIdentityStore, OperationDispatcher};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(InMemoryIdentityStore::with_realm("demo"));
//! let dispatcher = OperationDispatcher::new(Collaborators::from_store(store))?;
//!
//! let users = dispatcher.execute("GET_USERS", json!({"realm": "demo"})).await?;
//! assert_eq!(users, "[]");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod operation_handler;
pub mod providers;
pub mod services;
pub mod tool;

pub use config::DispatcherConfig;
pub use error::{
    CatalogError, FailureKind, OperationError, OperationResult, ServiceError, ServiceResult,
    ValidationError,
};
pub use operation_handler::{
    Envelope, Operation, OperationCatalog, OperationDispatcher, OperationFailure, ParamBag,
};
pub use providers::InMemoryIdentityStore;
pub use services::Collaborators;
pub use tool::tool_definition;
