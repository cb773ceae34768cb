//! Unified operation dispatch.
//!
//! One entry point, many operations: callers name an operation and pass a
//! parameter bag, and the dispatcher takes care of validation, routing,
//! error mapping and encoding the same way for every operation.
//!
//! # Key Types
//!
//! - [`OperationDispatcher`] - Resolves, validates and runs operations
//! - [`OperationCatalog`] - Read-only table of operations, fields and handlers
//! - [`ParamBag`] / [`BoundArgs`] - Raw and validated parameters
//! - [`Envelope`] - Success payload or structured failure
//!
//! # Examples
//!
//! ```rust,no_run
//! use keycloak_operations::operation_handler::{OperationDispatcher, ParamBag};
//! use keycloak_operations::providers::InMemoryIdentityStore;
//! use keycloak_operations::services::Collaborators;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(InMemoryIdentityStore::with_realm("demo"));
//! let dispatcher = OperationDispatcher::new(Collaborators::from_store(store))?;
//!
//! let envelope = dispatcher
//!     .dispatch_named("GET_USERS", ParamBag::new().with("realm", "demo"))
//!     .await;
//! assert_eq!(envelope.payload(), Some("[]"));
//! # Ok(())
//! # }
//! ```

pub mod catalog;
mod core;
pub mod encoder;
pub mod envelope;
pub mod field;
pub mod handlers;
pub mod params;
pub mod types;

pub use catalog::{CatalogBuilder, CatalogEntry, Handler, HandlerFuture, OperationCatalog};
pub use core::OperationDispatcher;
pub use encoder::{HandlerOutput, encode};
pub use envelope::{Envelope, OperationFailure};
pub use field::{FieldDefault, FieldKind, FieldSpec};
pub use params::{BoundArgs, ParamBag, extract};
pub use types::{Domain, Operation};
