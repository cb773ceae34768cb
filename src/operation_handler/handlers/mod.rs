//! Operation handlers, one module per administrative domain.
//!
//! Each module declares the field list of its operations next to the handler
//! that consumes them and exposes a `register` function. Adding an operation
//! means adding a row here; the dispatcher itself never changes.

pub mod authentication;
pub mod client;
pub mod group;
pub mod identity_provider;
pub mod realm;
pub mod role;
pub mod search;
pub mod user;

use super::catalog::CatalogBuilder;
use super::encoder::HandlerOutput;
use super::field::FieldSpec;
use crate::error::OperationResult;
use serde_json::Value;

/// Field shared by every realm-scoped operation.
pub(crate) const REALM: FieldSpec = FieldSpec::required_string("realm");

/// Register the handlers of every domain.
pub fn register_all(builder: &mut CatalogBuilder) {
    user::register(builder);
    realm::register(builder);
    client::register(builder);
    role::register(builder);
    group::register(builder);
    identity_provider::register(builder);
    authentication::register(builder);
    search::register(builder);
}

/// Confirmation text for a completed mutation.
pub(crate) fn confirm(text: String) -> OperationResult<HandlerOutput> {
    Ok(HandlerOutput::Message(text))
}

pub(crate) fn scalar(value: impl Into<Value>) -> OperationResult<HandlerOutput> {
    Ok(HandlerOutput::Scalar(value.into()))
}
