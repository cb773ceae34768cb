//! The operation dispatcher.
//!
//! [`OperationDispatcher`] is the single entry point agents call. It resolves
//! the operation name against the catalog, binds the parameter bag, runs the
//! handler once inside [`run_guarded`](OperationDispatcher::run_guarded) and
//! returns an [`Envelope`]. Nothing here depends on which operation is being
//! run; per-operation knowledge lives in the catalog.

use super::catalog::{CatalogEntry, OperationCatalog};
use super::encoder::encode;
use super::envelope::{Envelope, OperationFailure};
use super::params::{BoundArgs, ParamBag, extract};
use super::types::Operation;
use crate::config::DispatcherConfig;
use crate::error::{CatalogResult, OperationError, OperationResult, ValidationResult};
use crate::services::Collaborators;
use log::{debug, info, warn};
use serde_json::Value;
use std::sync::Arc;

/// Transport-agnostic dispatcher for Keycloak administrative operations.
///
/// Holds no per-request state. Clones share the catalog and collaborators, so
/// one dispatcher can serve any number of concurrent calls.
#[derive(Debug, Clone)]
pub struct OperationDispatcher {
    catalog: Arc<OperationCatalog>,
    services: Collaborators,
    config: DispatcherConfig,
}

impl OperationDispatcher {
    /// Dispatcher over the standard catalog with default configuration.
    pub fn new(services: Collaborators) -> CatalogResult<Self> {
        Self::with_config(services, DispatcherConfig::default())
    }

    pub fn with_config(services: Collaborators, config: DispatcherConfig) -> CatalogResult<Self> {
        let catalog = OperationCatalog::standard()?;
        Ok(Self::from_parts(Arc::new(catalog), services, config))
    }

    /// Assemble a dispatcher from an already built catalog.
    pub fn from_parts(
        catalog: Arc<OperationCatalog>,
        services: Collaborators,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            catalog,
            services,
            config,
        }
    }

    pub fn catalog(&self) -> &OperationCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Run a known operation.
    pub async fn dispatch(&self, operation: Operation, params: ParamBag) -> Envelope {
        self.route(operation.name(), Some(operation), Ok(params)).await
    }

    /// Run the operation named by `name`, matched exactly.
    pub async fn dispatch_named(&self, name: &str, params: ParamBag) -> Envelope {
        self.route(name, Operation::from_name(name), Ok(params)).await
    }

    /// Run an operation with a JSON parameter value.
    ///
    /// `null` is accepted as "no parameters"; anything other than an object is a
    /// validation failure.
    pub async fn execute(&self, name: &str, params: Value) -> Result<String, OperationFailure> {
        self.route(name, Operation::from_name(name), ParamBag::from_value(params))
            .await
            .into_result()
    }

    /// Same as [`execute`](Self::execute) with the parameters as JSON text.
    pub async fn execute_json(&self, name: &str, params: &str) -> Result<String, OperationFailure> {
        self.route(name, Operation::from_name(name), ParamBag::from_json_str(params))
            .await
            .into_result()
    }

    async fn route(
        &self,
        name: &str,
        operation: Option<Operation>,
        params: ValidationResult<ParamBag>,
    ) -> Envelope {
        let request_id = uuid::Uuid::new_v4().to_string();

        info!(
            "Keycloak operation {} received (request: '{}')",
            name, request_id
        );

        let result = match operation.and_then(|op| self.catalog.get(op)) {
            Some(entry) => match params.and_then(|bag| extract(entry.fields, &bag)) {
                Ok(args) => self.run_guarded(entry, args, &request_id).await,
                Err(e) => Err(e.into()),
            },
            None => Err(OperationError::unknown_operation(name)),
        };

        match result {
            Ok(payload) => {
                debug!(
                    "Keycloak operation {} completed successfully (request: '{}')",
                    name, request_id
                );
                Envelope::Success(payload)
            }
            Err(e) => {
                let envelope = Envelope::failure(name, e);
                if let Some(failure) = envelope.failure_ref() {
                    warn!(
                        "Keycloak operation {} failed [{}]: {} (request: '{}')",
                        name, failure.kind, failure.message, request_id
                    );
                }
                envelope
            }
        }
    }

    /// Invoke the handler exactly once and encode its output.
    ///
    /// Collaborator errors are already folded into [`OperationError`] by the
    /// handler's `?`; this is the only place handler output becomes text.
    async fn run_guarded(
        &self,
        entry: &CatalogEntry,
        args: BoundArgs,
        request_id: &str,
    ) -> OperationResult<String> {
        if self.config.log_params {
            debug!(
                "Keycloak operation {} bound params {} (request: '{}')",
                entry.operation,
                args.redacted(entry.fields),
                request_id
            );
        }

        let output = (entry.handler)(&self.services, args).await?;

        debug!(
            "Keycloak operation {} returned {} (request: '{}')",
            entry.operation,
            output.shape(),
            request_id
        );

        Ok(encode(&output)?)
    }
}
