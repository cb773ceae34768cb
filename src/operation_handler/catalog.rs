//! The operation catalog.
//!
//! A read-only table from [`Operation`] to its field list and handler, built
//! once at startup. Building fails if any operation is left without a handler,
//! so a gap in the table is a startup error rather than a runtime surprise.

use super::encoder::HandlerOutput;
use super::field::FieldSpec;
use super::handlers;
use super::params::BoundArgs;
use super::types::Operation;
use crate::error::{CatalogError, CatalogResult, OperationResult};
use crate::services::Collaborators;
use log::debug;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

/// Future returned by an operation handler.
pub type HandlerFuture<'a> =
    Pin<Box<dyn Future<Output = OperationResult<HandlerOutput>> + Send + 'a>>;

/// An operation handler: bound arguments in, one collaborator call, output out.
pub type Handler = for<'a> fn(&'a Collaborators, BoundArgs) -> HandlerFuture<'a>;

/// One row of the catalog
#[derive(Clone, Copy)]
pub struct CatalogEntry {
    pub operation: Operation,
    pub fields: &'static [FieldSpec],
    pub handler: Handler,
}

impl CatalogEntry {
    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.required)
    }
}

impl std::fmt::Debug for CatalogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogEntry")
            .field("operation", &self.operation)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

/// Collects catalog entries before validation.
#[derive(Default)]
pub struct CatalogBuilder {
    entries: Vec<CatalogEntry>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. Duplicates are detected by [`build`](Self::build).
    pub fn register(
        &mut self,
        operation: Operation,
        fields: &'static [FieldSpec],
        handler: Handler,
    ) -> &mut Self {
        self.entries.push(CatalogEntry {
            operation,
            fields,
            handler,
        });
        self
    }

    /// Validate completeness and freeze the catalog.
    pub fn build(self) -> CatalogResult<OperationCatalog> {
        let mut entries = HashMap::with_capacity(self.entries.len());

        for entry in self.entries {
            if entries.insert(entry.operation, entry).is_some() {
                return Err(CatalogError::DuplicateEntry {
                    operation: entry.operation.name().to_string(),
                });
            }
        }

        if let Some(missing) = Operation::ALL.iter().find(|op| !entries.contains_key(op)) {
            return Err(CatalogError::MissingHandler {
                operation: missing.name().to_string(),
            });
        }

        debug!("Operation catalog built with {} entries", entries.len());
        Ok(OperationCatalog { entries })
    }
}

/// Immutable registry of every supported operation.
#[derive(Debug)]
pub struct OperationCatalog {
    entries: HashMap<Operation, CatalogEntry>,
}

impl OperationCatalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    /// The catalog with every domain's handlers registered.
    pub fn standard() -> CatalogResult<Self> {
        let mut builder = CatalogBuilder::new();
        handlers::register_all(&mut builder);
        builder.build()
    }

    pub fn get(&self, operation: Operation) -> Option<&CatalogEntry> {
        self.entries.get(&operation)
    }

    /// Entries in [`Operation::ALL`] order.
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        Operation::ALL.iter().filter_map(|op| self.entries.get(op))
    }

    pub fn operations(&self) -> impl Iterator<Item = Operation> + '_ {
        self.entries().map(|e| e.operation)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
