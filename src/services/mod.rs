//! Collaborator services the dispatcher delegates to.
//!
//! The dispatcher never talks to the identity platform directly. It resolves
//! each operation to one method on one of the traits in [`provider`], reached
//! through the [`Collaborators`] bundle.

pub mod provider;
pub mod representation;

pub use provider::{
    AuthenticationFlowService, ClientService, GroupService, IdentityProviderService,
    RealmService, RoleService, SearchService, UserService,
};
pub use representation::*;

use std::sync::Arc;

/// One handle per collaborator domain.
///
/// Cloning is cheap; every slot is an `Arc`.
#[derive(Clone)]
pub struct Collaborators {
    pub users: Arc<dyn UserService>,
    pub realms: Arc<dyn RealmService>,
    pub clients: Arc<dyn ClientService>,
    pub roles: Arc<dyn RoleService>,
    pub groups: Arc<dyn GroupService>,
    pub identity_providers: Arc<dyn IdentityProviderService>,
    pub flows: Arc<dyn AuthenticationFlowService>,
    pub search: Arc<dyn SearchService>,
}

impl Collaborators {
    /// Fill every slot from a single store implementing all domains.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: UserService
            + RealmService
            + ClientService
            + RoleService
            + GroupService
            + IdentityProviderService
            + AuthenticationFlowService
            + SearchService
            + 'static,
    {
        Self {
            users: store.clone(),
            realms: store.clone(),
            clients: store.clone(),
            roles: store.clone(),
            groups: store.clone(),
            identity_providers: store.clone(),
            flows: store.clone(),
            search: store,
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
