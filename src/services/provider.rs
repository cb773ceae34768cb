//! Collaborator service traits.
//!
//! Each trait is the narrow admin contract for one domain of the identity
//! platform. The dispatcher calls exactly one of these methods per operation
//! and otherwise treats implementations as opaque.
//!
//! Lookups of a single entity return `Ok(None)` when it does not exist.
//! Mutations that reference a missing entity return
//! [`ServiceError::NotFound`](crate::error::ServiceError::NotFound).

use super::representation::{
    AuthenticationExecutionInfoRepresentation, AuthenticationFlowRepresentation,
    ClientRepresentation, GroupRepresentation, IdentityProviderMapperRepresentation,
    IdentityProviderRepresentation, RealmRepresentation, RoleRepresentation, SearchResult,
    UserRepresentation,
};
use crate::error::ServiceResult;
use async_trait::async_trait;

/// User administration within a realm.
#[async_trait]
pub trait UserService: Send + Sync {
    async fn list(&self, realm: &str) -> ServiceResult<Vec<UserRepresentation>>;

    /// Find a user by exact username.
    async fn get_by_username(
        &self,
        realm: &str,
        username: &str,
    ) -> ServiceResult<Option<UserRepresentation>>;

    /// Create a user and return the identifier assigned to it.
    async fn create(&self, realm: &str, user: UserRepresentation) -> ServiceResult<String>;

    /// Delete the user with the given username.
    async fn delete(&self, realm: &str, username: &str) -> ServiceResult<()>;

    /// Apply the present members of `user`. A credential in `credentials`
    /// replaces the stored password; absent members are left unchanged.
    async fn update(&self, realm: &str, id: &str, user: UserRepresentation) -> ServiceResult<()>;

    async fn get_by_id(&self, realm: &str, id: &str) -> ServiceResult<Option<UserRepresentation>>;

    async fn list_groups(&self, realm: &str, id: &str) -> ServiceResult<Vec<GroupRepresentation>>;

    async fn join_group(&self, realm: &str, id: &str, group_id: &str) -> ServiceResult<()>;

    async fn leave_group(&self, realm: &str, id: &str, group_id: &str) -> ServiceResult<()>;

    /// Effective realm-level roles of the user.
    async fn list_roles(&self, realm: &str, id: &str) -> ServiceResult<Vec<RoleRepresentation>>;

    async fn add_role(&self, realm: &str, id: &str, role_name: &str) -> ServiceResult<()>;

    async fn remove_role(&self, realm: &str, id: &str, role_name: &str) -> ServiceResult<()>;

    async fn reset_password(
        &self,
        realm: &str,
        id: &str,
        password: &str,
        temporary: bool,
    ) -> ServiceResult<()>;

    async fn send_verification_email(&self, realm: &str, id: &str) -> ServiceResult<()>;

    async fn count(&self, realm: &str) -> ServiceResult<u64>;
}

/// Realm administration.
#[async_trait]
pub trait RealmService: Send + Sync {
    async fn list(&self) -> ServiceResult<Vec<RealmRepresentation>>;

    async fn get(&self, name: &str) -> ServiceResult<Option<RealmRepresentation>>;

    async fn create(&self, name: &str, display_name: &str, enabled: bool) -> ServiceResult<()>;

    async fn delete(&self, name: &str) -> ServiceResult<()>;
}

/// Client administration within a realm.
///
/// `id` parameters are the platform's internal client identifier, not the
/// public `clientId`.
#[async_trait]
pub trait ClientService: Send + Sync {
    async fn list(&self, realm: &str) -> ServiceResult<Vec<ClientRepresentation>>;

    async fn get_by_client_id(
        &self,
        realm: &str,
        client_id: &str,
    ) -> ServiceResult<Option<ClientRepresentation>>;

    /// Create a client and return its internal identifier.
    async fn create(
        &self,
        realm: &str,
        client_id: &str,
        redirect_uris: Vec<String>,
    ) -> ServiceResult<String>;

    async fn delete(&self, realm: &str, id: &str) -> ServiceResult<()>;

    /// Rotate the client secret and return the new value.
    async fn generate_secret(&self, realm: &str, id: &str) -> ServiceResult<String>;

    async fn list_roles(&self, realm: &str, id: &str) -> ServiceResult<Vec<RoleRepresentation>>;

    async fn create_role(
        &self,
        realm: &str,
        id: &str,
        role_name: &str,
        description: &str,
    ) -> ServiceResult<()>;

    async fn delete_role(&self, realm: &str, id: &str, role_name: &str) -> ServiceResult<()>;
}

/// Realm-level role administration.
#[async_trait]
pub trait RoleService: Send + Sync {
    async fn list_realm_roles(&self, realm: &str) -> ServiceResult<Vec<RoleRepresentation>>;

    async fn get_realm_role(
        &self,
        realm: &str,
        name: &str,
    ) -> ServiceResult<Option<RoleRepresentation>>;

    async fn create_realm_role(
        &self,
        realm: &str,
        name: &str,
        description: &str,
    ) -> ServiceResult<()>;

    async fn delete_realm_role(&self, realm: &str, name: &str) -> ServiceResult<()>;
}

/// Group administration within a realm.
#[async_trait]
pub trait GroupService: Send + Sync {
    /// Top-level groups of the realm.
    async fn list(&self, realm: &str) -> ServiceResult<Vec<GroupRepresentation>>;

    async fn get(&self, realm: &str, id: &str) -> ServiceResult<Option<GroupRepresentation>>;

    async fn list_members(&self, realm: &str, id: &str) -> ServiceResult<Vec<UserRepresentation>>;

    /// Create a top-level group and return its identifier.
    async fn create(&self, realm: &str, name: &str) -> ServiceResult<String>;

    async fn update(&self, realm: &str, id: &str, group: GroupRepresentation) -> ServiceResult<()>;

    async fn delete(&self, realm: &str, id: &str) -> ServiceResult<()>;

    /// Create a child group and return its identifier.
    async fn create_subgroup(
        &self,
        realm: &str,
        parent_id: &str,
        name: &str,
    ) -> ServiceResult<String>;
}

/// Identity provider (brokering) inspection.
#[async_trait]
pub trait IdentityProviderService: Send + Sync {
    async fn list(&self, realm: &str) -> ServiceResult<Vec<IdentityProviderRepresentation>>;

    async fn get(
        &self,
        realm: &str,
        alias: &str,
    ) -> ServiceResult<Option<IdentityProviderRepresentation>>;

    async fn list_mappers(
        &self,
        realm: &str,
        alias: &str,
    ) -> ServiceResult<Vec<IdentityProviderMapperRepresentation>>;
}

/// Authentication flow administration.
#[async_trait]
pub trait AuthenticationFlowService: Send + Sync {
    async fn list(&self, realm: &str) -> ServiceResult<Vec<AuthenticationFlowRepresentation>>;

    async fn get(
        &self,
        realm: &str,
        id: &str,
    ) -> ServiceResult<Option<AuthenticationFlowRepresentation>>;

    async fn create(
        &self,
        realm: &str,
        flow: AuthenticationFlowRepresentation,
    ) -> ServiceResult<()>;

    async fn delete(&self, realm: &str, id: &str) -> ServiceResult<()>;

    async fn list_executions(
        &self,
        realm: &str,
        alias: &str,
    ) -> ServiceResult<Vec<AuthenticationExecutionInfoRepresentation>>;

    async fn update_execution(
        &self,
        realm: &str,
        alias: &str,
        execution: AuthenticationExecutionInfoRepresentation,
    ) -> ServiceResult<()>;
}

/// Free-text search of the community forum, independent of any realm.
#[async_trait]
pub trait SearchService: Send + Sync {
    async fn search(&self, query: &str) -> ServiceResult<SearchResult>;
}
