//! Shared test utilities for dispatcher tests.
//!
//! [`RecordingServices`] implements every collaborator trait, records each
//! call it receives and answers with canned data, so tests can assert exactly
//! which collaborator method ran and with which arguments.

#![allow(dead_code)]

use async_trait::async_trait;
use keycloak_operations::error::{ServiceError, ServiceResult};
use keycloak_operations::operation_handler::{CatalogEntry, FieldKind, ParamBag};
use keycloak_operations::services::*;
use keycloak_operations::{Collaborators, OperationDispatcher};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex, Once};

static INIT: Once = Once::new();

/// Install a test logger once per test binary.
pub fn init_logging() {
    INIT.call_once(|| {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
            .is_test(true)
            .try_init();
    });
}

/// One recorded collaborator invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub method: &'static str,
    pub args: Vec<String>,
}

/// How the recording collaborator answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Lookups find something, mutations succeed
    Present,
    /// Lookups return no value, mutations report not found
    Missing,
    /// Every call fails with a rejected request
    Failing,
}

pub struct RecordingServices {
    calls: Mutex<Vec<Call>>,
    mode: Mode,
    users: Vec<UserRepresentation>,
}

impl RecordingServices {
    pub fn new(mode: Mode) -> Self {
        Self::with_users(mode, Vec::new())
    }

    pub fn with_users(mode: Mode, users: Vec<UserRepresentation>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            mode,
            users,
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, method: &'static str, args: &[&str]) -> ServiceResult<()> {
        self.calls.lock().unwrap().push(Call {
            method,
            args: args.iter().map(|a| a.to_string()).collect(),
        });
        match self.mode {
            Mode::Failing => Err(ServiceError::rejected(500, "backend exploded")),
            _ => Ok(()),
        }
    }

    fn mutation(&self, entity: &str, key: &str) -> ServiceResult<()> {
        match self.mode {
            Mode::Missing => Err(ServiceError::not_found(entity, key)),
            _ => Ok(()),
        }
    }

    fn lookup<T>(&self, value: impl FnOnce() -> T) -> Option<T> {
        match self.mode {
            Mode::Present => Some(value()),
            _ => None,
        }
    }
}

pub fn user(username: &str) -> UserRepresentation {
    UserRepresentation {
        id: Some(format!("id-{}", username)),
        username: Some(username.to_string()),
        enabled: Some(true),
        ..Default::default()
    }
}

pub fn role(name: &str) -> RoleRepresentation {
    RoleRepresentation {
        name: name.to_string(),
        ..Default::default()
    }
}

#[async_trait]
impl UserService for RecordingServices {
    async fn list(&self, realm: &str) -> ServiceResult<Vec<UserRepresentation>> {
        self.record("users.list", &[realm])?;
        Ok(self.users.clone())
    }

    async fn get_by_username(
        &self,
        realm: &str,
        username: &str,
    ) -> ServiceResult<Option<UserRepresentation>> {
        self.record("users.get_by_username", &[realm, username])?;
        Ok(self.lookup(|| user(username)))
    }

    async fn create(&self, realm: &str, user: UserRepresentation) -> ServiceResult<String> {
        let username = user.username.clone().unwrap_or_default();
        let password = user
            .credentials
            .as_ref()
            .and_then(|c| c.first())
            .map(|c| format!("{}:{}", c.value, c.temporary))
            .unwrap_or_default();
        self.record("users.create", &[realm, &username, &password])?;
        Ok("new-user-id".to_string())
    }

    async fn delete(&self, realm: &str, username: &str) -> ServiceResult<()> {
        self.record("users.delete", &[realm, username])?;
        self.mutation("User", username)
    }

    async fn update(&self, realm: &str, id: &str, user: UserRepresentation) -> ServiceResult<()> {
        let email = user.email.unwrap_or_default();
        self.record("users.update", &[realm, id, &email])?;
        self.mutation("User", id)
    }

    async fn get_by_id(&self, realm: &str, id: &str) -> ServiceResult<Option<UserRepresentation>> {
        self.record("users.get_by_id", &[realm, id])?;
        Ok(self.lookup(|| user(id)))
    }

    async fn list_groups(&self, realm: &str, id: &str) -> ServiceResult<Vec<GroupRepresentation>> {
        self.record("users.list_groups", &[realm, id])?;
        Ok(Vec::new())
    }

    async fn join_group(&self, realm: &str, id: &str, group_id: &str) -> ServiceResult<()> {
        self.record("users.join_group", &[realm, id, group_id])?;
        self.mutation("User", id)
    }

    async fn leave_group(&self, realm: &str, id: &str, group_id: &str) -> ServiceResult<()> {
        self.record("users.leave_group", &[realm, id, group_id])?;
        self.mutation("User", id)
    }

    async fn list_roles(&self, realm: &str, id: &str) -> ServiceResult<Vec<RoleRepresentation>> {
        self.record("users.list_roles", &[realm, id])?;
        Ok(vec![role("offline_access"), role("admin")])
    }

    async fn add_role(&self, realm: &str, id: &str, role_name: &str) -> ServiceResult<()> {
        self.record("users.add_role", &[realm, id, role_name])?;
        self.mutation("User", id)
    }

    async fn remove_role(&self, realm: &str, id: &str, role_name: &str) -> ServiceResult<()> {
        self.record("users.remove_role", &[realm, id, role_name])?;
        self.mutation("User", id)
    }

    async fn reset_password(
        &self,
        realm: &str,
        id: &str,
        password: &str,
        temporary: bool,
    ) -> ServiceResult<()> {
        let temporary = temporary.to_string();
        self.record("users.reset_password", &[realm, id, password, &temporary])?;
        self.mutation("User", id)
    }

    async fn send_verification_email(&self, realm: &str, id: &str) -> ServiceResult<()> {
        self.record("users.send_verification_email", &[realm, id])?;
        self.mutation("User", id)
    }

    async fn count(&self, realm: &str) -> ServiceResult<u64> {
        self.record("users.count", &[realm])?;
        Ok(self.users.len() as u64)
    }
}

#[async_trait]
impl RealmService for RecordingServices {
    async fn list(&self) -> ServiceResult<Vec<RealmRepresentation>> {
        self.record("realms.list", &[])?;
        Ok(Vec::new())
    }

    async fn get(&self, name: &str) -> ServiceResult<Option<RealmRepresentation>> {
        self.record("realms.get", &[name])?;
        Ok(self.lookup(|| RealmRepresentation {
            realm: name.to_string(),
            ..Default::default()
        }))
    }

    async fn create(&self, name: &str, display_name: &str, enabled: bool) -> ServiceResult<()> {
        let enabled = enabled.to_string();
        self.record("realms.create", &[name, display_name, &enabled])
    }

    async fn delete(&self, name: &str) -> ServiceResult<()> {
        self.record("realms.delete", &[name])?;
        self.mutation("Realm", name)
    }
}

#[async_trait]
impl ClientService for RecordingServices {
    async fn list(&self, realm: &str) -> ServiceResult<Vec<ClientRepresentation>> {
        self.record("clients.list", &[realm])?;
        Ok(Vec::new())
    }

    async fn get_by_client_id(
        &self,
        realm: &str,
        client_id: &str,
    ) -> ServiceResult<Option<ClientRepresentation>> {
        self.record("clients.get_by_client_id", &[realm, client_id])?;
        Ok(self.lookup(|| ClientRepresentation::confidential(client_id, Vec::new())))
    }

    async fn create(
        &self,
        realm: &str,
        client_id: &str,
        redirect_uris: Vec<String>,
    ) -> ServiceResult<String> {
        let uris = redirect_uris.join("|");
        self.record("clients.create", &[realm, client_id, &uris])?;
        Ok("new-client-id".to_string())
    }

    async fn delete(&self, realm: &str, id: &str) -> ServiceResult<()> {
        self.record("clients.delete", &[realm, id])?;
        self.mutation("Client", id)
    }

    async fn generate_secret(&self, realm: &str, id: &str) -> ServiceResult<String> {
        self.record("clients.generate_secret", &[realm, id])?;
        self.mutation("Client", id)?;
        Ok("s3cr3t".to_string())
    }

    async fn list_roles(&self, realm: &str, id: &str) -> ServiceResult<Vec<RoleRepresentation>> {
        self.record("clients.list_roles", &[realm, id])?;
        Ok(Vec::new())
    }

    async fn create_role(
        &self,
        realm: &str,
        id: &str,
        role_name: &str,
        description: &str,
    ) -> ServiceResult<()> {
        self.record("clients.create_role", &[realm, id, role_name, description])?;
        self.mutation("Client", id)
    }

    async fn delete_role(&self, realm: &str, id: &str, role_name: &str) -> ServiceResult<()> {
        self.record("clients.delete_role", &[realm, id, role_name])?;
        self.mutation("Client", id)
    }
}

#[async_trait]
impl RoleService for RecordingServices {
    async fn list_realm_roles(&self, realm: &str) -> ServiceResult<Vec<RoleRepresentation>> {
        self.record("roles.list_realm_roles", &[realm])?;
        Ok(vec![role("zeta"), role("alpha")])
    }

    async fn get_realm_role(
        &self,
        realm: &str,
        name: &str,
    ) -> ServiceResult<Option<RoleRepresentation>> {
        self.record("roles.get_realm_role", &[realm, name])?;
        Ok(self.lookup(|| role(name)))
    }

    async fn create_realm_role(
        &self,
        realm: &str,
        name: &str,
        description: &str,
    ) -> ServiceResult<()> {
        self.record("roles.create_realm_role", &[realm, name, description])
    }

    async fn delete_realm_role(&self, realm: &str, name: &str) -> ServiceResult<()> {
        self.record("roles.delete_realm_role", &[realm, name])?;
        self.mutation("Role", name)
    }
}

#[async_trait]
impl GroupService for RecordingServices {
    async fn list(&self, realm: &str) -> ServiceResult<Vec<GroupRepresentation>> {
        self.record("groups.list", &[realm])?;
        Ok(Vec::new())
    }

    async fn get(&self, realm: &str, id: &str) -> ServiceResult<Option<GroupRepresentation>> {
        self.record("groups.get", &[realm, id])?;
        Ok(self.lookup(|| GroupRepresentation {
            id: Some(id.to_string()),
            name: "ops".to_string(),
            ..Default::default()
        }))
    }

    async fn list_members(&self, realm: &str, id: &str) -> ServiceResult<Vec<UserRepresentation>> {
        self.record("groups.list_members", &[realm, id])?;
        Ok(self.users.clone())
    }

    async fn create(&self, realm: &str, name: &str) -> ServiceResult<String> {
        self.record("groups.create", &[realm, name])?;
        Ok("new-group-id".to_string())
    }

    async fn update(&self, realm: &str, id: &str, group: GroupRepresentation) -> ServiceResult<()> {
        self.record("groups.update", &[realm, id, &group.name])?;
        self.mutation("Group", id)
    }

    async fn delete(&self, realm: &str, id: &str) -> ServiceResult<()> {
        self.record("groups.delete", &[realm, id])?;
        self.mutation("Group", id)
    }

    async fn create_subgroup(
        &self,
        realm: &str,
        parent_id: &str,
        name: &str,
    ) -> ServiceResult<String> {
        self.record("groups.create_subgroup", &[realm, parent_id, name])?;
        self.mutation("Group", parent_id)?;
        Ok("new-subgroup-id".to_string())
    }
}

#[async_trait]
impl IdentityProviderService for RecordingServices {
    async fn list(&self, realm: &str) -> ServiceResult<Vec<IdentityProviderRepresentation>> {
        self.record("identity_providers.list", &[realm])?;
        Ok(Vec::new())
    }

    async fn get(
        &self,
        realm: &str,
        alias: &str,
    ) -> ServiceResult<Option<IdentityProviderRepresentation>> {
        self.record("identity_providers.get", &[realm, alias])?;
        Ok(self.lookup(|| IdentityProviderRepresentation {
            alias: alias.to_string(),
            ..Default::default()
        }))
    }

    async fn list_mappers(
        &self,
        realm: &str,
        alias: &str,
    ) -> ServiceResult<Vec<IdentityProviderMapperRepresentation>> {
        self.record("identity_providers.list_mappers", &[realm, alias])?;
        Ok(Vec::new())
    }
}

#[async_trait]
impl AuthenticationFlowService for RecordingServices {
    async fn list(&self, realm: &str) -> ServiceResult<Vec<AuthenticationFlowRepresentation>> {
        self.record("flows.list", &[realm])?;
        Ok(Vec::new())
    }

    async fn get(
        &self,
        realm: &str,
        id: &str,
    ) -> ServiceResult<Option<AuthenticationFlowRepresentation>> {
        self.record("flows.get", &[realm, id])?;
        Ok(self.lookup(|| AuthenticationFlowRepresentation {
            id: Some(id.to_string()),
            alias: "browser".to_string(),
            ..Default::default()
        }))
    }

    async fn create(
        &self,
        realm: &str,
        flow: AuthenticationFlowRepresentation,
    ) -> ServiceResult<()> {
        let provider_id = flow.provider_id.unwrap_or_default();
        let top_level = flow.top_level.unwrap_or_default().to_string();
        self.record(
            "flows.create",
            &[realm, &flow.alias, &provider_id, &top_level],
        )
    }

    async fn delete(&self, realm: &str, id: &str) -> ServiceResult<()> {
        self.record("flows.delete", &[realm, id])?;
        self.mutation("AuthenticationFlow", id)
    }

    async fn list_executions(
        &self,
        realm: &str,
        alias: &str,
    ) -> ServiceResult<Vec<AuthenticationExecutionInfoRepresentation>> {
        self.record("flows.list_executions", &[realm, alias])?;
        Ok(Vec::new())
    }

    async fn update_execution(
        &self,
        realm: &str,
        alias: &str,
        execution: AuthenticationExecutionInfoRepresentation,
    ) -> ServiceResult<()> {
        let id = execution.id.unwrap_or_default();
        self.record("flows.update_execution", &[realm, alias, &id])?;
        self.mutation("AuthenticationFlow", alias)
    }
}

#[async_trait]
impl SearchService for RecordingServices {
    async fn search(&self, query: &str) -> ServiceResult<SearchResult> {
        self.record("search.search", &[query])?;
        Ok(SearchResult::default())
    }
}

/// Dispatcher wired to a fresh recording collaborator.
pub fn recording_dispatcher(mode: Mode) -> (OperationDispatcher, Arc<RecordingServices>) {
    recording_dispatcher_with_users(mode, Vec::new())
}

pub fn recording_dispatcher_with_users(
    mode: Mode,
    users: Vec<UserRepresentation>,
) -> (OperationDispatcher, Arc<RecordingServices>) {
    init_logging();
    let services = Arc::new(RecordingServices::with_users(mode, users));
    let dispatcher = OperationDispatcher::new(Collaborators::from_store(services.clone()))
        .expect("standard catalog is complete");
    (dispatcher, services)
}

/// A well-typed value for a field of the given kind.
pub fn sample_value(name: &str, kind: FieldKind) -> Value {
    match kind {
        FieldKind::String => Value::String(format!("{}-value", name)),
        FieldKind::Bool => Value::Bool(true),
        FieldKind::Object => json!({"id": "exec-1", "name": "ops", "email": "j@x.com"}),
    }
}

/// A parameter bag holding every required field of `entry`, correctly typed.
pub fn required_params(entry: &CatalogEntry) -> ParamBag {
    entry
        .required_fields()
        .map(|f| (f.name.to_string(), sample_value(f.name, f.kind)))
        .collect()
}
