//! In-memory identity store.
//!
//! [`InMemoryIdentityStore`] implements every collaborator trait over plain
//! collections guarded by a tokio `RwLock`. Entities are kept in insertion
//! order, so list operations are deterministic. It is meant for tests,
//! benchmarks and local experimentation, not as a production identity store.
//!
//! # Example Usage
//!
//! ```rust
//! use keycloak_operations::providers::InMemoryIdentityStore;
//! use keycloak_operations::services::Collaborators;
//! use std::sync::Arc;
//!
//! let store = Arc::new(InMemoryIdentityStore::with_realm("demo"));
//! let services = Collaborators::from_store(store);
//! ```

use crate::error::{ServiceError, ServiceResult};
use crate::services::{
    AuthenticationExecutionInfoRepresentation, AuthenticationFlowRepresentation,
    AuthenticationFlowService, ClientRepresentation, ClientService, CredentialRepresentation,
    GroupRepresentation, GroupService, IdentityProviderMapperRepresentation,
    IdentityProviderRepresentation, IdentityProviderService, Post, RealmRepresentation,
    RealmService, RoleRepresentation, RoleService, SearchResult, SearchService, Topic,
    UserRepresentation, UserService,
};
use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

const BROWSER_FLOW: &str = "browser";

#[derive(Debug, Clone)]
struct StoredUser {
    user: UserRepresentation,
    group_ids: Vec<String>,
    role_names: Vec<String>,
    credential: Option<CredentialRepresentation>,
    verification_emails: u32,
}

#[derive(Debug, Clone)]
struct StoredClient {
    client: ClientRepresentation,
    secret: Option<String>,
    roles: Vec<RoleRepresentation>,
}

#[derive(Debug, Clone)]
struct RealmState {
    realm: RealmRepresentation,
    users: Vec<StoredUser>,
    clients: Vec<StoredClient>,
    roles: Vec<RoleRepresentation>,
    groups: Vec<GroupRepresentation>,
    identity_providers: Vec<IdentityProviderRepresentation>,
    mappers: Vec<IdentityProviderMapperRepresentation>,
    flows: Vec<AuthenticationFlowRepresentation>,
    executions: HashMap<String, Vec<AuthenticationExecutionInfoRepresentation>>,
}

impl RealmState {
    fn new(name: &str, display_name: Option<String>, enabled: bool) -> Self {
        let mut executions = HashMap::new();
        executions.insert(BROWSER_FLOW.to_string(), browser_executions());

        Self {
            realm: RealmRepresentation {
                id: Some(Uuid::new_v4().to_string()),
                realm: name.to_string(),
                display_name,
                enabled: Some(enabled),
            },
            users: Vec::new(),
            clients: Vec::new(),
            roles: Vec::new(),
            groups: Vec::new(),
            identity_providers: Vec::new(),
            mappers: Vec::new(),
            flows: vec![AuthenticationFlowRepresentation {
                id: Some(Uuid::new_v4().to_string()),
                alias: BROWSER_FLOW.to_string(),
                description: Some("browser based authentication".to_string()),
                provider_id: Some("basic-flow".to_string()),
                top_level: Some(true),
                built_in: Some(true),
            }],
            executions,
        }
    }

    fn user(&self, id: &str) -> ServiceResult<&StoredUser> {
        self.users
            .iter()
            .find(|u| u.user.id.as_deref() == Some(id))
            .ok_or_else(|| ServiceError::not_found("User", id))
    }

    fn user_mut(&mut self, id: &str) -> ServiceResult<&mut StoredUser> {
        self.users
            .iter_mut()
            .find(|u| u.user.id.as_deref() == Some(id))
            .ok_or_else(|| ServiceError::not_found("User", id))
    }

    fn client_mut(&mut self, id: &str) -> ServiceResult<&mut StoredClient> {
        self.clients
            .iter_mut()
            .find(|c| c.client.id.as_deref() == Some(id))
            .ok_or_else(|| ServiceError::not_found("Client", id))
    }

    fn client(&self, id: &str) -> ServiceResult<&StoredClient> {
        self.clients
            .iter()
            .find(|c| c.client.id.as_deref() == Some(id))
            .ok_or_else(|| ServiceError::not_found("Client", id))
    }

    fn group(&self, id: &str) -> ServiceResult<&GroupRepresentation> {
        find_group(&self.groups, id).ok_or_else(|| ServiceError::not_found("Group", id))
    }

    fn has_identity_provider(&self, alias: &str) -> bool {
        self.identity_providers.iter().any(|idp| idp.alias == alias)
    }
}

/// Executions of the built-in browser flow every new realm starts with.
fn browser_executions() -> Vec<AuthenticationExecutionInfoRepresentation> {
    let step = |index: u32, display_name: &str, provider_id: &str, requirement: &str| {
        AuthenticationExecutionInfoRepresentation {
            id: Some(Uuid::new_v4().to_string()),
            display_name: Some(display_name.to_string()),
            requirement: Some(requirement.to_string()),
            requirement_choices: vec![
                "REQUIRED".to_string(),
                "ALTERNATIVE".to_string(),
                "DISABLED".to_string(),
            ],
            provider_id: Some(provider_id.to_string()),
            level: Some(0),
            index: Some(index),
        }
    };

    vec![
        step(0, "Cookie", "auth-cookie", "ALTERNATIVE"),
        step(1, "Kerberos", "auth-spnego", "DISABLED"),
        step(
            2,
            "Identity Provider Redirector",
            "identity-provider-redirector",
            "ALTERNATIVE",
        ),
    ]
}

fn find_group<'a>(groups: &'a [GroupRepresentation], id: &str) -> Option<&'a GroupRepresentation> {
    for group in groups {
        if group.id.as_deref() == Some(id) {
            return Some(group);
        }
        if let Some(found) = find_group(&group.sub_groups, id) {
            return Some(found);
        }
    }
    None
}

fn find_group_mut<'a>(
    groups: &'a mut [GroupRepresentation],
    id: &str,
) -> Option<&'a mut GroupRepresentation> {
    for group in groups.iter_mut() {
        if group.id.as_deref() == Some(id) {
            return Some(group);
        }
        if let Some(found) = find_group_mut(&mut group.sub_groups, id) {
            return Some(found);
        }
    }
    None
}

fn remove_group(groups: &mut Vec<GroupRepresentation>, id: &str) -> bool {
    if let Some(pos) = groups.iter().position(|g| g.id.as_deref() == Some(id)) {
        groups.remove(pos);
        return true;
    }
    groups.iter_mut().any(|g| remove_group(&mut g.sub_groups, id))
}

/// Group as returned by membership queries, without its children.
fn flat_group(group: &GroupRepresentation) -> GroupRepresentation {
    GroupRepresentation {
        sub_groups: Vec::new(),
        ..group.clone()
    }
}

/// Copy every present member of `update` onto `user`. Identity and creation
/// time are never overwritten.
fn merge_user(user: &mut UserRepresentation, update: UserRepresentation) {
    if update.username.is_some() {
        user.username = update.username;
    }
    if update.first_name.is_some() {
        user.first_name = update.first_name;
    }
    if update.last_name.is_some() {
        user.last_name = update.last_name;
    }
    if update.email.is_some() {
        user.email = update.email;
    }
    if update.email_verified.is_some() {
        user.email_verified = update.email_verified;
    }
    if update.enabled.is_some() {
        user.enabled = update.enabled;
    }
    if update.attributes.is_some() {
        user.attributes = update.attributes;
    }
    if update.required_actions.is_some() {
        user.required_actions = update.required_actions;
    }
}

fn default_forum() -> (Vec<Topic>, Vec<Post>) {
    let topics = vec![
        Topic {
            id: 101,
            title: "Configuring an identity provider mapper for SAML attributes".to_string(),
            slug: "configuring-an-identity-provider-mapper-for-saml-attributes".to_string(),
            posts_count: 4,
        },
        Topic {
            id: 102,
            title: "Resetting a user password without sending an email".to_string(),
            slug: "resetting-a-user-password-without-sending-an-email".to_string(),
            posts_count: 2,
        },
        Topic {
            id: 103,
            title: "Copying the browser authentication flow".to_string(),
            slug: "copying-the-browser-authentication-flow".to_string(),
            posts_count: 3,
        },
    ];
    let posts = vec![
        Post {
            id: 9001,
            username: "admin-helper".to_string(),
            blurb: "Use an attribute importer mapper on the identity provider".to_string(),
            topic_id: 101,
        },
        Post {
            id: 9002,
            username: "realm-owner".to_string(),
            blurb: "Set temporary to false so the user is not asked to change the password"
                .to_string(),
            topic_id: 102,
        },
        Post {
            id: 9003,
            username: "flow-builder".to_string(),
            blurb: "Duplicate the browser flow, then bind it in the realm settings".to_string(),
            topic_id: 103,
        },
    ];
    (topics, posts)
}

/// Thread-safe in-memory implementation of every collaborator service.
///
/// Realms and the entities inside them are kept in insertion order.
/// Lookups of missing entities answer `Ok(None)`; mutations of missing
/// entities answer [`ServiceError::NotFound`].
#[derive(Clone)]
pub struct InMemoryIdentityStore {
    realms: Arc<RwLock<Vec<RealmState>>>,
    forum: Arc<(Vec<Topic>, Vec<Post>)>,
}

impl Default for InMemoryIdentityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryIdentityStore {
    /// Create an empty store with the default forum index.
    pub fn new() -> Self {
        Self::from_realms(Vec::new())
    }

    /// Create a store holding one enabled realm.
    pub fn with_realm(name: &str) -> Self {
        Self::from_realms(vec![RealmState::new(name, Some(name.to_string()), true)])
    }

    fn from_realms(realms: Vec<RealmState>) -> Self {
        Self {
            realms: Arc::new(RwLock::new(realms)),
            forum: Arc::new(default_forum()),
        }
    }

    /// Register an identity provider; admin operations only read them.
    pub async fn add_identity_provider(
        &self,
        realm: &str,
        provider: IdentityProviderRepresentation,
    ) -> ServiceResult<()> {
        self.write_realm(realm, |state| {
            if state.has_identity_provider(&provider.alias) {
                return Err(ServiceError::conflict("IdentityProvider", &provider.alias));
            }
            state.identity_providers.push(provider);
            Ok(())
        })
        .await
    }

    pub async fn add_identity_provider_mapper(
        &self,
        realm: &str,
        mut mapper: IdentityProviderMapperRepresentation,
    ) -> ServiceResult<()> {
        self.write_realm(realm, |state| {
            if !state.has_identity_provider(&mapper.identity_provider_alias) {
                return Err(ServiceError::not_found(
                    "IdentityProvider",
                    &mapper.identity_provider_alias,
                ));
            }
            mapper.id.get_or_insert_with(|| Uuid::new_v4().to_string());
            state.mappers.push(mapper);
            Ok(())
        })
        .await
    }

    /// Password credential currently set on a user.
    pub async fn credential(
        &self,
        realm: &str,
        user_id: &str,
    ) -> ServiceResult<Option<CredentialRepresentation>> {
        self.read_realm(realm, |state| Ok(state.user(user_id)?.credential.clone()))
            .await
    }

    pub async fn client_secret(&self, realm: &str, id: &str) -> ServiceResult<Option<String>> {
        self.read_realm(realm, |state| Ok(state.client(id)?.secret.clone()))
            .await
    }

    /// Number of verification emails sent to a user.
    pub async fn verification_emails_sent(&self, realm: &str, user_id: &str) -> ServiceResult<u32> {
        self.read_realm(realm, |state| Ok(state.user(user_id)?.verification_emails))
            .await
    }

    /// Store statistics for debugging.
    pub async fn stats(&self) -> InMemoryIdentityStats {
        let realms = self.realms.read().await;
        InMemoryIdentityStats {
            realm_count: realms.len(),
            user_count: realms.iter().map(|r| r.users.len()).sum(),
            client_count: realms.iter().map(|r| r.clients.len()).sum(),
            group_count: realms.iter().map(|r| r.groups.len()).sum(),
        }
    }

    async fn read_realm<T, F>(&self, realm: &str, f: F) -> ServiceResult<T>
    where
        F: FnOnce(&RealmState) -> ServiceResult<T> + Send,
    {
        let realms = self.realms.read().await;
        let state = realms
            .iter()
            .find(|r| r.realm.realm == realm)
            .ok_or_else(|| ServiceError::not_found("Realm", realm))?;
        f(state)
    }

    async fn write_realm<T, F>(&self, realm: &str, f: F) -> ServiceResult<T>
    where
        F: FnOnce(&mut RealmState) -> ServiceResult<T> + Send,
    {
        let mut realms = self.realms.write().await;
        let state = realms
            .iter_mut()
            .find(|r| r.realm.realm == realm)
            .ok_or_else(|| ServiceError::not_found("Realm", realm))?;
        f(state)
    }
}

/// Entity counts across all realms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InMemoryIdentityStats {
    pub realm_count: usize,
    pub user_count: usize,
    pub client_count: usize,
    /// Top-level groups only
    pub group_count: usize,
}

#[async_trait]
impl UserService for InMemoryIdentityStore {
    async fn list(&self, realm: &str) -> ServiceResult<Vec<UserRepresentation>> {
        self.read_realm(realm, |state| {
            Ok(state.users.iter().map(|u| u.user.clone()).collect())
        })
        .await
    }

    async fn get_by_username(
        &self,
        realm: &str,
        username: &str,
    ) -> ServiceResult<Option<UserRepresentation>> {
        self.read_realm(realm, |state| {
            Ok(state
                .users
                .iter()
                .find(|u| u.user.username.as_deref() == Some(username))
                .map(|u| u.user.clone()))
        })
        .await
    }

    async fn create(&self, realm: &str, mut user: UserRepresentation) -> ServiceResult<String> {
        let username = user
            .username
            .clone()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ServiceError::rejected(400, "User name is missing"))?;

        self.write_realm(realm, |state| {
            if state
                .users
                .iter()
                .any(|u| u.user.username.as_deref() == Some(username.as_str()))
            {
                return Err(ServiceError::conflict("User", &username));
            }

            let id = Uuid::new_v4().to_string();
            let credential = user
                .credentials
                .take()
                .and_then(|creds| creds.into_iter().next());
            user.id = Some(id.clone());
            user.created_timestamp = Some(chrono::Utc::now().timestamp_millis());
            debug!("Created user {} in realm {}", username, realm);

            state.users.push(StoredUser {
                user,
                group_ids: Vec::new(),
                role_names: Vec::new(),
                credential,
                verification_emails: 0,
            });
            Ok(id)
        })
        .await
    }

    async fn delete(&self, realm: &str, username: &str) -> ServiceResult<()> {
        self.write_realm(realm, |state| {
            let pos = state
                .users
                .iter()
                .position(|u| u.user.username.as_deref() == Some(username))
                .ok_or_else(|| ServiceError::not_found("User", username))?;
            state.users.remove(pos);
            Ok(())
        })
        .await
    }

    async fn update(
        &self,
        realm: &str,
        id: &str,
        mut user: UserRepresentation,
    ) -> ServiceResult<()> {
        let credential = user
            .credentials
            .take()
            .and_then(|creds| creds.into_iter().next());
        self.write_realm(realm, |state| {
            if let Some(new_name) = user.username.as_deref() {
                let taken = state.users.iter().any(|u| {
                    u.user.username.as_deref() == Some(new_name) && u.user.id.as_deref() != Some(id)
                });
                if taken {
                    return Err(ServiceError::conflict("User", new_name));
                }
            }
            let stored = state.user_mut(id)?;
            merge_user(&mut stored.user, user);
            if credential.is_some() {
                stored.credential = credential;
            }
            Ok(())
        })
        .await
    }

    async fn get_by_id(&self, realm: &str, id: &str) -> ServiceResult<Option<UserRepresentation>> {
        self.read_realm(realm, |state| {
            Ok(state
                .users
                .iter()
                .find(|u| u.user.id.as_deref() == Some(id))
                .map(|u| u.user.clone()))
        })
        .await
    }

    async fn list_groups(&self, realm: &str, id: &str) -> ServiceResult<Vec<GroupRepresentation>> {
        self.read_realm(realm, |state| {
            let user = state.user(id)?;
            Ok(user
                .group_ids
                .iter()
                .filter_map(|gid| find_group(&state.groups, gid))
                .map(flat_group)
                .collect())
        })
        .await
    }

    async fn join_group(&self, realm: &str, id: &str, group_id: &str) -> ServiceResult<()> {
        self.write_realm(realm, |state| {
            state.group(group_id)?;
            let user = state.user_mut(id)?;
            if !user.group_ids.iter().any(|g| g == group_id) {
                user.group_ids.push(group_id.to_string());
            }
            Ok(())
        })
        .await
    }

    async fn leave_group(&self, realm: &str, id: &str, group_id: &str) -> ServiceResult<()> {
        self.write_realm(realm, |state| {
            state.group(group_id)?;
            state.user_mut(id)?.group_ids.retain(|g| g != group_id);
            Ok(())
        })
        .await
    }

    async fn list_roles(&self, realm: &str, id: &str) -> ServiceResult<Vec<RoleRepresentation>> {
        self.read_realm(realm, |state| {
            let user = state.user(id)?;
            Ok(user
                .role_names
                .iter()
                .filter_map(|name| state.roles.iter().find(|r| &r.name == name))
                .cloned()
                .collect())
        })
        .await
    }

    async fn add_role(&self, realm: &str, id: &str, role_name: &str) -> ServiceResult<()> {
        self.write_realm(realm, |state| {
            if !state.roles.iter().any(|r| r.name == role_name) {
                return Err(ServiceError::not_found("Role", role_name));
            }
            let user = state.user_mut(id)?;
            if !user.role_names.iter().any(|r| r == role_name) {
                user.role_names.push(role_name.to_string());
            }
            Ok(())
        })
        .await
    }

    async fn remove_role(&self, realm: &str, id: &str, role_name: &str) -> ServiceResult<()> {
        self.write_realm(realm, |state| {
            if !state.roles.iter().any(|r| r.name == role_name) {
                return Err(ServiceError::not_found("Role", role_name));
            }
            state.user_mut(id)?.role_names.retain(|r| r != role_name);
            Ok(())
        })
        .await
    }

    async fn reset_password(
        &self,
        realm: &str,
        id: &str,
        password: &str,
        temporary: bool,
    ) -> ServiceResult<()> {
        self.write_realm(realm, |state| {
            state.user_mut(id)?.credential =
                Some(CredentialRepresentation::password(password, temporary));
            Ok(())
        })
        .await
    }

    async fn send_verification_email(&self, realm: &str, id: &str) -> ServiceResult<()> {
        self.write_realm(realm, |state| {
            let user = state.user_mut(id)?;
            if user.user.email.as_deref().is_none_or(str::is_empty) {
                return Err(ServiceError::rejected(400, "User email missing"));
            }
            user.verification_emails += 1;
            Ok(())
        })
        .await
    }

    async fn count(&self, realm: &str) -> ServiceResult<u64> {
        self.read_realm(realm, |state| Ok(state.users.len() as u64))
            .await
    }
}

#[async_trait]
impl RealmService for InMemoryIdentityStore {
    async fn list(&self) -> ServiceResult<Vec<RealmRepresentation>> {
        let realms = self.realms.read().await;
        Ok(realms.iter().map(|r| r.realm.clone()).collect())
    }

    async fn get(&self, name: &str) -> ServiceResult<Option<RealmRepresentation>> {
        let realms = self.realms.read().await;
        Ok(realms
            .iter()
            .find(|r| r.realm.realm == name)
            .map(|r| r.realm.clone()))
    }

    async fn create(&self, name: &str, display_name: &str, enabled: bool) -> ServiceResult<()> {
        let mut realms = self.realms.write().await;
        if realms.iter().any(|r| r.realm.realm == name) {
            return Err(ServiceError::conflict("Realm", name));
        }
        realms.push(RealmState::new(name, Some(display_name.to_string()), enabled));
        debug!("Created realm {}", name);
        Ok(())
    }

    async fn delete(&self, name: &str) -> ServiceResult<()> {
        let mut realms = self.realms.write().await;
        let pos = realms
            .iter()
            .position(|r| r.realm.realm == name)
            .ok_or_else(|| ServiceError::not_found("Realm", name))?;
        realms.remove(pos);
        Ok(())
    }
}

#[async_trait]
impl ClientService for InMemoryIdentityStore {
    async fn list(&self, realm: &str) -> ServiceResult<Vec<ClientRepresentation>> {
        self.read_realm(realm, |state| {
            Ok(state.clients.iter().map(|c| c.client.clone()).collect())
        })
        .await
    }

    async fn get_by_client_id(
        &self,
        realm: &str,
        client_id: &str,
    ) -> ServiceResult<Option<ClientRepresentation>> {
        self.read_realm(realm, |state| {
            Ok(state
                .clients
                .iter()
                .find(|c| c.client.client_id == client_id)
                .map(|c| c.client.clone()))
        })
        .await
    }

    async fn create(
        &self,
        realm: &str,
        client_id: &str,
        redirect_uris: Vec<String>,
    ) -> ServiceResult<String> {
        self.write_realm(realm, |state| {
            if state.clients.iter().any(|c| c.client.client_id == client_id) {
                return Err(ServiceError::conflict("Client", client_id));
            }
            let id = Uuid::new_v4().to_string();
            let mut client = ClientRepresentation::confidential(client_id, redirect_uris);
            client.id = Some(id.clone());
            state.clients.push(StoredClient {
                client,
                secret: Some(Uuid::new_v4().simple().to_string()),
                roles: Vec::new(),
            });
            Ok(id)
        })
        .await
    }

    async fn delete(&self, realm: &str, id: &str) -> ServiceResult<()> {
        self.write_realm(realm, |state| {
            state.client(id)?;
            state.clients.retain(|c| c.client.id.as_deref() != Some(id));
            Ok(())
        })
        .await
    }

    async fn generate_secret(&self, realm: &str, id: &str) -> ServiceResult<String> {
        self.write_realm(realm, |state| {
            let client = state.client_mut(id)?;
            if client.client.public_client == Some(true) {
                return Err(ServiceError::rejected(400, "Public clients have no secret"));
            }
            let secret = Uuid::new_v4().simple().to_string();
            client.secret = Some(secret.clone());
            Ok(secret)
        })
        .await
    }

    async fn list_roles(&self, realm: &str, id: &str) -> ServiceResult<Vec<RoleRepresentation>> {
        self.read_realm(realm, |state| Ok(state.client(id)?.roles.clone()))
            .await
    }

    async fn create_role(
        &self,
        realm: &str,
        id: &str,
        role_name: &str,
        description: &str,
    ) -> ServiceResult<()> {
        self.write_realm(realm, |state| {
            let client = state.client_mut(id)?;
            if client.roles.iter().any(|r| r.name == role_name) {
                return Err(ServiceError::conflict("Role", role_name));
            }
            client.roles.push(RoleRepresentation {
                id: Some(Uuid::new_v4().to_string()),
                name: role_name.to_string(),
                description: Some(description.to_string()).filter(|d| !d.is_empty()),
                composite: Some(false),
                client_role: Some(true),
            });
            Ok(())
        })
        .await
    }

    async fn delete_role(&self, realm: &str, id: &str, role_name: &str) -> ServiceResult<()> {
        self.write_realm(realm, |state| {
            let client = state.client_mut(id)?;
            let pos = client
                .roles
                .iter()
                .position(|r| r.name == role_name)
                .ok_or_else(|| ServiceError::not_found("Role", role_name))?;
            client.roles.remove(pos);
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl RoleService for InMemoryIdentityStore {
    async fn list_realm_roles(&self, realm: &str) -> ServiceResult<Vec<RoleRepresentation>> {
        self.read_realm(realm, |state| Ok(state.roles.clone())).await
    }

    async fn get_realm_role(
        &self,
        realm: &str,
        name: &str,
    ) -> ServiceResult<Option<RoleRepresentation>> {
        self.read_realm(realm, |state| {
            Ok(state.roles.iter().find(|r| r.name == name).cloned())
        })
        .await
    }

    async fn create_realm_role(
        &self,
        realm: &str,
        name: &str,
        description: &str,
    ) -> ServiceResult<()> {
        self.write_realm(realm, |state| {
            if state.roles.iter().any(|r| r.name == name) {
                return Err(ServiceError::conflict("Role", name));
            }
            state.roles.push(RoleRepresentation {
                id: Some(Uuid::new_v4().to_string()),
                name: name.to_string(),
                description: Some(description.to_string()).filter(|d| !d.is_empty()),
                composite: Some(false),
                client_role: Some(false),
            });
            Ok(())
        })
        .await
    }

    async fn delete_realm_role(&self, realm: &str, name: &str) -> ServiceResult<()> {
        self.write_realm(realm, |state| {
            let pos = state
                .roles
                .iter()
                .position(|r| r.name == name)
                .ok_or_else(|| ServiceError::not_found("Role", name))?;
            state.roles.remove(pos);
            for user in &mut state.users {
                user.role_names.retain(|r| r != name);
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl GroupService for InMemoryIdentityStore {
    async fn list(&self, realm: &str) -> ServiceResult<Vec<GroupRepresentation>> {
        self.read_realm(realm, |state| Ok(state.groups.clone())).await
    }

    async fn get(&self, realm: &str, id: &str) -> ServiceResult<Option<GroupRepresentation>> {
        self.read_realm(realm, |state| Ok(find_group(&state.groups, id).cloned()))
            .await
    }

    async fn list_members(&self, realm: &str, id: &str) -> ServiceResult<Vec<UserRepresentation>> {
        self.read_realm(realm, |state| {
            state.group(id)?;
            Ok(state
                .users
                .iter()
                .filter(|u| u.group_ids.iter().any(|g| g == id))
                .map(|u| u.user.clone())
                .collect())
        })
        .await
    }

    async fn create(&self, realm: &str, name: &str) -> ServiceResult<String> {
        self.write_realm(realm, |state| {
            if state.groups.iter().any(|g| g.name == name) {
                return Err(ServiceError::conflict("Group", name));
            }
            let id = Uuid::new_v4().to_string();
            state.groups.push(GroupRepresentation {
                id: Some(id.clone()),
                name: name.to_string(),
                path: Some(format!("/{}", name)),
                attributes: None,
                sub_groups: Vec::new(),
            });
            Ok(id)
        })
        .await
    }

    async fn update(&self, realm: &str, id: &str, group: GroupRepresentation) -> ServiceResult<()> {
        self.write_realm(realm, |state| {
            let existing = find_group_mut(&mut state.groups, id)
                .ok_or_else(|| ServiceError::not_found("Group", id))?;
            if !group.name.is_empty() && group.name != existing.name {
                let parent = existing
                    .path
                    .as_deref()
                    .and_then(|p| p.rsplit_once('/'))
                    .map(|(parent, _)| parent.to_string())
                    .unwrap_or_default();
                existing.path = Some(format!("{}/{}", parent, group.name));
                existing.name = group.name;
            }
            if group.attributes.is_some() {
                existing.attributes = group.attributes;
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, realm: &str, id: &str) -> ServiceResult<()> {
        self.write_realm(realm, |state| {
            if !remove_group(&mut state.groups, id) {
                return Err(ServiceError::not_found("Group", id));
            }
            let groups = &state.groups;
            for user in &mut state.users {
                user.group_ids
                    .retain(|gid| find_group(groups, gid).is_some());
            }
            Ok(())
        })
        .await
    }

    async fn create_subgroup(
        &self,
        realm: &str,
        parent_id: &str,
        name: &str,
    ) -> ServiceResult<String> {
        self.write_realm(realm, |state| {
            let parent = find_group_mut(&mut state.groups, parent_id)
                .ok_or_else(|| ServiceError::not_found("Group", parent_id))?;
            if parent.sub_groups.iter().any(|g| g.name == name) {
                return Err(ServiceError::conflict("Group", name));
            }
            let id = Uuid::new_v4().to_string();
            let path = format!("{}/{}", parent.path.as_deref().unwrap_or_default(), name);
            parent.sub_groups.push(GroupRepresentation {
                id: Some(id.clone()),
                name: name.to_string(),
                path: Some(path),
                attributes: None,
                sub_groups: Vec::new(),
            });
            Ok(id)
        })
        .await
    }
}

#[async_trait]
impl IdentityProviderService for InMemoryIdentityStore {
    async fn list(&self, realm: &str) -> ServiceResult<Vec<IdentityProviderRepresentation>> {
        self.read_realm(realm, |state| Ok(state.identity_providers.clone()))
            .await
    }

    async fn get(
        &self,
        realm: &str,
        alias: &str,
    ) -> ServiceResult<Option<IdentityProviderRepresentation>> {
        self.read_realm(realm, |state| {
            Ok(state
                .identity_providers
                .iter()
                .find(|idp| idp.alias == alias)
                .cloned())
        })
        .await
    }

    async fn list_mappers(
        &self,
        realm: &str,
        alias: &str,
    ) -> ServiceResult<Vec<IdentityProviderMapperRepresentation>> {
        self.read_realm(realm, |state| {
            if !state.has_identity_provider(alias) {
                return Err(ServiceError::not_found("IdentityProvider", alias));
            }
            Ok(state
                .mappers
                .iter()
                .filter(|m| m.identity_provider_alias == alias)
                .cloned()
                .collect())
        })
        .await
    }
}

#[async_trait]
impl AuthenticationFlowService for InMemoryIdentityStore {
    async fn list(&self, realm: &str) -> ServiceResult<Vec<AuthenticationFlowRepresentation>> {
        self.read_realm(realm, |state| Ok(state.flows.clone())).await
    }

    async fn get(
        &self,
        realm: &str,
        id: &str,
    ) -> ServiceResult<Option<AuthenticationFlowRepresentation>> {
        self.read_realm(realm, |state| {
            Ok(state
                .flows
                .iter()
                .find(|f| f.id.as_deref() == Some(id))
                .cloned())
        })
        .await
    }

    async fn create(
        &self,
        realm: &str,
        mut flow: AuthenticationFlowRepresentation,
    ) -> ServiceResult<()> {
        if flow.alias.trim().is_empty() {
            return Err(ServiceError::rejected(400, "Flow alias is missing"));
        }
        self.write_realm(realm, |state| {
            if state.flows.iter().any(|f| f.alias == flow.alias) {
                return Err(ServiceError::conflict("AuthenticationFlow", &flow.alias));
            }
            flow.id = Some(Uuid::new_v4().to_string());
            flow.built_in = Some(false);
            state.executions.insert(flow.alias.clone(), Vec::new());
            state.flows.push(flow);
            Ok(())
        })
        .await
    }

    async fn delete(&self, realm: &str, id: &str) -> ServiceResult<()> {
        self.write_realm(realm, |state| {
            let pos = state
                .flows
                .iter()
                .position(|f| f.id.as_deref() == Some(id))
                .ok_or_else(|| ServiceError::not_found("AuthenticationFlow", id))?;
            if state.flows[pos].built_in == Some(true) {
                return Err(ServiceError::rejected(400, "Can't delete built in flow"));
            }
            let flow = state.flows.remove(pos);
            state.executions.remove(&flow.alias);
            Ok(())
        })
        .await
    }

    async fn list_executions(
        &self,
        realm: &str,
        alias: &str,
    ) -> ServiceResult<Vec<AuthenticationExecutionInfoRepresentation>> {
        self.read_realm(realm, |state| {
            state
                .executions
                .get(alias)
                .cloned()
                .ok_or_else(|| ServiceError::not_found("AuthenticationFlow", alias))
        })
        .await
    }

    async fn update_execution(
        &self,
        realm: &str,
        alias: &str,
        execution: AuthenticationExecutionInfoRepresentation,
    ) -> ServiceResult<()> {
        let execution_id = execution
            .id
            .clone()
            .ok_or_else(|| ServiceError::rejected(400, "Execution id is missing"))?;

        self.write_realm(realm, |state| {
            let steps = state
                .executions
                .get_mut(alias)
                .ok_or_else(|| ServiceError::not_found("AuthenticationFlow", alias))?;
            let step = steps
                .iter_mut()
                .find(|s| s.id.as_deref() == Some(execution_id.as_str()))
                .ok_or_else(|| ServiceError::not_found("Execution", &execution_id))?;

            if let Some(requirement) = execution.requirement {
                if !step.requirement_choices.is_empty()
                    && !step.requirement_choices.contains(&requirement)
                {
                    return Err(ServiceError::rejected(
                        400,
                        format!("Requirement {} is not allowed", requirement),
                    ));
                }
                step.requirement = Some(requirement);
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl SearchService for InMemoryIdentityStore {
    async fn search(&self, query: &str) -> ServiceResult<SearchResult> {
        let needle = query.trim().to_lowercase();
        let (topics, posts) = self.forum.as_ref();

        let topics: Vec<Topic> = topics
            .iter()
            .filter(|t| !needle.is_empty() && t.title.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        let posts: Vec<Post> = posts
            .iter()
            .filter(|p| {
                !needle.is_empty()
                    && (p.blurb.to_lowercase().contains(&needle)
                        || topics.iter().any(|t| t.id == p.topic_id))
            })
            .cloned()
            .collect();

        Ok(SearchResult {
            posts,
            topics,
            extra: HashMap::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REALM: &str = "demo";

    fn user(username: &str, email: Option<&str>) -> UserRepresentation {
        UserRepresentation {
            username: Some(username.to_string()),
            email: email.map(str::to_string),
            enabled: Some(true),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_users_keep_insertion_order() {
        let store = InMemoryIdentityStore::with_realm(REALM);
        for name in ["zoe", "adam", "mia"] {
            UserService::create(&store, REALM, user(name, None))
                .await
                .unwrap();
        }
        let names: Vec<String> = UserService::list(&store, REALM)
            .await
            .unwrap()
            .into_iter()
            .filter_map(|u| u.username)
            .collect();
        assert_eq!(names, vec!["zoe", "adam", "mia"]);
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let store = InMemoryIdentityStore::with_realm(REALM);
        UserService::create(&store, REALM, user("jdoe", None))
            .await
            .unwrap();
        let err = UserService::create(&store, REALM, user("jdoe", None))
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::conflict("User", "jdoe"));
    }

    #[tokio::test]
    async fn test_lookup_vs_mutation_of_missing_entity() {
        let store = InMemoryIdentityStore::with_realm(REALM);
        assert_eq!(
            UserService::get_by_id(&store, REALM, "nope").await.unwrap(),
            None
        );
        let err = store
            .reset_password(REALM, "nope", "pw", false)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_replaces_password_only_when_given() {
        let store = InMemoryIdentityStore::with_realm(REALM);
        let mut created = user("jdoe", None);
        created.credentials = Some(vec![CredentialRepresentation::password("first", false)]);
        let uid = UserService::create(&store, REALM, created).await.unwrap();

        UserService::update(&store, REALM, &uid, user("jdoe", Some("j@x.com")))
            .await
            .unwrap();
        let kept = store.credential(REALM, &uid).await.unwrap().unwrap();
        assert_eq!(kept.value, "first");

        let changed = UserRepresentation {
            credentials: Some(vec![CredentialRepresentation::password("second", true)]),
            ..Default::default()
        };
        UserService::update(&store, REALM, &uid, changed).await.unwrap();
        let replaced = store.credential(REALM, &uid).await.unwrap().unwrap();
        assert_eq!(replaced.value, "second");
        assert!(replaced.temporary);
    }

    #[tokio::test]
    async fn test_unknown_realm_is_not_found() {
        let store = InMemoryIdentityStore::new();
        let err = UserService::count(&store, "ghost").await.unwrap_err();
        assert_eq!(err, ServiceError::not_found("Realm", "ghost"));
    }

    #[tokio::test]
    async fn test_group_tree_and_membership() {
        let store = InMemoryIdentityStore::with_realm(REALM);
        let parent = GroupService::create(&store, REALM, "eng").await.unwrap();
        let child = store.create_subgroup(REALM, &parent, "platform").await.unwrap();
        let uid = UserService::create(&store, REALM, user("jdoe", None))
            .await
            .unwrap();
        store.join_group(REALM, &uid, &child).await.unwrap();

        let groups = store.list_groups(REALM, &uid).await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].path.as_deref(), Some("/eng/platform"));

        GroupService::delete(&store, REALM, &parent).await.unwrap();
        assert!(store.list_groups(REALM, &uid).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_verification_email_requires_address() {
        let store = InMemoryIdentityStore::with_realm(REALM);
        let without = UserService::create(&store, REALM, user("a", None))
            .await
            .unwrap();
        let with = UserService::create(&store, REALM, user("b", Some("b@example.com")))
            .await
            .unwrap();

        assert!(matches!(
            store.send_verification_email(REALM, &without).await,
            Err(ServiceError::Rejected { status: 400, .. })
        ));
        store.send_verification_email(REALM, &with).await.unwrap();
        assert_eq!(store.verification_emails_sent(REALM, &with).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_built_in_flow_cannot_be_deleted() {
        let store = InMemoryIdentityStore::with_realm(REALM);
        let flows = AuthenticationFlowService::list(&store, REALM).await.unwrap();
        let browser = flows[0].id.clone().unwrap();
        assert!(matches!(
            AuthenticationFlowService::delete(&store, REALM, &browser).await,
            Err(ServiceError::Rejected { .. })
        ));
        assert_eq!(store.list_executions(REALM, BROWSER_FLOW).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_search_matches_titles_and_blurbs() {
        let store = InMemoryIdentityStore::new();
        let result = store.search("browser").await.unwrap();
        assert_eq!(result.topics.len(), 1);
        assert_eq!(result.posts.len(), 1);
        assert!(store.search("   ").await.unwrap().topics.is_empty());
    }

    #[tokio::test]
    async fn test_stats() {
        let store = InMemoryIdentityStore::with_realm(REALM);
        RealmService::create(&store, "other", "Other", false)
            .await
            .unwrap();
        UserService::create(&store, REALM, user("jdoe", None))
            .await
            .unwrap();
        let stats = store.stats().await;
        assert_eq!(stats.realm_count, 2);
        assert_eq!(stats.user_count, 1);
    }
}
