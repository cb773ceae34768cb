//! Operation identifiers.
//!
//! [`Operation`] is the closed set of administrative actions the dispatcher
//! understands. Names are matched exactly and case-sensitively.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Administrative domain an operation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    User,
    Realm,
    Client,
    Role,
    Group,
    IdentityProvider,
    AuthenticationFlow,
    Search,
}

impl Domain {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Realm => "realm",
            Self::Client => "client",
            Self::Role => "role",
            Self::Group => "group",
            Self::IdentityProvider => "identity_provider",
            Self::AuthenticationFlow => "authentication_flow",
            Self::Search => "search",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every operation the dispatcher can route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    // User
    GetUsers,
    GetUserByUsername,
    CreateUser,
    DeleteUser,
    UpdateUser,
    GetUserById,
    GetUserGroups,
    AddUserToGroup,
    RemoveUserFromGroup,
    GetUserRoles,
    AddRoleToUser,
    RemoveRoleFromUser,
    ResetPassword,
    SendVerificationEmail,
    CountUsers,

    // Realm
    GetRealms,
    GetRealm,
    CreateRealm,
    DeleteRealm,

    // Client
    GetClients,
    GetClient,
    CreateClient,
    DeleteClient,
    GenerateClientSecret,
    GetClientRoles,
    CreateClientRole,
    DeleteClientRole,

    // Role
    GetRealmRoles,
    GetRealmRole,
    CreateRealmRole,
    DeleteRealmRole,

    // Group
    GetGroups,
    GetGroup,
    GetGroupMembers,
    CreateGroup,
    UpdateGroup,
    DeleteGroup,
    CreateSubgroup,

    // Identity provider
    GetIdentityProviders,
    GetIdentityProvider,
    GetIdentityProviderMappers,

    // Authentication flow
    GetAuthenticationFlows,
    GetAuthenticationFlow,
    CreateAuthenticationFlow,
    DeleteAuthenticationFlow,
    GetFlowExecutions,
    UpdateFlowExecution,

    // Search
    SearchDiscourse,
}

impl Operation {
    /// All operations in declaration order.
    pub const ALL: [Operation; 48] = [
        Self::GetUsers,
        Self::GetUserByUsername,
        Self::CreateUser,
        Self::DeleteUser,
        Self::UpdateUser,
        Self::GetUserById,
        Self::GetUserGroups,
        Self::AddUserToGroup,
        Self::RemoveUserFromGroup,
        Self::GetUserRoles,
        Self::AddRoleToUser,
        Self::RemoveRoleFromUser,
        Self::ResetPassword,
        Self::SendVerificationEmail,
        Self::CountUsers,
        Self::GetRealms,
        Self::GetRealm,
        Self::CreateRealm,
        Self::DeleteRealm,
        Self::GetClients,
        Self::GetClient,
        Self::CreateClient,
        Self::DeleteClient,
        Self::GenerateClientSecret,
        Self::GetClientRoles,
        Self::CreateClientRole,
        Self::DeleteClientRole,
        Self::GetRealmRoles,
        Self::GetRealmRole,
        Self::CreateRealmRole,
        Self::DeleteRealmRole,
        Self::GetGroups,
        Self::GetGroup,
        Self::GetGroupMembers,
        Self::CreateGroup,
        Self::UpdateGroup,
        Self::DeleteGroup,
        Self::CreateSubgroup,
        Self::GetIdentityProviders,
        Self::GetIdentityProvider,
        Self::GetIdentityProviderMappers,
        Self::GetAuthenticationFlows,
        Self::GetAuthenticationFlow,
        Self::CreateAuthenticationFlow,
        Self::DeleteAuthenticationFlow,
        Self::GetFlowExecutions,
        Self::UpdateFlowExecution,
        Self::SearchDiscourse,
    ];

    /// Canonical selector name, e.g. `GET_USERS`.
    pub fn name(self) -> &'static str {
        match self {
            Self::GetUsers => "GET_USERS",
            Self::GetUserByUsername => "GET_USER_BY_USERNAME",
            Self::CreateUser => "CREATE_USER",
            Self::DeleteUser => "DELETE_USER",
            Self::UpdateUser => "UPDATE_USER",
            Self::GetUserById => "GET_USER_BY_ID",
            Self::GetUserGroups => "GET_USER_GROUPS",
            Self::AddUserToGroup => "ADD_USER_TO_GROUP",
            Self::RemoveUserFromGroup => "REMOVE_USER_FROM_GROUP",
            Self::GetUserRoles => "GET_USER_ROLES",
            Self::AddRoleToUser => "ADD_ROLE_TO_USER",
            Self::RemoveRoleFromUser => "REMOVE_ROLE_FROM_USER",
            Self::ResetPassword => "RESET_PASSWORD",
            Self::SendVerificationEmail => "SEND_VERIFICATION_EMAIL",
            Self::CountUsers => "COUNT_USERS",
            Self::GetRealms => "GET_REALMS",
            Self::GetRealm => "GET_REALM",
            Self::CreateRealm => "CREATE_REALM",
            Self::DeleteRealm => "DELETE_REALM",
            Self::GetClients => "GET_CLIENTS",
            Self::GetClient => "GET_CLIENT",
            Self::CreateClient => "CREATE_CLIENT",
            Self::DeleteClient => "DELETE_CLIENT",
            Self::GenerateClientSecret => "GENERATE_CLIENT_SECRET",
            Self::GetClientRoles => "GET_CLIENT_ROLES",
            Self::CreateClientRole => "CREATE_CLIENT_ROLE",
            Self::DeleteClientRole => "DELETE_CLIENT_ROLE",
            Self::GetRealmRoles => "GET_REALM_ROLES",
            Self::GetRealmRole => "GET_REALM_ROLE",
            Self::CreateRealmRole => "CREATE_REALM_ROLE",
            Self::DeleteRealmRole => "DELETE_REALM_ROLE",
            Self::GetGroups => "GET_GROUPS",
            Self::GetGroup => "GET_GROUP",
            Self::GetGroupMembers => "GET_GROUP_MEMBERS",
            Self::CreateGroup => "CREATE_GROUP",
            Self::UpdateGroup => "UPDATE_GROUP",
            Self::DeleteGroup => "DELETE_GROUP",
            Self::CreateSubgroup => "CREATE_SUBGROUP",
            Self::GetIdentityProviders => "GET_IDENTITY_PROVIDERS",
            Self::GetIdentityProvider => "GET_IDENTITY_PROVIDER",
            Self::GetIdentityProviderMappers => "GET_IDENTITY_PROVIDER_MAPPERS",
            Self::GetAuthenticationFlows => "GET_AUTHENTICATION_FLOWS",
            Self::GetAuthenticationFlow => "GET_AUTHENTICATION_FLOW",
            Self::CreateAuthenticationFlow => "CREATE_AUTHENTICATION_FLOW",
            Self::DeleteAuthenticationFlow => "DELETE_AUTHENTICATION_FLOW",
            Self::GetFlowExecutions => "GET_FLOW_EXECUTIONS",
            Self::UpdateFlowExecution => "UPDATE_FLOW_EXECUTION",
            Self::SearchDiscourse => "SEARCH_DISCOURSE",
        }
    }

    pub fn domain(self) -> Domain {
        match self {
            Self::GetUsers
            | Self::GetUserByUsername
            | Self::CreateUser
            | Self::DeleteUser
            | Self::UpdateUser
            | Self::GetUserById
            | Self::GetUserGroups
            | Self::AddUserToGroup
            | Self::RemoveUserFromGroup
            | Self::GetUserRoles
            | Self::AddRoleToUser
            | Self::RemoveRoleFromUser
            | Self::ResetPassword
            | Self::SendVerificationEmail
            | Self::CountUsers => Domain::User,
            Self::GetRealms | Self::GetRealm | Self::CreateRealm | Self::DeleteRealm => {
                Domain::Realm
            }
            Self::GetClients
            | Self::GetClient
            | Self::CreateClient
            | Self::DeleteClient
            | Self::GenerateClientSecret
            | Self::GetClientRoles
            | Self::CreateClientRole
            | Self::DeleteClientRole => Domain::Client,
            Self::GetRealmRoles
            | Self::GetRealmRole
            | Self::CreateRealmRole
            | Self::DeleteRealmRole => Domain::Role,
            Self::GetGroups
            | Self::GetGroup
            | Self::GetGroupMembers
            | Self::CreateGroup
            | Self::UpdateGroup
            | Self::DeleteGroup
            | Self::CreateSubgroup => Domain::Group,
            Self::GetIdentityProviders
            | Self::GetIdentityProvider
            | Self::GetIdentityProviderMappers => Domain::IdentityProvider,
            Self::GetAuthenticationFlows
            | Self::GetAuthenticationFlow
            | Self::CreateAuthenticationFlow
            | Self::DeleteAuthenticationFlow
            | Self::GetFlowExecutions
            | Self::UpdateFlowExecution => Domain::AuthenticationFlow,
            Self::SearchDiscourse => Domain::Search,
        }
    }

    /// Resolve a selector name. Exact, case-sensitive match only.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.name() == name)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = crate::error::OperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| crate::error::OperationError::unknown_operation(s))
    }
}
