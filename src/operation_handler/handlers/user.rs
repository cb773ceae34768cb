//! User operation handlers.

use super::{REALM, confirm, scalar};
use crate::operation_handler::{
    catalog::{CatalogBuilder, HandlerFuture},
    encoder::HandlerOutput,
    field::FieldSpec,
    params::BoundArgs,
    types::Operation,
};
use crate::services::{Collaborators, CredentialRepresentation, UserRepresentation};

const USER_ID: FieldSpec = FieldSpec::required_string("userId");
const USERNAME: FieldSpec = FieldSpec::required_string("username");
const GROUP_ID: FieldSpec = FieldSpec::required_string("groupId");
const ROLE_NAME: FieldSpec = FieldSpec::required_string("roleName");

const REALM_ONLY: &[FieldSpec] = &[REALM];
const BY_USERNAME: &[FieldSpec] = &[REALM, USERNAME];
const BY_ID: &[FieldSpec] = &[REALM, USER_ID];
const GROUP_MEMBERSHIP: &[FieldSpec] = &[REALM, USER_ID, GROUP_ID];
const ROLE_MAPPING: &[FieldSpec] = &[REALM, USER_ID, ROLE_NAME];
const CREATE: &[FieldSpec] = &[
    REALM,
    USERNAME,
    FieldSpec::required_string("firstName"),
    FieldSpec::required_string("lastName"),
    FieldSpec::required_string("email"),
    FieldSpec::required_string("password"),
];
const UPDATE: &[FieldSpec] = &[REALM, USER_ID, FieldSpec::required_object("userRepresentation")];
const RESET_PASSWORD: &[FieldSpec] = &[
    REALM,
    USER_ID,
    FieldSpec::required_string("newPassword"),
    FieldSpec::optional_bool("temporary", false),
];

pub fn register(builder: &mut CatalogBuilder) {
    builder
        .register(Operation::GetUsers, REALM_ONLY, get_users)
        .register(Operation::GetUserByUsername, BY_USERNAME, get_user_by_username)
        .register(Operation::CreateUser, CREATE, create_user)
        .register(Operation::DeleteUser, BY_USERNAME, delete_user)
        .register(Operation::UpdateUser, UPDATE, update_user)
        .register(Operation::GetUserById, BY_ID, get_user_by_id)
        .register(Operation::GetUserGroups, BY_ID, get_user_groups)
        .register(Operation::AddUserToGroup, GROUP_MEMBERSHIP, add_user_to_group)
        .register(Operation::RemoveUserFromGroup, GROUP_MEMBERSHIP, remove_user_from_group)
        .register(Operation::GetUserRoles, BY_ID, get_user_roles)
        .register(Operation::AddRoleToUser, ROLE_MAPPING, add_role_to_user)
        .register(Operation::RemoveRoleFromUser, ROLE_MAPPING, remove_role_from_user)
        .register(Operation::ResetPassword, RESET_PASSWORD, reset_password)
        .register(Operation::SendVerificationEmail, BY_ID, send_verification_email)
        .register(Operation::CountUsers, REALM_ONLY, count_users);
}

fn get_users(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let users = services.users.list(&realm).await?;
        HandlerOutput::list(&users)
    })
}

fn get_user_by_username(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let username = args.string("username")?;
        let user = services.users.get_by_username(&realm, &username).await?;
        HandlerOutput::optional(user.as_ref())
    })
}

fn create_user(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let username = args.string("username")?;
        let user = UserRepresentation {
            username: Some(username.clone()),
            first_name: Some(args.string("firstName")?),
            last_name: Some(args.string("lastName")?),
            email: Some(args.string("email")?),
            enabled: Some(true),
            credentials: Some(vec![CredentialRepresentation::password(
                args.string("password")?,
                false,
            )]),
            ..Default::default()
        };
        services.users.create(&realm, user).await?;
        confirm(format!("Successfully created user: {}", username))
    })
}

fn delete_user(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let username = args.string("username")?;
        services.users.delete(&realm, &username).await?;
        confirm(format!("Successfully deleted user: {}", username))
    })
}

fn update_user(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let user_id = args.string("userId")?;
        let user: UserRepresentation = args.record("userRepresentation")?;
        services.users.update(&realm, &user_id, user).await?;
        confirm(format!("Successfully updated user: {}", user_id))
    })
}

fn get_user_by_id(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let user_id = args.string("userId")?;
        let user = services.users.get_by_id(&realm, &user_id).await?;
        HandlerOutput::optional(user.as_ref())
    })
}

fn get_user_groups(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let user_id = args.string("userId")?;
        let groups = services.users.list_groups(&realm, &user_id).await?;
        HandlerOutput::list(&groups)
    })
}

fn add_user_to_group(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let user_id = args.string("userId")?;
        let group_id = args.string("groupId")?;
        services.users.join_group(&realm, &user_id, &group_id).await?;
        confirm(format!(
            "Successfully added user to group: {} -> {}",
            user_id, group_id
        ))
    })
}

fn remove_user_from_group(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let user_id = args.string("userId")?;
        let group_id = args.string("groupId")?;
        services.users.leave_group(&realm, &user_id, &group_id).await?;
        confirm(format!(
            "Successfully removed user from group: {} -> {}",
            user_id, group_id
        ))
    })
}

fn get_user_roles(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let user_id = args.string("userId")?;
        let roles = services.users.list_roles(&realm, &user_id).await?;
        HandlerOutput::list(&roles)
    })
}

fn add_role_to_user(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let user_id = args.string("userId")?;
        let role_name = args.string("roleName")?;
        services.users.add_role(&realm, &user_id, &role_name).await?;
        confirm(format!(
            "Successfully added role to user: {} -> {}",
            user_id, role_name
        ))
    })
}

fn remove_role_from_user(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let user_id = args.string("userId")?;
        let role_name = args.string("roleName")?;
        services
            .users
            .remove_role(&realm, &user_id, &role_name)
            .await?;
        confirm(format!(
            "Successfully removed role from user: {} -> {}",
            user_id, role_name
        ))
    })
}

fn reset_password(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let user_id = args.string("userId")?;
        let password = args.string("newPassword")?;
        let temporary = args.bool("temporary")?;
        services
            .users
            .reset_password(&realm, &user_id, &password, temporary)
            .await?;
        confirm(format!("Successfully reset password for user: {}", user_id))
    })
}

fn send_verification_email(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let user_id = args.string("userId")?;
        services
            .users
            .send_verification_email(&realm, &user_id)
            .await?;
        confirm(format!("Successfully sent verification email to user: {}", user_id))
    })
}

fn count_users(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let count = services.users.count(&realm).await?;
        scalar(count)
    })
}
