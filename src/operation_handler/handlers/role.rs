//! Realm role operation handlers.

use super::{REALM, confirm};
use crate::operation_handler::{
    catalog::{CatalogBuilder, HandlerFuture},
    encoder::HandlerOutput,
    field::FieldSpec,
    params::BoundArgs,
    types::Operation,
};
use crate::services::Collaborators;

const ROLE_NAME: FieldSpec = FieldSpec::required_string("roleName");

const REALM_ONLY: &[FieldSpec] = &[REALM];
const BY_NAME: &[FieldSpec] = &[REALM, ROLE_NAME];
const CREATE: &[FieldSpec] = &[REALM, ROLE_NAME, FieldSpec::optional_string("description", "")];

pub fn register(builder: &mut CatalogBuilder) {
    builder
        .register(Operation::GetRealmRoles, REALM_ONLY, get_realm_roles)
        .register(Operation::GetRealmRole, BY_NAME, get_realm_role)
        .register(Operation::CreateRealmRole, CREATE, create_realm_role)
        .register(Operation::DeleteRealmRole, BY_NAME, delete_realm_role);
}

fn get_realm_roles(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let roles = services.roles.list_realm_roles(&realm).await?;
        HandlerOutput::list(&roles)
    })
}

fn get_realm_role(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let name = args.string("roleName")?;
        let role = services.roles.get_realm_role(&realm, &name).await?;
        HandlerOutput::optional(role.as_ref())
    })
}

fn create_realm_role(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let name = args.string("roleName")?;
        let description = args.string("description")?;
        services
            .roles
            .create_realm_role(&realm, &name, &description)
            .await?;
        confirm(format!("Successfully created role: {}", name))
    })
}

fn delete_realm_role(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let name = args.string("roleName")?;
        services.roles.delete_realm_role(&realm, &name).await?;
        confirm(format!("Successfully deleted role: {}", name))
    })
}
