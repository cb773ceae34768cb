//! Realm operation handlers.

use super::confirm;
use crate::operation_handler::{
    catalog::{CatalogBuilder, HandlerFuture},
    encoder::HandlerOutput,
    field::FieldSpec,
    params::BoundArgs,
    types::Operation,
};
use crate::services::Collaborators;

const REALM_NAME: FieldSpec = FieldSpec::required_string("realmName");

const NONE: &[FieldSpec] = &[];
const BY_NAME: &[FieldSpec] = &[REALM_NAME];
const CREATE: &[FieldSpec] = &[
    REALM_NAME,
    FieldSpec::required_string("displayName"),
    FieldSpec::optional_bool("enabled", false),
];

pub fn register(builder: &mut CatalogBuilder) {
    builder
        .register(Operation::GetRealms, NONE, get_realms)
        .register(Operation::GetRealm, BY_NAME, get_realm)
        .register(Operation::CreateRealm, CREATE, create_realm)
        .register(Operation::DeleteRealm, BY_NAME, delete_realm);
}

fn get_realms(services: &Collaborators, _args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realms = services.realms.list().await?;
        HandlerOutput::list(&realms)
    })
}

fn get_realm(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let name = args.string("realmName")?;
        let realm = services.realms.get(&name).await?;
        HandlerOutput::optional(realm.as_ref())
    })
}

fn create_realm(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let name = args.string("realmName")?;
        let display_name = args.string("displayName")?;
        let enabled = args.bool("enabled")?;
        services.realms.create(&name, &display_name, enabled).await?;
        confirm(format!("Successfully created realm: {}", name))
    })
}

fn delete_realm(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let name = args.string("realmName")?;
        services.realms.delete(&name).await?;
        confirm(format!("Successfully deleted realm: {}", name))
    })
}
