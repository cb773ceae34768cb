//! Client operation handlers.
//!
//! `GET_CLIENT` and `CREATE_CLIENT` take the public client id. Every other
//! client operation addresses the client by its internal id, still passed as
//! `clientId`.

use super::{REALM, confirm, scalar};
use crate::operation_handler::{
    catalog::{CatalogBuilder, HandlerFuture},
    encoder::HandlerOutput,
    field::FieldSpec,
    params::BoundArgs,
    types::Operation,
};
use crate::services::Collaborators;

const CLIENT_ID: FieldSpec = FieldSpec::required_string("clientId");
const ROLE_NAME: FieldSpec = FieldSpec::required_string("roleName");

const REALM_ONLY: &[FieldSpec] = &[REALM];
const BY_CLIENT: &[FieldSpec] = &[REALM, CLIENT_ID];
const CREATE: &[FieldSpec] = &[REALM, CLIENT_ID, FieldSpec::required_string("redirectUris")];
const CREATE_ROLE: &[FieldSpec] = &[
    REALM,
    CLIENT_ID,
    ROLE_NAME,
    FieldSpec::optional_string("description", ""),
];
const BY_ROLE: &[FieldSpec] = &[REALM, CLIENT_ID, ROLE_NAME];

pub fn register(builder: &mut CatalogBuilder) {
    builder
        .register(Operation::GetClients, REALM_ONLY, get_clients)
        .register(Operation::GetClient, BY_CLIENT, get_client)
        .register(Operation::CreateClient, CREATE, create_client)
        .register(Operation::DeleteClient, BY_CLIENT, delete_client)
        .register(Operation::GenerateClientSecret, BY_CLIENT, generate_client_secret)
        .register(Operation::GetClientRoles, BY_CLIENT, get_client_roles)
        .register(Operation::CreateClientRole, CREATE_ROLE, create_client_role)
        .register(Operation::DeleteClientRole, BY_ROLE, delete_client_role);
}

fn get_clients(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let clients = services.clients.list(&realm).await?;
        HandlerOutput::list(&clients)
    })
}

fn get_client(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let client_id = args.string("clientId")?;
        let client = services.clients.get_by_client_id(&realm, &client_id).await?;
        HandlerOutput::optional(client.as_ref())
    })
}

fn create_client(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let client_id = args.string("clientId")?;
        let redirect_uris = args.string_list("redirectUris")?;
        services
            .clients
            .create(&realm, &client_id, redirect_uris)
            .await?;
        confirm(format!("Successfully created client: {}", client_id))
    })
}

fn delete_client(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let id = args.string("clientId")?;
        services.clients.delete(&realm, &id).await?;
        confirm(format!("Successfully deleted client: {}", id))
    })
}

fn generate_client_secret(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let id = args.string("clientId")?;
        let secret = services.clients.generate_secret(&realm, &id).await?;
        scalar(secret)
    })
}

fn get_client_roles(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let id = args.string("clientId")?;
        let roles = services.clients.list_roles(&realm, &id).await?;
        HandlerOutput::list(&roles)
    })
}

fn create_client_role(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let id = args.string("clientId")?;
        let role_name = args.string("roleName")?;
        let description = args.string("description")?;
        services
            .clients
            .create_role(&realm, &id, &role_name, &description)
            .await?;
        confirm(format!("Successfully created client role: {}", role_name))
    })
}

fn delete_client_role(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let id = args.string("clientId")?;
        let role_name = args.string("roleName")?;
        services.clients.delete_role(&realm, &id, &role_name).await?;
        confirm(format!("Successfully deleted client role: {}", role_name))
    })
}
