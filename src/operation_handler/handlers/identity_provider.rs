//! Identity provider operation handlers. All read-only.

use super::REALM;
use crate::operation_handler::{
    catalog::{CatalogBuilder, HandlerFuture},
    encoder::HandlerOutput,
    field::FieldSpec,
    params::BoundArgs,
    types::Operation,
};
use crate::services::Collaborators;

const REALM_ONLY: &[FieldSpec] = &[REALM];
const BY_ALIAS: &[FieldSpec] = &[REALM, FieldSpec::required_string("alias")];

pub fn register(builder: &mut CatalogBuilder) {
    builder
        .register(Operation::GetIdentityProviders, REALM_ONLY, get_identity_providers)
        .register(Operation::GetIdentityProvider, BY_ALIAS, get_identity_provider)
        .register(
            Operation::GetIdentityProviderMappers,
            BY_ALIAS,
            get_identity_provider_mappers,
        );
}

fn get_identity_providers(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let providers = services.identity_providers.list(&realm).await?;
        HandlerOutput::list(&providers)
    })
}

fn get_identity_provider(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let alias = args.string("alias")?;
        let provider = services.identity_providers.get(&realm, &alias).await?;
        HandlerOutput::optional(provider.as_ref())
    })
}

fn get_identity_provider_mappers(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let alias = args.string("alias")?;
        let mappers = services
            .identity_providers
            .list_mappers(&realm, &alias)
            .await?;
        HandlerOutput::list(&mappers)
    })
}
