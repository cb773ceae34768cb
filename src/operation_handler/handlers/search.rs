//! Community forum search.

use crate::operation_handler::{
    catalog::{CatalogBuilder, HandlerFuture},
    encoder::HandlerOutput,
    field::FieldSpec,
    params::BoundArgs,
    types::Operation,
};
use crate::services::Collaborators;

const SEARCH: &[FieldSpec] = &[FieldSpec::required_string("query")];

pub fn register(builder: &mut CatalogBuilder) {
    builder.register(Operation::SearchDiscourse, SEARCH, search_discourse);
}

fn search_discourse(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let query = args.string("query")?;
        let result = services.search.search(&query).await?;
        HandlerOutput::record(&result)
    })
}
