//! Authentication flow operation handlers.
//!
//! `CREATE_AUTHENTICATION_FLOW` builds the new flow from its own fields, so
//! creation is a single collaborator call. Copying an existing flow is left to
//! the caller: read it with `GET_AUTHENTICATION_FLOW` and pass its fields back.

use super::{REALM, confirm};
use crate::operation_handler::{
    catalog::{CatalogBuilder, HandlerFuture},
    encoder::HandlerOutput,
    field::FieldSpec,
    params::BoundArgs,
    types::Operation,
};
use crate::services::{
    AuthenticationExecutionInfoRepresentation, AuthenticationFlowRepresentation, Collaborators,
};

const FLOW_ID: FieldSpec = FieldSpec::required_string("flowId");
const FLOW_ALIAS: FieldSpec = FieldSpec::required_string("flowAlias");

const REALM_ONLY: &[FieldSpec] = &[REALM];
const BY_ID: &[FieldSpec] = &[REALM, FLOW_ID];
const BY_ALIAS: &[FieldSpec] = &[REALM, FLOW_ALIAS];
const CREATE: &[FieldSpec] = &[
    REALM,
    FieldSpec::required_string("alias")
        .describe("Alias of the new flow (formerly passed as authFlowNameId)"),
    FieldSpec::optional_string("description", ""),
    FieldSpec::optional_string("providerId", "basic-flow"),
    FieldSpec::optional_bool("topLevel", true),
];
const UPDATE_EXECUTION: &[FieldSpec] = &[
    REALM,
    FLOW_ALIAS,
    FieldSpec::required_object("executionRepresentation"),
];

pub fn register(builder: &mut CatalogBuilder) {
    builder
        .register(Operation::GetAuthenticationFlows, REALM_ONLY, get_flows)
        .register(Operation::GetAuthenticationFlow, BY_ID, get_flow)
        .register(Operation::CreateAuthenticationFlow, CREATE, create_flow)
        .register(Operation::DeleteAuthenticationFlow, BY_ID, delete_flow)
        .register(Operation::GetFlowExecutions, BY_ALIAS, get_flow_executions)
        .register(
            Operation::UpdateFlowExecution,
            UPDATE_EXECUTION,
            update_flow_execution,
        );
}

fn get_flows(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let flows = services.flows.list(&realm).await?;
        HandlerOutput::list(&flows)
    })
}

fn get_flow(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let flow_id = args.string("flowId")?;
        let flow = services.flows.get(&realm, &flow_id).await?;
        HandlerOutput::optional(flow.as_ref())
    })
}

fn create_flow(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let alias = args.string("alias")?;
        let flow = AuthenticationFlowRepresentation {
            id: None,
            alias: alias.clone(),
            description: Some(args.string("description")?),
            provider_id: Some(args.string("providerId")?),
            top_level: Some(args.bool("topLevel")?),
            built_in: Some(false),
        };
        services.flows.create(&realm, flow).await?;
        confirm(format!("Successfully created authentication flow: {}", alias))
    })
}

fn delete_flow(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let flow_id = args.string("flowId")?;
        services.flows.delete(&realm, &flow_id).await?;
        confirm(format!("Successfully deleted authentication flow: {}", flow_id))
    })
}

fn get_flow_executions(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let alias = args.string("flowAlias")?;
        let executions = services.flows.list_executions(&realm, &alias).await?;
        HandlerOutput::list(&executions)
    })
}

fn update_flow_execution(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let alias = args.string("flowAlias")?;
        let execution: AuthenticationExecutionInfoRepresentation =
            args.record("executionRepresentation")?;
        let label = execution
            .display_name
            .clone()
            .or_else(|| execution.id.clone())
            .unwrap_or_default();
        services
            .flows
            .update_execution(&realm, &alias, execution)
            .await?;
        confirm(format!("Successfully updated flow execution: {}", label))
    })
}
