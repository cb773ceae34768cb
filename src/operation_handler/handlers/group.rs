//! Group operation handlers.

use super::{REALM, confirm};
use crate::operation_handler::{
    catalog::{CatalogBuilder, HandlerFuture},
    encoder::HandlerOutput,
    field::FieldSpec,
    params::BoundArgs,
    types::Operation,
};
use crate::services::{Collaborators, GroupRepresentation};

const GROUP_ID: FieldSpec = FieldSpec::required_string("groupId");

const REALM_ONLY: &[FieldSpec] = &[REALM];
const BY_ID: &[FieldSpec] = &[REALM, GROUP_ID];
const CREATE: &[FieldSpec] = &[REALM, FieldSpec::required_string("groupName")];
const UPDATE: &[FieldSpec] = &[
    REALM,
    GROUP_ID,
    FieldSpec::required_object("groupRepresentation"),
];
const CREATE_SUBGROUP: &[FieldSpec] = &[
    REALM,
    FieldSpec::required_string("parentGroupId"),
    FieldSpec::required_string("subGroupName"),
];

pub fn register(builder: &mut CatalogBuilder) {
    builder
        .register(Operation::GetGroups, REALM_ONLY, get_groups)
        .register(Operation::GetGroup, BY_ID, get_group)
        .register(Operation::GetGroupMembers, BY_ID, get_group_members)
        .register(Operation::CreateGroup, CREATE, create_group)
        .register(Operation::UpdateGroup, UPDATE, update_group)
        .register(Operation::DeleteGroup, BY_ID, delete_group)
        .register(Operation::CreateSubgroup, CREATE_SUBGROUP, create_subgroup);
}

fn get_groups(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let groups = services.groups.list(&realm).await?;
        HandlerOutput::list(&groups)
    })
}

fn get_group(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let group_id = args.string("groupId")?;
        let group = services.groups.get(&realm, &group_id).await?;
        HandlerOutput::optional(group.as_ref())
    })
}

fn get_group_members(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let group_id = args.string("groupId")?;
        let members = services.groups.list_members(&realm, &group_id).await?;
        HandlerOutput::list(&members)
    })
}

fn create_group(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let name = args.string("groupName")?;
        services.groups.create(&realm, &name).await?;
        confirm(format!("Successfully created group: {}", name))
    })
}

fn update_group(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let group_id = args.string("groupId")?;
        let group: GroupRepresentation = args.record("groupRepresentation")?;
        services.groups.update(&realm, &group_id, group).await?;
        confirm(format!("Successfully updated group: {}", group_id))
    })
}

fn delete_group(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let group_id = args.string("groupId")?;
        services.groups.delete(&realm, &group_id).await?;
        confirm(format!("Successfully deleted group: {}", group_id))
    })
}

fn create_subgroup(services: &Collaborators, args: BoundArgs) -> HandlerFuture<'_> {
    Box::pin(async move {
        let realm = args.string("realm")?;
        let parent_id = args.string("parentGroupId")?;
        let name = args.string("subGroupName")?;
        services
            .groups
            .create_subgroup(&realm, &parent_id, &name)
            .await?;
        confirm(format!("Successfully created subgroup: {} -> {}", parent_id, name))
    })
}
