//! End-to-end dispatch scenarios against a recording collaborator.
//!
//! Each test drives the public dispatcher surface and then inspects which
//! collaborator calls were made, so routing, validation and error mapping are
//! checked together.

mod common;

use common::{Call, Mode, recording_dispatcher, recording_dispatcher_with_users, user};
use keycloak_operations::{Envelope, FailureKind, Operation, ParamBag};
use serde_json::{Value, json};

#[tokio::test]
async fn test_get_users_returns_collaborator_records_in_order() {
    let (dispatcher, services) =
        recording_dispatcher_with_users(Mode::Present, vec![user("jdoe"), user("asmith")]);

    let payload = dispatcher
        .execute("GET_USERS", json!({"realm": "demo"}))
        .await
        .unwrap();

    let users: Vec<Value> = serde_json::from_str(&payload).unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["username"], "jdoe");
    assert_eq!(users[1]["username"], "asmith");
    assert_eq!(
        services.calls(),
        vec![Call {
            method: "users.list",
            args: vec!["demo".to_string()],
        }]
    );
}

#[tokio::test]
async fn test_create_user_without_password_is_rejected_before_any_call() {
    let (dispatcher, services) = recording_dispatcher(Mode::Present);

    let failure = dispatcher
        .execute(
            "CREATE_USER",
            json!({
                "realm": "demo",
                "username": "jdoe",
                "firstName": "J",
                "lastName": "Doe",
                "email": "j@x.com"
            }),
        )
        .await
        .unwrap_err();

    assert_eq!(failure.kind, FailureKind::ValidationError);
    assert_eq!(failure.field.as_deref(), Some("password"));
    assert_eq!(failure.operation_name, "CREATE_USER");
    assert_eq!(services.call_count(), 0);
}

#[tokio::test]
async fn test_deleting_missing_user_is_not_found() {
    let (dispatcher, services) = recording_dispatcher(Mode::Missing);

    let failure = dispatcher
        .execute("DELETE_USER", json!({"realm": "demo", "username": "ghost"}))
        .await
        .unwrap_err();

    assert_eq!(failure.kind, FailureKind::NotFound);
    assert_eq!(failure.message, "User not found: ghost");
    assert_eq!(services.call_count(), 1);
}

#[tokio::test]
async fn test_reset_password_defaults_to_permanent() {
    let (dispatcher, services) = recording_dispatcher(Mode::Present);

    let omitted = dispatcher
        .execute(
            "RESET_PASSWORD",
            json!({"realm": "demo", "userId": "u1", "newPassword": "p"}),
        )
        .await
        .unwrap();
    let explicit = dispatcher
        .execute(
            "RESET_PASSWORD",
            json!({"realm": "demo", "userId": "u1", "newPassword": "p", "temporary": false}),
        )
        .await
        .unwrap();

    assert_eq!(omitted, explicit);
    assert_eq!(omitted, "Successfully reset password for user: u1");
    let calls = services.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], calls[1]);
    assert_eq!(calls[0].args, vec!["demo", "u1", "p", "false"]);
}

#[tokio::test]
async fn test_explicit_null_optional_takes_default() {
    let (dispatcher, services) = recording_dispatcher(Mode::Present);

    dispatcher
        .execute(
            "RESET_PASSWORD",
            json!({"realm": "demo", "userId": "u1", "newPassword": "p", "temporary": null}),
        )
        .await
        .unwrap();

    assert_eq!(services.calls()[0].args[3], "false");
}

#[tokio::test]
async fn test_mistyped_optional_field_is_validation_error() {
    let (dispatcher, services) = recording_dispatcher(Mode::Present);

    let failure = dispatcher
        .execute(
            "RESET_PASSWORD",
            json!({"realm": "demo", "userId": "u1", "newPassword": "p", "temporary": "yes"}),
        )
        .await
        .unwrap_err();

    assert_eq!(failure.kind, FailureKind::ValidationError);
    assert_eq!(failure.field.as_deref(), Some("temporary"));
    assert_eq!(services.call_count(), 0);
}

#[tokio::test]
async fn test_unknown_operation_makes_no_calls() {
    let (dispatcher, services) = recording_dispatcher(Mode::Present);

    let envelope = dispatcher
        .dispatch_named("DROP_ALL_REALMS", ParamBag::new().with("realm", "demo"))
        .await;

    let failure = envelope.failure_ref().unwrap();
    assert_eq!(failure.kind, FailureKind::UnknownOperation);
    assert_eq!(failure.message, "unknown operation: DROP_ALL_REALMS");
    assert_eq!(services.call_count(), 0);
}

#[tokio::test]
async fn test_collaborator_failure_is_upstream_error() {
    let (dispatcher, services) = recording_dispatcher(Mode::Failing);

    let failure = dispatcher
        .execute("CREATE_GROUP", json!({"realm": "demo", "groupName": "ops"}))
        .await
        .unwrap_err();

    assert_eq!(failure.kind, FailureKind::UpstreamError);
    assert!(failure.message.starts_with("Failed to execute operation CREATE_GROUP"));
    assert!(failure.message.contains("backend exploded"));
    assert_eq!(services.call_count(), 1);
}

#[tokio::test]
async fn test_absent_lookup_encodes_null() {
    let (dispatcher, _) = recording_dispatcher(Mode::Missing);

    for (operation, params) in [
        (Operation::GetUserById, json!({"realm": "demo", "userId": "u1"})),
        (Operation::GetRealm, json!({"realmName": "nowhere"})),
        (Operation::GetClient, json!({"realm": "demo", "clientId": "app"})),
        (Operation::GetGroup, json!({"realm": "demo", "groupId": "g1"})),
    ] {
        let envelope = dispatcher
            .dispatch(operation, ParamBag::from_value(params).unwrap())
            .await;
        assert_eq!(envelope, Envelope::Success("null".to_string()), "{}", operation);
    }
}

#[tokio::test]
async fn test_scalar_results_are_plain_text() {
    let (dispatcher, _) =
        recording_dispatcher_with_users(Mode::Present, vec![user("a"), user("b")]);

    let secret = dispatcher
        .execute(
            "GENERATE_CLIENT_SECRET",
            json!({"realm": "demo", "clientId": "c1"}),
        )
        .await
        .unwrap();
    let count = dispatcher
        .execute("COUNT_USERS", json!({"realm": "demo"}))
        .await
        .unwrap();

    assert_eq!(secret, "s3cr3t");
    assert_eq!(count, "2");
}

#[tokio::test]
async fn test_list_order_is_preserved() {
    let (dispatcher, _) = recording_dispatcher(Mode::Present);

    let payload = dispatcher
        .execute("GET_REALM_ROLES", json!({"realm": "demo"}))
        .await
        .unwrap();

    assert_eq!(payload, r#"[{"name":"zeta"},{"name":"alpha"}]"#);
}

#[tokio::test]
async fn test_create_user_sends_permanent_password_credential() {
    let (dispatcher, services) = recording_dispatcher(Mode::Present);

    let payload = dispatcher
        .execute(
            "CREATE_USER",
            json!({
                "realm": "demo",
                "username": "jdoe",
                "firstName": "J",
                "lastName": "Doe",
                "email": "j@x.com",
                "password": "pw"
            }),
        )
        .await
        .unwrap();

    assert_eq!(payload, "Successfully created user: jdoe");
    assert_eq!(services.calls()[0].args, vec!["demo", "jdoe", "pw:false"]);
}

#[tokio::test]
async fn test_create_client_splits_redirect_uris() {
    let (dispatcher, services) = recording_dispatcher(Mode::Present);

    dispatcher
        .execute(
            "CREATE_CLIENT",
            json!({
                "realm": "demo",
                "clientId": "portal",
                "redirectUris": "https://a.example/*, https://b.example/*"
            }),
        )
        .await
        .unwrap();

    assert_eq!(
        services.calls()[0].args,
        vec!["demo", "portal", "https://a.example/*|https://b.example/*"]
    );
}

#[tokio::test]
async fn test_create_authentication_flow_defaults() {
    let (dispatcher, services) = recording_dispatcher(Mode::Present);

    let payload = dispatcher
        .execute(
            "CREATE_AUTHENTICATION_FLOW",
            json!({"realm": "demo", "alias": "custom-browser"}),
        )
        .await
        .unwrap();

    assert_eq!(
        payload,
        "Successfully created authentication flow: custom-browser"
    );
    assert_eq!(
        services.calls(),
        vec![Call {
            method: "flows.create",
            args: vec![
                "demo".to_string(),
                "custom-browser".to_string(),
                "basic-flow".to_string(),
                "true".to_string(),
            ],
        }]
    );
}

#[tokio::test]
async fn test_update_group_binds_typed_record() {
    let (dispatcher, services) = recording_dispatcher(Mode::Present);

    dispatcher
        .execute(
            "UPDATE_GROUP",
            json!({
                "realm": "demo",
                "groupId": "g1",
                "groupRepresentation": {"name": "platform", "attributes": {"team": ["core"]}}
            }),
        )
        .await
        .unwrap();

    assert_eq!(services.calls()[0].args, vec!["demo", "g1", "platform"]);
}

#[tokio::test]
async fn test_malformed_record_is_validation_error() {
    let (dispatcher, services) = recording_dispatcher(Mode::Present);

    let failure = dispatcher
        .execute(
            "UPDATE_GROUP",
            json!({"realm": "demo", "groupId": "g1", "groupRepresentation": {"name": 7}}),
        )
        .await
        .unwrap_err();

    assert_eq!(failure.kind, FailureKind::ValidationError);
    assert_eq!(failure.field.as_deref(), Some("groupRepresentation"));
    assert_eq!(services.call_count(), 0);
}

#[tokio::test]
async fn test_parameterless_operation_accepts_null_params() {
    let (dispatcher, services) = recording_dispatcher(Mode::Present);

    let payload = dispatcher.execute("GET_REALMS", Value::Null).await.unwrap();

    assert_eq!(payload, "[]");
    assert_eq!(services.calls()[0].method, "realms.list");
}
