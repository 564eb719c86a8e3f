//! Target-user resolution: event shapes and the most-recent-user fallback.

use chrono::{TimeZone, Utc};
use enrollment_service::models::CreateUserEvent;
use enrollment_service::services::{resolve_target_user, ServiceError};
use iam_core::MemoryIdentityStore;
use serde_json::json;

fn event(value: serde_json::Value) -> CreateUserEvent {
    serde_json::from_value(value).expect("event payloads always deserialize")
}

// ============================================================================
// Names carried by the event
// ============================================================================

#[tokio::test]
async fn detail_envelope_name_is_used_without_queries() {
    let store = MemoryIdentityStore::new();
    let event = event(json!({
        "detail": { "requestParameters": { "userName": "alice" } }
    }));

    let resolved = resolve_target_user(&event, &store).await.unwrap();

    assert_eq!(resolved, "alice");
    assert_eq!(store.list_users_calls(), 0);
}

#[tokio::test]
async fn flat_name_is_used_without_queries() {
    let store = MemoryIdentityStore::new();
    let event = event(json!({ "userName": "bob" }));

    let resolved = resolve_target_user(&event, &store).await.unwrap();

    assert_eq!(resolved, "bob");
    assert_eq!(store.list_users_calls(), 0);
}

#[tokio::test]
async fn empty_name_falls_back_to_listing() {
    let store = MemoryIdentityStore::new();
    store.insert_user("only-user", Utc.timestamp_opt(1_700_000_000, 0).unwrap());
    let event = event(json!({ "userName": "" }));

    let resolved = resolve_target_user(&event, &store).await.unwrap();

    assert_eq!(resolved, "only-user");
    assert_eq!(store.list_users_calls(), 1);
}

// ============================================================================
// Most-recent-user fallback
// ============================================================================

#[tokio::test]
async fn fallback_selects_latest_creation_timestamp() {
    let store = MemoryIdentityStore::new();
    store.insert_user("oldest", Utc.timestamp_opt(1_700_000_000, 0).unwrap());
    store.insert_user("newest", Utc.timestamp_opt(1_700_000_200, 0).unwrap());
    store.insert_user("middle", Utc.timestamp_opt(1_700_000_100, 0).unwrap());
    let event = event(json!({ "source": "scheduler" }));

    let resolved = resolve_target_user(&event, &store).await.unwrap();

    assert_eq!(resolved, "newest");
    assert_eq!(store.list_users_calls(), 1);
}

#[tokio::test]
async fn empty_account_is_a_fatal_resolution_failure() {
    let store = MemoryIdentityStore::new();
    let event = event(json!({ "source": "scheduler" }));

    let err = resolve_target_user(&event, &store).await.unwrap_err();

    assert!(matches!(err, ServiceError::NoUsersFound));
    assert_eq!(err.to_string(), "No IAM users found in account.");
}
