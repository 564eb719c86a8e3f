//! Retry-loop behavior of the membership enroller.

use std::time::{Duration, Instant};

use chrono::{TimeZone, Utc};
use enrollment_service::services::enroll_in_group;
use iam_core::{MemoryIdentityStore, RetryBudget};

const GROUP: &str = "MFARequired";

// ============================================================================
// Bounded retry termination
// ============================================================================

#[tokio::test]
async fn never_visible_user_exhausts_budget() {
    let store = MemoryIdentityStore::new();
    let budget = RetryBudget::new(3, Duration::from_millis(50));

    let started = Instant::now();
    let outcome = enroll_in_group(&store, "ghost", GROUP, &budget).await;
    let elapsed = started.elapsed();

    assert!(!outcome.is_success());
    assert_eq!(outcome.user, "ghost");
    assert_eq!(outcome.reason.as_deref(), Some("User not found after retries"));

    // Exactly one existence probe per attempt, no membership calls.
    assert_eq!(store.get_user_calls(), 3);
    assert_eq!(store.group_add_calls(), 0);

    // Total wait is at least (attempts - 1) * delay.
    assert!(elapsed >= Duration::from_millis(100), "elapsed was {:?}", elapsed);
}

#[tokio::test]
async fn unexpected_faults_also_consume_the_budget() {
    let store = MemoryIdentityStore::new();
    store.fail_get_user_with("access denied");
    let budget = RetryBudget::new(3, Duration::from_millis(10));

    let outcome = enroll_in_group(&store, "alice", GROUP, &budget).await;

    // Non-not-found faults retry too; exhaustion reports the same reason.
    assert!(!outcome.is_success());
    assert_eq!(outcome.reason.as_deref(), Some("User not found after retries"));
    assert_eq!(store.get_user_calls(), 3);
}

// ============================================================================
// First success wins
// ============================================================================

#[tokio::test]
async fn immediately_visible_user_enrolls_on_first_attempt() {
    let store = MemoryIdentityStore::new();
    store.insert_user("alice", Utc.timestamp_opt(1_700_000_000, 0).unwrap());
    let budget = RetryBudget::new(5, Duration::from_millis(10));

    let outcome = enroll_in_group(&store, "alice", GROUP, &budget).await;

    assert!(outcome.is_success());
    assert_eq!(outcome.reason, None);
    assert_eq!(store.get_user_calls(), 1);
    assert_eq!(store.group_add_calls(), 1);
    assert_eq!(store.user_groups("alice"), vec![GROUP]);
}

#[tokio::test]
async fn user_visible_on_attempt_k_takes_exactly_k_probes() {
    let store = MemoryIdentityStore::new();
    // First two probes report not-found; visible on the third.
    store.insert_user_hidden_for("carol", Utc.timestamp_opt(1_700_000_000, 0).unwrap(), 2);
    let budget = RetryBudget::new(5, Duration::from_millis(10));

    let outcome = enroll_in_group(&store, "carol", GROUP, &budget).await;

    assert!(outcome.is_success());
    assert_eq!(store.get_user_calls(), 3);
    assert_eq!(store.group_add_calls(), 1);
    assert_eq!(store.user_groups("carol"), vec![GROUP]);
}

#[tokio::test]
async fn visibility_on_final_attempt_still_succeeds() {
    let store = MemoryIdentityStore::new();
    store.insert_user_hidden_for("dave", Utc.timestamp_opt(1_700_000_000, 0).unwrap(), 2);
    let budget = RetryBudget::new(3, Duration::from_millis(10));

    let outcome = enroll_in_group(&store, "dave", GROUP, &budget).await;

    assert!(outcome.is_success());
    assert_eq!(store.get_user_calls(), 3);
}
