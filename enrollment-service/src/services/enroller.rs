//! Convergent group-membership enrollment.
//!
//! Identity services are read-after-write inconsistent right after user
//! creation, so "user not found" is the expected state on early attempts,
//! not an exceptional one. The loop probes for existence and adds the user
//! to the group, retrying with a constant delay until the budget runs out.

use iam_core::{IamError, IdentityStore, RetryBudget};
use tokio::time::sleep;

use crate::models::EnrollmentOutcome;

/// Reason reported when the budget is exhausted, whatever the final fault.
pub const EXHAUSTED_REASON: &str = "User not found after retries";

/// Converge `user_name` into `group_name` within the retry budget.
///
/// Never fails outward: every fault is either retried or absorbed into the
/// returned outcome. The first successful membership add wins and ends the
/// loop. Faults other than the not-found gap are retried too, at error
/// severity.
pub async fn enroll_in_group(
    store: &dyn IdentityStore,
    user_name: &str,
    group_name: &str,
    budget: &RetryBudget,
) -> EnrollmentOutcome {
    for attempt in 1..=budget.max_attempts() {
        match try_enroll(store, user_name, group_name).await {
            Ok(()) => {
                tracing::info!(
                    user = %user_name,
                    group = %group_name,
                    attempt,
                    "User added to group"
                );
                return EnrollmentOutcome::succeeded(user_name);
            }
            Err(err) if err.is_not_found() => {
                tracing::warn!(
                    user = %user_name,
                    attempt,
                    delay_ms = budget.delay().as_millis() as u64,
                    "User not found, retrying after delay"
                );
            }
            Err(err) => {
                tracing::error!(
                    user = %user_name,
                    attempt,
                    error = %err,
                    "Unexpected error during enrollment, retrying after delay"
                );
            }
        }

        sleep(budget.delay()).await;
    }

    EnrollmentOutcome::failed(user_name, EXHAUSTED_REASON)
}

/// One attempt: existence probe, then membership add.
async fn try_enroll(
    store: &dyn IdentityStore,
    user_name: &str,
    group_name: &str,
) -> Result<(), IamError> {
    store.get_user(user_name).await?;
    store.add_user_to_group(user_name, group_name).await
}
