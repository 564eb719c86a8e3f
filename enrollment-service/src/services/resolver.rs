//! Target-user resolution.

use iam_core::IdentityStore;

use crate::models::CreateUserEvent;
use crate::services::ServiceError;

/// Determine which user the invocation targets.
///
/// Prefers the name carried by the event; an event without one (or with an
/// empty one) falls back to the most recently created user in the account.
pub async fn resolve_target_user(
    event: &CreateUserEvent,
    store: &dyn IdentityStore,
) -> Result<String, ServiceError> {
    if let Some(name) = event.user_name().filter(|name| !name.is_empty()) {
        return Ok(name.to_string());
    }

    tracing::info!("No userName in event, fetching most recently created user");
    let user_name = most_recent_user(store).await?;
    tracing::info!(user = %user_name, "Using most recent user");
    Ok(user_name)
}

/// The user with the latest creation timestamp. Tie-break on equal
/// timestamps is unspecified.
async fn most_recent_user(store: &dyn IdentityStore) -> Result<String, ServiceError> {
    let users = store.list_users().await.map_err(ServiceError::Resolution)?;

    users
        .into_iter()
        .max_by_key(|user| user.create_date)
        .map(|user| user.user_name)
        .ok_or(ServiceError::NoUsersFound)
}
