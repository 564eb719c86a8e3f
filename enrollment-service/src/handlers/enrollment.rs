//! Invocation orchestrator: one event in, one structured report out.

use axum::{extract::State, Json};

use crate::models::{CreateUserEvent, EnrollmentReport};
use crate::services;
use crate::startup::AppState;

/// `POST /v1/enrollments`, the invocation boundary.
pub async fn create_user_event(
    State(state): State<AppState>,
    Json(event): Json<CreateUserEvent>,
) -> Json<EnrollmentReport> {
    Json(handle_create_user_event(&state, event).await)
}

/// Resolve the target user, converge group membership, then provision the
/// initial console password.
///
/// Infallible outward: every fault is translated into a failed report. The
/// outward status reflects the last stage only: a provisioning fault after
/// a successful group add reports failure while the membership stands; side
/// effects are not rolled back.
pub async fn handle_create_user_event(state: &AppState, event: CreateUserEvent) -> EnrollmentReport {
    tracing::debug!(event = ?event, "Event received");

    let store = state.store.as_ref();
    let policy = &state.config.enrollment;

    let user_name = match services::resolve_target_user(&event, store).await {
        Ok(name) => name,
        Err(err) => {
            tracing::error!(error = %err, "Enrollment aborted, no target user");
            return EnrollmentReport::failed(err.to_string());
        }
    };

    let outcome = services::enroll_in_group(
        store,
        &user_name,
        &policy.group_name,
        &policy.retry_budget(),
    )
    .await;

    if outcome.is_success() {
        if let Err(err) =
            services::provision_login(store, &user_name, &policy.initial_password).await
        {
            tracing::error!(
                user = %user_name,
                error = %err,
                "Credential provisioning failed after enrollment"
            );
            return EnrollmentReport::failed(err.to_string());
        }
    }

    outcome.into()
}
