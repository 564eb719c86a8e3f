//! Console credential provisioning.

use iam_core::IdentityStore;
use secrecy::SecretString;

use crate::services::ServiceError;

/// Which write the upsert ended up performing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialAction {
    Updated,
    Created,
}

/// Set the user's initial console password, update-if-exists else create.
///
/// The reset-required flag is always set: the provisioned password is
/// single-use and must be rotated on first login. Nothing here is retried;
/// any fault other than "no profile yet" on the update path is fatal.
pub async fn provision_login(
    store: &dyn IdentityStore,
    user_name: &str,
    password: &SecretString,
) -> Result<CredentialAction, ServiceError> {
    match store.update_login_profile(user_name, password, true).await {
        Ok(()) => {
            tracing::info!(user = %user_name, "Updated login profile");
            Ok(CredentialAction::Updated)
        }
        Err(err) if err.is_not_found() => {
            store
                .create_login_profile(user_name, password, true)
                .await
                .map_err(ServiceError::Provisioning)?;
            tracing::info!(user = %user_name, "Created login profile");
            Ok(CredentialAction::Created)
        }
        Err(err) => Err(ServiceError::Provisioning(err)),
    }
}
