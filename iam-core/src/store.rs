use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::IamError;

/// A user record as reported by the identity service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IamUser {
    pub user_name: String,
    pub create_date: DateTime<Utc>,
}

/// Capability-typed handle to the identity service.
///
/// Built once at process start and injected into each invocation as
/// `Arc<dyn IdentityStore>`. Every operation must surface `IamError::NotFound`
/// distinctly from other faults: reads issued immediately after a user is
/// created may not see the user yet, and callers retry on exactly that
/// condition.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Existence probe. `NotFound` while the user is inside the
    /// eventual-consistency window.
    async fn get_user(&self, user_name: &str) -> Result<IamUser, IamError>;

    /// Add the user to a pre-existing group.
    async fn add_user_to_group(&self, user_name: &str, group_name: &str) -> Result<(), IamError>;

    /// List all users with their creation timestamps.
    async fn list_users(&self) -> Result<Vec<IamUser>, IamError>;

    /// Replace the user's console password. `NotFound` when the user has no
    /// login profile yet.
    async fn update_login_profile(
        &self,
        user_name: &str,
        password: &SecretString,
        reset_required: bool,
    ) -> Result<(), IamError>;

    /// Create the user's console password.
    async fn create_login_profile(
        &self,
        user_name: &str,
        password: &SecretString,
        reset_required: bool,
    ) -> Result<(), IamError>;

    /// Reachability probe for readiness checks.
    async fn health_check(&self) -> Result<(), IamError>;
}
