use iam_core::IamError;
use thiserror::Error;

/// Faults the enrollment pipeline classifies for itself.
///
/// Resolution and provisioning faults are fatal for the invocation. The
/// enroller's retryable conditions never surface here; they are absorbed
/// into its returned outcome.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("No IAM users found in account.")]
    NoUsersFound,

    #[error("Could not resolve target user: {0}")]
    Resolution(IamError),

    #[error("Could not set login profile: {0}")]
    Provisioning(IamError),

    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Startup error: {0}")]
    Startup(#[from] std::io::Error),
}
