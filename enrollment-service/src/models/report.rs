use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Success,
    Failed,
}

/// What the membership enroller decided for one user. Produced exactly once
/// per invocation; the orchestrator provisions credentials only on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentOutcome {
    pub status: EnrollmentStatus,
    pub user: String,
    pub reason: Option<String>,
}

impl EnrollmentOutcome {
    pub fn succeeded(user: impl Into<String>) -> Self {
        Self {
            status: EnrollmentStatus::Success,
            user: user.into(),
            reason: None,
        }
    }

    pub fn failed(user: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            status: EnrollmentStatus::Failed,
            user: user.into(),
            reason: Some(reason.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == EnrollmentStatus::Success
    }
}

/// The structured result returned to the invoking environment. Always
/// produced, whatever happened inside the invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrollmentReport {
    pub status: EnrollmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl EnrollmentReport {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            status: EnrollmentStatus::Failed,
            user: None,
            reason: Some(reason.into()),
        }
    }
}

impl From<EnrollmentOutcome> for EnrollmentReport {
    fn from(outcome: EnrollmentOutcome) -> Self {
        Self {
            status: outcome.status,
            user: Some(outcome.user),
            reason: outcome.reason,
        }
    }
}
