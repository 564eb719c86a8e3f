use thiserror::Error;

/// Errors surfaced by identity-service calls.
///
/// `NotFound` is kept as its own variant because "the user is not visible
/// yet" is the expected state in the window right after user creation, and
/// callers react to it differently from every other fault.
#[derive(Debug, Error)]
pub enum IamError {
    #[error("{entity} not found")]
    NotFound { entity: String },

    #[error("Identity service returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Connection error: {0}")]
    Transport(String),

    #[error("Invalid response from identity service: {0}")]
    InvalidResponse(String),
}

impl IamError {
    pub fn not_found(entity: impl Into<String>) -> Self {
        IamError::NotFound {
            entity: entity.into(),
        }
    }

    /// True for the expected eventual-consistency signal.
    pub fn is_not_found(&self) -> bool {
        matches!(self, IamError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_distinguishable() {
        assert!(IamError::not_found("user 'alice'").is_not_found());
        assert!(!IamError::Transport("refused".to_string()).is_not_found());
        assert!(
            !IamError::Api {
                status: 500,
                message: "boom".to_string()
            }
            .is_not_found()
        );
    }

    #[test]
    fn display_includes_entity() {
        let err = IamError::not_found("user 'alice'");
        assert_eq!(err.to_string(), "user 'alice' not found");
    }
}
