use std::env;
use std::time::Duration;

use config::{Config as Cfg, File};
use iam_core::RetryBudget;
use secrecy::SecretString;
use serde::Deserialize;

use crate::services::ServiceError;

#[derive(Debug, Deserialize, Clone)]
pub struct CommonConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl CommonConfig {
    pub fn load() -> Result<Self, ServiceError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()
            .map_err(|e| ServiceError::Config(anyhow::Error::new(e)))?;

        config
            .try_deserialize()
            .map_err(|e| ServiceError::Config(anyhow::Error::new(e)))
    }
}

/// Enrollment policy: which group to converge users into and how patiently
/// to wait out the identity service's read-after-write window.
#[derive(Debug, Clone)]
pub struct EnrollmentPolicy {
    pub group_name: String,
    pub max_attempts: u32,
    pub retry_delay: Duration,
    /// Initial console password. Always provisioned with the
    /// reset-required flag, so it is single-use.
    pub initial_password: SecretString,
}

impl EnrollmentPolicy {
    pub fn retry_budget(&self) -> RetryBudget {
        RetryBudget::new(self.max_attempts, self.retry_delay)
    }
}

#[derive(Debug, Clone)]
pub struct IamConfig {
    /// When set, the identity service is reached over HTTP.
    /// Leave empty to run against the in-memory store.
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EnrollmentConfig {
    pub common: CommonConfig,
    pub enrollment: EnrollmentPolicy,
    pub iam: IamConfig,
}

impl EnrollmentConfig {
    pub fn load() -> Result<Self, ServiceError> {
        let common = CommonConfig::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let max_attempts = get_env("ENROLL_MAX_ATTEMPTS", Some("5"), is_prod)?
            .parse()
            .unwrap_or(5);
        let retry_delay_secs: u64 = get_env("ENROLL_RETRY_DELAY_SECS", Some("5"), is_prod)?
            .parse()
            .unwrap_or(5);

        Ok(EnrollmentConfig {
            common,
            enrollment: EnrollmentPolicy {
                group_name: get_env("MFA_GROUP_NAME", Some("MFARequired"), is_prod)?,
                max_attempts,
                retry_delay: Duration::from_secs(retry_delay_secs),
                initial_password: SecretString::new(get_env(
                    "INITIAL_PASSWORD",
                    Some("TempPassword@123!"),
                    is_prod,
                )?),
            },
            iam: IamConfig {
                endpoint: env::var("IAM_ENDPOINT").ok().filter(|v| !v.is_empty()),
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, ServiceError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(ServiceError::Config(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(ServiceError::Config(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_env_is_unset() {
        let config = EnrollmentConfig::load().expect("Failed to load config");
        assert_eq!(config.enrollment.group_name, "MFARequired");
        assert_eq!(config.enrollment.max_attempts, 5);
        assert_eq!(config.enrollment.retry_delay, Duration::from_secs(5));
        assert!(config.iam.endpoint.is_none());
    }

    #[test]
    fn retry_budget_is_built_from_policy() {
        let policy = EnrollmentPolicy {
            group_name: "MFARequired".to_string(),
            max_attempts: 3,
            retry_delay: Duration::from_millis(250),
            initial_password: SecretString::new("TempPassword@123!".to_string()),
        };

        let budget = policy.retry_budget();
        assert_eq!(budget.max_attempts(), 3);
        assert_eq!(budget.delay(), Duration::from_millis(250));
    }
}
