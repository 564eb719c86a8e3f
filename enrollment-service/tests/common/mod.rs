//! Test helper module for enrollment-service integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use enrollment_service::config::{CommonConfig, EnrollmentConfig, EnrollmentPolicy, IamConfig};
use enrollment_service::{AppState, Application};
use iam_core::MemoryIdentityStore;
use secrecy::SecretString;

pub const TEST_GROUP: &str = "MFARequired";
pub const TEST_PASSWORD: &str = "TempPassword@123!";

pub fn test_config(max_attempts: u32, retry_delay: Duration) -> EnrollmentConfig {
    EnrollmentConfig {
        common: CommonConfig { port: 0 },
        enrollment: EnrollmentPolicy {
            group_name: TEST_GROUP.to_string(),
            max_attempts,
            retry_delay,
            initial_password: SecretString::new(TEST_PASSWORD.to_string()),
        },
        iam: IamConfig { endpoint: None },
    }
}

pub fn test_state(
    store: Arc<MemoryIdentityStore>,
    max_attempts: u32,
    retry_delay: Duration,
) -> AppState {
    AppState {
        config: test_config(max_attempts, retry_delay),
        store,
    }
}

/// A running service bound to a random port, backed by a seeded store.
pub struct TestApp {
    pub address: String,
    pub store: Arc<MemoryIdentityStore>,
    client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn(store: Arc<MemoryIdentityStore>) -> TestApp {
        let config = test_config(3, Duration::from_millis(25));
        let app = Application::build_with_store(config, store.clone())
            .await
            .expect("Failed to build test app");
        let address = format!("http://127.0.0.1:{}", app.port());
        tokio::spawn(app.run_until_stopped());

        TestApp {
            address,
            store,
            client: reqwest::Client::new(),
        }
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}
