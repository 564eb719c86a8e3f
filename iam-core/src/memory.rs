//! In-memory identity store.
//!
//! Used at startup when no identity-service endpoint is configured, and by
//! tests. Supports delayed user visibility to simulate the read-after-write
//! window of a real identity service, and fault injection for the
//! credential path.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};

use crate::error::IamError;
use crate::store::{IamUser, IdentityStore};

/// A console credential as held by the in-memory store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginProfile {
    pub password: String,
    pub reset_required: bool,
}

struct UserRecord {
    create_date: DateTime<Utc>,
    /// Remaining `get_user` probes that still report `NotFound`.
    probes_until_visible: u32,
    groups: Vec<String>,
    login_profile: Option<LoginProfile>,
}

#[derive(Default)]
struct State {
    users: HashMap<String, UserRecord>,
    get_user_fault: Option<String>,
    login_profile_fault: Option<String>,
}

/// In-process [`IdentityStore`] with call counters.
#[derive(Default)]
pub struct MemoryIdentityStore {
    state: Mutex<State>,
    get_user_calls: AtomicU64,
    list_users_calls: AtomicU64,
    group_add_calls: AtomicU64,
    update_profile_calls: AtomicU64,
    create_profile_calls: AtomicU64,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a user that is immediately visible to reads.
    pub fn insert_user(&self, user_name: &str, create_date: DateTime<Utc>) {
        self.insert_user_hidden_for(user_name, create_date, 0);
    }

    /// Insert a user whose first `probes` existence checks report
    /// `NotFound`; the user becomes visible on probe `probes + 1`.
    pub fn insert_user_hidden_for(&self, user_name: &str, create_date: DateTime<Utc>, probes: u32) {
        let mut state = self.state.lock().unwrap();
        state.users.insert(
            user_name.to_string(),
            UserRecord {
                create_date,
                probes_until_visible: probes,
                groups: Vec::new(),
                login_profile: None,
            },
        );
    }

    /// Make every `get_user` call fail with an API fault instead of the
    /// not-found signal.
    pub fn fail_get_user_with(&self, message: &str) {
        self.state.lock().unwrap().get_user_fault = Some(message.to_string());
    }

    /// Make both login-profile calls fail with an API fault.
    pub fn fail_login_profile_with(&self, message: &str) {
        self.state.lock().unwrap().login_profile_fault = Some(message.to_string());
    }

    pub fn user_groups(&self, user_name: &str) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state
            .users
            .get(user_name)
            .map(|record| record.groups.clone())
            .unwrap_or_default()
    }

    pub fn login_profile(&self, user_name: &str) -> Option<LoginProfile> {
        let state = self.state.lock().unwrap();
        state
            .users
            .get(user_name)
            .and_then(|record| record.login_profile.clone())
    }

    pub fn get_user_calls(&self) -> u64 {
        self.get_user_calls.load(Ordering::SeqCst)
    }

    pub fn list_users_calls(&self) -> u64 {
        self.list_users_calls.load(Ordering::SeqCst)
    }

    pub fn group_add_calls(&self) -> u64 {
        self.group_add_calls.load(Ordering::SeqCst)
    }

    pub fn update_profile_calls(&self) -> u64 {
        self.update_profile_calls.load(Ordering::SeqCst)
    }

    pub fn create_profile_calls(&self) -> u64 {
        self.create_profile_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn get_user(&self, user_name: &str) -> Result<IamUser, IamError> {
        self.get_user_calls.fetch_add(1, Ordering::SeqCst);

        let mut state = self.state.lock().unwrap();
        if let Some(message) = &state.get_user_fault {
            return Err(IamError::Api {
                status: 500,
                message: message.clone(),
            });
        }

        let entity = format!("user '{}'", user_name);
        let record = state
            .users
            .get_mut(user_name)
            .ok_or_else(|| IamError::not_found(&entity))?;

        if record.probes_until_visible > 0 {
            record.probes_until_visible -= 1;
            return Err(IamError::not_found(&entity));
        }

        Ok(IamUser {
            user_name: user_name.to_string(),
            create_date: record.create_date,
        })
    }

    async fn add_user_to_group(&self, user_name: &str, group_name: &str) -> Result<(), IamError> {
        self.group_add_calls.fetch_add(1, Ordering::SeqCst);

        let mut state = self.state.lock().unwrap();
        let record = state
            .users
            .get_mut(user_name)
            .filter(|record| record.probes_until_visible == 0)
            .ok_or_else(|| IamError::not_found(format!("user '{}'", user_name)))?;

        if !record.groups.iter().any(|g| g == group_name) {
            record.groups.push(group_name.to_string());
        }
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<IamUser>, IamError> {
        self.list_users_calls.fetch_add(1, Ordering::SeqCst);

        let state = self.state.lock().unwrap();
        Ok(state
            .users
            .iter()
            .map(|(name, record)| IamUser {
                user_name: name.clone(),
                create_date: record.create_date,
            })
            .collect())
    }

    async fn update_login_profile(
        &self,
        user_name: &str,
        password: &SecretString,
        reset_required: bool,
    ) -> Result<(), IamError> {
        self.update_profile_calls.fetch_add(1, Ordering::SeqCst);

        let mut state = self.state.lock().unwrap();
        if let Some(message) = &state.login_profile_fault {
            return Err(IamError::Api {
                status: 500,
                message: message.clone(),
            });
        }

        let record = state
            .users
            .get_mut(user_name)
            .ok_or_else(|| IamError::not_found(format!("user '{}'", user_name)))?;

        match record.login_profile.as_mut() {
            Some(profile) => {
                profile.password = password.expose_secret().clone();
                profile.reset_required = reset_required;
                Ok(())
            }
            None => Err(IamError::not_found(format!(
                "login profile for '{}'",
                user_name
            ))),
        }
    }

    async fn create_login_profile(
        &self,
        user_name: &str,
        password: &SecretString,
        reset_required: bool,
    ) -> Result<(), IamError> {
        self.create_profile_calls.fetch_add(1, Ordering::SeqCst);

        let mut state = self.state.lock().unwrap();
        if let Some(message) = &state.login_profile_fault {
            return Err(IamError::Api {
                status: 500,
                message: message.clone(),
            });
        }

        let record = state
            .users
            .get_mut(user_name)
            .ok_or_else(|| IamError::not_found(format!("user '{}'", user_name)))?;

        record.login_profile = Some(LoginProfile {
            password: password.expose_secret().clone(),
            reset_required,
        });
        Ok(())
    }

    async fn health_check(&self) -> Result<(), IamError> {
        Ok(())
    }
}
