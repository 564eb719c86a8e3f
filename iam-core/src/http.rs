//! HTTP-backed identity store client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::IamError;
use crate::store::{IamUser, IdentityStore};

/// Configuration for the identity-service client.
#[derive(Clone, Debug)]
pub struct IamClientConfig {
    /// Base URL of the identity service (e.g., "http://iam-gateway:8081").
    pub endpoint: String,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Request timeout.
    pub request_timeout: Duration,
}

impl Default for IamClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8081".to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Identity store backed by the identity service's REST API.
#[derive(Clone)]
pub struct HttpIdentityStore {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Serialize)]
struct GroupMemberBody<'a> {
    user_name: &'a str,
}

#[derive(Debug, Serialize)]
struct LoginProfileBody<'a> {
    password: &'a str,
    reset_required: bool,
}

#[derive(Debug, Deserialize)]
struct ListUsersResponse {
    users: Vec<IamUser>,
}

impl HttpIdentityStore {
    pub fn new(config: IamClientConfig) -> Result<Self, IamError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| IamError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client for the given endpoint with default timeouts.
    pub fn connect(endpoint: &str) -> Result<Self, IamError> {
        Self::new(IamClientConfig {
            endpoint: endpoint.to_string(),
            ..Default::default()
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    /// Map a non-2xx response into the error taxonomy. 404 is the
    /// eventual-consistency signal and must stay distinguishable.
    async fn check_status(response: Response, entity: &str) -> Result<Response, IamError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(IamError::not_found(entity));
        }
        let message = response.text().await.unwrap_or_default();
        Err(IamError::Api {
            status: status.as_u16(),
            message,
        })
    }

    fn transport(entity: &str, err: reqwest::Error) -> IamError {
        IamError::Transport(format!("Request for {} failed: {}", entity, err))
    }
}

#[async_trait]
impl IdentityStore for HttpIdentityStore {
    async fn get_user(&self, user_name: &str) -> Result<IamUser, IamError> {
        let entity = format!("user '{}'", user_name);
        let response = self
            .client
            .get(self.url(&format!("/users/{}", user_name)))
            .send()
            .await
            .map_err(|e| Self::transport(&entity, e))?;
        let response = Self::check_status(response, &entity).await?;

        response
            .json::<IamUser>()
            .await
            .map_err(|e| IamError::InvalidResponse(format!("Failed to parse user record: {}", e)))
    }

    async fn add_user_to_group(&self, user_name: &str, group_name: &str) -> Result<(), IamError> {
        let entity = format!("user '{}'", user_name);
        let response = self
            .client
            .post(self.url(&format!("/groups/{}/users", group_name)))
            .json(&GroupMemberBody { user_name })
            .send()
            .await
            .map_err(|e| Self::transport(&entity, e))?;
        Self::check_status(response, &entity).await?;
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<IamUser>, IamError> {
        let response = self
            .client
            .get(self.url("/users"))
            .send()
            .await
            .map_err(|e| Self::transport("user listing", e))?;
        let response = Self::check_status(response, "user listing").await?;

        let listing = response.json::<ListUsersResponse>().await.map_err(|e| {
            IamError::InvalidResponse(format!("Failed to parse user listing: {}", e))
        })?;
        Ok(listing.users)
    }

    async fn update_login_profile(
        &self,
        user_name: &str,
        password: &SecretString,
        reset_required: bool,
    ) -> Result<(), IamError> {
        let entity = format!("login profile for '{}'", user_name);
        let response = self
            .client
            .put(self.url(&format!("/users/{}/login-profile", user_name)))
            .json(&LoginProfileBody {
                password: password.expose_secret(),
                reset_required,
            })
            .send()
            .await
            .map_err(|e| Self::transport(&entity, e))?;
        Self::check_status(response, &entity).await?;
        Ok(())
    }

    async fn create_login_profile(
        &self,
        user_name: &str,
        password: &SecretString,
        reset_required: bool,
    ) -> Result<(), IamError> {
        let entity = format!("user '{}'", user_name);
        let response = self
            .client
            .post(self.url(&format!("/users/{}/login-profile", user_name)))
            .json(&LoginProfileBody {
                password: password.expose_secret(),
                reset_required,
            })
            .send()
            .await
            .map_err(|e| Self::transport(&entity, e))?;
        Self::check_status(response, &entity).await?;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), IamError> {
        let response = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .map_err(|e| Self::transport("identity service", e))?;
        Self::check_status(response, "identity service").await?;
        Ok(())
    }
}
