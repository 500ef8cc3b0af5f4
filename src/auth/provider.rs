//! Identity provider boundary and its Identity Toolkit REST client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::models::user::AuthUser;

pub const DEFAULT_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const REQUEST_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Error)]
pub enum AuthError {
    /// The provider refused the credentials. The message is the provider's own.
    #[error("{0}")]
    Rejected(String),

    #[error("identity provider unreachable")]
    Transport(#[from] reqwest::Error),

    #[error("identity provider returned HTTP {0}")]
    Unavailable(u16),

    #[error("unexpected identity provider response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AuthError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Email/password accounts through the Identity Toolkit REST API.
pub struct IdentityToolkitProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl IdentityToolkitProvider {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    async fn password_call(
        &self,
        action: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, AuthError> {
        let url = format!("{}/accounts:{}", self.base_url, action);
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&PasswordRequest {
                email,
                password,
                return_secure_token: true,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status.is_server_error() {
            tracing::error!(action, status = status.as_u16(), "identity provider unavailable");
            return Err(AuthError::Unavailable(status.as_u16()));
        }
        if !status.is_success() {
            let envelope = serde_json::from_str::<ErrorEnvelope>(&body).map_err(|_| {
                AuthError::InvalidResponse(format!("HTTP {} without error message", status.as_u16()))
            })?;
            let message = envelope.error.message;
            tracing::warn!(action, status = status.as_u16(), %message, "identity provider rejected request");
            return Err(AuthError::Rejected(message));
        }

        let account: AccountResponse =
            serde_json::from_str(&body).map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
        Ok(AuthUser {
            uid: account.local_id,
            email: account.email.unwrap_or_else(|| email.to_string()),
        })
    }
}

#[async_trait]
impl IdentityProvider for IdentityToolkitProvider {
    #[instrument(skip(self, password), level = "info")]
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        self.password_call("signInWithPassword", email, password).await
    }

    #[instrument(skip(self, password), level = "info")]
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        self.password_call("signUp", email, password).await
    }
}
