//! Google OAuth2 authorization-code exchange.
//!
//! Two sequential calls: the token endpoint (form-encoded POST) and the
//! user-info endpoint (bearer GET). Neither the code nor the tokens are
//! cached or logged.

use crate::config::GoogleOAuthConfig;
use crate::models::IdentityProfile;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentityError {
    /// The provider answered with an explicit `error` payload.
    #[error("identity provider rejected the authorization code")]
    Rejected(Value),

    #[error("{0}")]
    Network(String),

    #[error("{0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for IdentityError {
    fn from(err: reqwest::Error) -> Self {
        IdentityError::Network(err.to_string())
    }
}

impl IdentityError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            IdentityError::Rejected(_) => "rejected",
            IdentityError::Network(_) => "network_error",
            IdentityError::InvalidResponse(_) => "invalid_response",
        }
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Trade an authorization code for the signed-in user's profile.
    async fn exchange_code(&self, code: &str) -> Result<IdentityProfile, IdentityError>;
}

pub struct GoogleIdentityClient {
    client: Client,
    config: GoogleOAuthConfig,
}

impl GoogleIdentityClient {
    pub fn new(config: GoogleOAuthConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    async fn request_access_token(&self, code: &str) -> Result<String, IdentityError> {
        let response = self
            .client
            .post(&self.config.token_url)
            .form(&[
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.expose_secret().as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        let status = response.status();
        let payload: Value = response.json().await.map_err(|e| {
            IdentityError::InvalidResponse(format!(
                "token endpoint returned an unreadable body (status {}): {}",
                status, e
            ))
        })?;

        if payload.get("error").is_some_and(|e| !e.is_null()) {
            tracing::warn!(status = %status, "Google token exchange rejected");
            return Err(IdentityError::Rejected(payload));
        }

        payload
            .get("access_token")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                IdentityError::InvalidResponse(format!(
                    "token endpoint response (status {}) has no access_token",
                    status
                ))
            })
    }

    async fn fetch_userinfo(&self, access_token: &str) -> Result<Value, IdentityError> {
        let response = self
            .client
            .get(&self.config.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await?;

        // A non-2xx JSON body is still handed back as the profile; only an
        // unreadable body fails the exchange.
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "Google userinfo returned an error status");
        }

        response.json().await.map_err(|e| {
            IdentityError::InvalidResponse(format!(
                "userinfo response (status {}) is not JSON: {}",
                status, e
            ))
        })
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentityClient {
    async fn exchange_code(&self, code: &str) -> Result<IdentityProfile, IdentityError> {
        let access_token = self.request_access_token(code).await?;
        let userinfo = self.fetch_userinfo(&access_token).await?;

        Ok(IdentityProfile::from_userinfo(userinfo))
    }
}
