use async_trait::async_trait;
use reqwest::{Method, StatusCode};

use crate::common::BackendError;
use crate::db::{error_message, Backend};
use crate::models::{AccessToken, AuthUser, Credentials, Session};

/// Session-based authentication against the hosted auth service.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Exchanges email/password for a session.
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, BackendError>;

    /// Resolves a token to its user; `None` when the token is unknown or expired.
    async fn current_user(&self, token: &AccessToken) -> Result<Option<AuthUser>, BackendError>;

    async fn sign_out(&self, token: &AccessToken) -> Result<(), BackendError>;
}

#[async_trait]
impl AuthProvider for Backend {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, BackendError> {
        let response = self
            .request(Method::POST, &self.auth_url("token"), None)
            .query(&[("grant_type", "password")])
            .json(credentials)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let bytes = response.bytes().await?;
            return Ok(serde_json::from_slice(&bytes)?);
        }

        let message = error_message(&response.text().await.unwrap_or_default());
        if status.is_client_error() {
            log::warn!("Sign-in rejected for {}: {}", credentials.email, message);
            Err(BackendError::Auth(message))
        } else {
            Err(BackendError::Status {
                status: status.as_u16(),
                message,
            })
        }
    }

    async fn current_user(&self, token: &AccessToken) -> Result<Option<AuthUser>, BackendError> {
        let response = self
            .request(Method::GET, &self.auth_url("user"), Some(token))
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status if status.is_success() => {
                let bytes = response.bytes().await?;
                Ok(Some(serde_json::from_slice(&bytes)?))
            }
            status => Err(BackendError::Status {
                status: status.as_u16(),
                message: error_message(&response.text().await.unwrap_or_default()),
            }),
        }
    }

    async fn sign_out(&self, token: &AccessToken) -> Result<(), BackendError> {
        let response = self
            .request(Method::POST, &self.auth_url("logout"), Some(token))
            .send()
            .await?;

        match response.status() {
            // Already expired or revoked; nothing left to end.
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => Ok(()),
            status if status.is_success() => Ok(()),
            status => Err(BackendError::Status {
                status: status.as_u16(),
                message: error_message(&response.text().await.unwrap_or_default()),
            }),
        }
    }
}
