use crate::domain::entities::{AuthSession, Credentials};
use crate::shared::error::AppResult;
use async_trait::async_trait;

/// Identity provider the worker signs in against
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, credentials: &Credentials) -> AppResult<AuthSession>;

    /// Exchange a refresh token for a new session
    async fn refresh(&self, refresh_token: &str) -> AppResult<AuthSession>;

    /// Revoke the session behind `access_token`
    async fn sign_out(&self, access_token: &str) -> AppResult<()>;

    /// E-mail of the user owning `access_token`
    async fn current_user(&self, access_token: &str) -> AppResult<String>;
}
