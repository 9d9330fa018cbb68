use super::PostgrestClient;
use crate::domain::entities::{AuthSession, Credentials};
use crate::domain::errors::DomainError;
use crate::domain::ports::AuthProvider;
use crate::shared::error::AppResult;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct AuthUser {
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    user: Option<AuthUser>,
}

fn user_email(user: Option<AuthUser>) -> AppResult<String> {
    user.and_then(|u| u.email)
        .filter(|email| !email.is_empty())
        .ok_or_else(|| {
            DomainError::Internal("Authenticated user has no e-mail".to_string()).into()
        })
}

impl PostgrestClient {
    /// Authorize the client with a fresh token response.
    async fn start_session<F>(
        &self,
        body: TokenResponse,
        fallback_email: F,
    ) -> AppResult<AuthSession>
    where
        F: FnOnce() -> AppResult<String>,
    {
        let user_email = match user_email(body.user) {
            Ok(email) => email,
            Err(_) => fallback_email()?,
        };
        self.set_token(Some(body.access_token.clone())).await;

        Ok(AuthSession {
            access_token: body.access_token,
            refresh_token: body.refresh_token,
            user_email,
        })
    }
}

/// GoTrue endpoints. A successful sign-in or token check also authorizes the
/// shared client for table reads.
#[async_trait]
impl AuthProvider for PostgrestClient {
    async fn sign_in(&self, credentials: &Credentials) -> AppResult<AuthSession> {
        let request = self
            .http()
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .json(&json!({
                "email": credentials.email,
                "password": credentials.password,
            }));
        let body: TokenResponse = self.auth_request(request, None).await?.json().await?;

        let fallback = credentials.email.clone();
        self.start_session(body, || Ok(fallback)).await
    }

    async fn refresh(&self, refresh_token: &str) -> AppResult<AuthSession> {
        let request = self
            .http()
            .post(self.auth_url("token"))
            .query(&[("grant_type", "refresh_token")])
            .json(&json!({ "refresh_token": refresh_token }));
        let body: TokenResponse = self.auth_request(request, None).await?.json().await?;
        tracing::debug!("Access token refreshed");

        self.start_session(body, || {
            Err(DomainError::Internal("Refreshed session has no user".to_string()).into())
        })
        .await
    }

    async fn sign_out(&self, access_token: &str) -> AppResult<()> {
        let request = self.http().post(self.auth_url("logout"));
        let result = self.auth_request(request, Some(access_token)).await;
        self.set_token(None).await;
        result.map(|_| ())
    }

    async fn current_user(&self, access_token: &str) -> AppResult<String> {
        let request = self.http().get(self.auth_url("user"));
        let user: AuthUser = self
            .auth_request(request, Some(access_token))
            .await?
            .json()
            .await?;
        let email = user_email(Some(user))?;
        self.set_token(Some(access_token.to_string())).await;
        Ok(email)
    }
}
