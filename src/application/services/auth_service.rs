use crate::domain::entities::{AuthSession, Credentials, Worker};
use crate::domain::errors::DomainError;
use crate::domain::ports::{AuthProvider, KeyValueStore, WorkerRepository};
use crate::domain::services::{AuthEvent, AuthState};
use crate::shared::error::{AppError, AppResult};
use crate::shared::utils::email_validator::validate_and_normalize_email;
use std::sync::Arc;

pub const WORKER_KEY: &str = "worker";
pub const TOKEN_KEY: &str = "token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

const CREDENTIAL_KEYS: [&str; 3] = [WORKER_KEY, TOKEN_KEY, REFRESH_TOKEN_KEY];

pub const WORKER_NOT_FOUND: &str = "Worker no encontrado o inactivo";
const RESTORE_WORKER_MISSING: &str = "Worker no encontrado";
const RESTORE_FAILED: &str = "Error al verificar autenticación";

/// Owns the worker session: start-up restore, login, logout and cache reset.
pub struct AuthService {
    provider: Arc<dyn AuthProvider>,
    workers: Arc<dyn WorkerRepository>,
    store: Arc<dyn KeyValueStore>,
    state: AuthState,
}

impl AuthService {
    pub fn new(
        provider: Arc<dyn AuthProvider>,
        workers: Arc<dyn WorkerRepository>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            provider,
            workers,
            store,
            state: AuthState::default(),
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    fn dispatch(&mut self, event: AuthEvent) {
        let previous = std::mem::take(&mut self.state);
        self.state = previous.apply(event);
        tracing::debug!("Auth state is now {:?}", self.state);
    }

    /// The signed-in worker, or `Unauthenticated`.
    pub fn current_worker(&self) -> AppResult<&Worker> {
        self.state
            .worker()
            .ok_or(AppError::Domain(DomainError::Unauthenticated))
    }

    /// Start-up check of the stored session.
    pub async fn restore(&mut self) -> &AuthState {
        self.dispatch(AuthEvent::Start);
        let event = match self.restore_worker().await {
            Ok(Some(worker)) => {
                tracing::info!("Session restored for worker {}", worker.id);
                AuthEvent::Success(worker)
            }
            Ok(None) => AuthEvent::Failure(String::new()),
            Err(e) if e.is_unauthenticated() => {
                tracing::info!("Stored session expired, clearing credentials");
                if let Err(e) = self.store.remove_many(&CREDENTIAL_KEYS).await {
                    tracing::warn!("Failed to clear stored credentials: {}", e);
                }
                AuthEvent::Failure(String::new())
            }
            Err(AppError::Domain(DomainError::NotFound(_))) => {
                tracing::warn!("Authenticated user has no active worker record");
                AuthEvent::Failure(RESTORE_WORKER_MISSING.to_string())
            }
            Err(e) => {
                tracing::error!("Error checking auth status: {}", e);
                AuthEvent::Failure(RESTORE_FAILED.to_string())
            }
        };
        self.dispatch(event);
        &self.state
    }

    async fn restore_worker(&self) -> AppResult<Option<Worker>> {
        let Some(token) = self.store.get(TOKEN_KEY).await? else {
            tracing::debug!("No stored session");
            return Ok(None);
        };
        let email = match self.provider.current_user(&token).await {
            Ok(email) => email,
            Err(e) if e.is_unauthenticated() => {
                tracing::debug!("Stored access token rejected, trying refresh: {}", e);
                self.refresh_session().await?
            }
            Err(e) => return Err(e),
        };
        let worker = self
            .workers
            .find_active_by_email(&email)
            .await?
            .ok_or_else(|| DomainError::NotFound(email.clone()))?;
        self.store
            .set(WORKER_KEY, &serde_json::to_string(&worker)?)
            .await?;
        Ok(Some(worker))
    }

    /// Swap the stored refresh token for a new session. A missing or
    /// rejected refresh token surfaces as `Unauthenticated`.
    async fn refresh_session(&self) -> AppResult<String> {
        let Some(refresh_token) = self.store.get(REFRESH_TOKEN_KEY).await? else {
            return Err(DomainError::Unauthenticated.into());
        };
        let session = match self.provider.refresh(&refresh_token).await {
            Ok(session) => session,
            Err(AppError::Backend { status, message }) if status == 400 || status == 401 => {
                tracing::info!("Refresh token rejected: {}", message);
                return Err(DomainError::Unauthenticated.into());
            }
            Err(e) => return Err(e),
        };
        self.store_tokens(&session).await?;
        tracing::info!("Session refreshed for {}", session.user_email);
        Ok(session.user_email)
    }

    async fn store_tokens(&self, session: &AuthSession) -> AppResult<()> {
        self.store.set(TOKEN_KEY, &session.access_token).await?;
        match &session.refresh_token {
            Some(refresh) => self.store.set(REFRESH_TOKEN_KEY, refresh).await,
            None => self.store.remove(REFRESH_TOKEN_KEY).await,
        }
    }

    pub async fn login(&mut self, credentials: &Credentials) -> AppResult<Worker> {
        self.dispatch(AuthEvent::Start);
        match self.sign_in(credentials).await {
            Ok(worker) => {
                tracing::info!("Worker {} signed in", worker.id);
                self.dispatch(AuthEvent::Success(worker.clone()));
                Ok(worker)
            }
            Err(e) => {
                tracing::error!("Login failed: {}", e);
                self.dispatch(AuthEvent::Failure(failure_message(&e)));
                Err(e)
            }
        }
    }

    async fn sign_in(&self, credentials: &Credentials) -> AppResult<Worker> {
        let email = validate_and_normalize_email(&credentials.email)?;
        if credentials.password.is_empty() {
            return Err(DomainError::ValidationError("Password is required".to_string()).into());
        }
        let normalized = Credentials {
            email,
            password: credentials.password.clone(),
        };

        let session = self.provider.sign_in(&normalized).await?;
        let worker = self
            .workers
            .find_active_by_email(&session.user_email)
            .await?
            .ok_or_else(|| DomainError::NotFound(WORKER_NOT_FOUND.to_string()))?;

        self.store
            .set(WORKER_KEY, &serde_json::to_string(&worker)?)
            .await?;
        self.store_tokens(&session).await?;
        Ok(worker)
    }

    async fn sign_out_stored_session(&self) {
        let token = match self.store.get(TOKEN_KEY).await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("Could not read stored token: {}", e);
                None
            }
        };
        if let Some(token) = token {
            if let Err(e) = self.provider.sign_out(&token).await {
                tracing::error!("Error during sign-out: {}", e);
            }
        }
    }

    /// Sign out and drop the stored credentials. Local state is cleared even
    /// when the provider call fails.
    pub async fn logout(&mut self) -> AppResult<()> {
        self.sign_out_stored_session().await;
        let removed = self.store.remove_many(&CREDENTIAL_KEYS).await;
        self.dispatch(AuthEvent::Logout);
        tracing::info!("Worker signed out");
        removed
    }

    pub fn clear_error(&mut self) {
        self.dispatch(AuthEvent::ClearError);
    }

    /// Wipe the whole local cache, including progress marks.
    pub async fn clear_all_cache(&mut self) -> AppResult<()> {
        self.sign_out_stored_session().await;
        let cleared = self.store.clear().await;
        self.dispatch(AuthEvent::Logout);
        tracing::info!("Local cache cleared");
        cleared
    }
}

/// Message shown for a failed login.
fn failure_message(err: &AppError) -> String {
    match err {
        AppError::Domain(DomainError::NotFound(message))
        | AppError::Domain(DomainError::ValidationError(message)) => message.clone(),
        AppError::Backend { status: 400, .. } | AppError::Backend { status: 401, .. } => {
            "Credenciales inválidas".to_string()
        }
        other => other.to_string(),
    }
}
