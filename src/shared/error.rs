use crate::config::ConfigError;
use crate::domain::errors::DomainError;
use thiserror::Error;

/// Longest backend error body kept in an `AppError::Backend` message.
const MAX_BODY_CHARS: usize = 500;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend returned HTTP {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AppError {
    /// Build a backend error from a non-success status and its response body.
    pub fn backend(status: u16, body: &str) -> Self {
        let message = if body.chars().count() > MAX_BODY_CHARS {
            body.chars().take(MAX_BODY_CHARS).collect()
        } else if body.is_empty() {
            format!("HTTP {} error", status)
        } else {
            body.to_string()
        };
        AppError::Backend { status, message }
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            AppError::Domain(DomainError::Unauthenticated)
                | AppError::Backend { status: 401, .. }
        )
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Network(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            AppError::Network(format!("Connection failed: {}", err))
        } else if err.is_decode() {
            AppError::Network(format!("Invalid response body: {}", err))
        } else {
            AppError::Network(err.to_string())
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
