use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerRole {
    #[default]
    Worker,
    Admin,
    SuperAdmin,
}

impl fmt::Display for WorkerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerRole::Worker => write!(f, "worker"),
            WorkerRole::Admin => write!(f, "admin"),
            WorkerRole::SuperAdmin => write!(f, "super_admin"),
        }
    }
}

/// A care worker record from the `workers` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
    #[serde(default)]
    pub role: WorkerRole,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Worker {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: None,
            surname: None,
            role: WorkerRole::Worker,
            is_active: true,
        }
    }

    /// Full name, or the e-mail when the worker has no name on file.
    pub fn display_name(&self) -> String {
        let full = format!(
            "{} {}",
            self.name.as_deref().unwrap_or_default(),
            self.surname.as_deref().unwrap_or_default()
        );
        let full = full.trim();
        if full.is_empty() {
            self.email.clone()
        } else {
            full.to_string()
        }
    }
}

/// Sign-in input.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Tokens returned by the auth provider on sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user_email: String,
}
