use crate::domain::entities::Worker;
use serde::Serialize;

/// Session state of the signed-in worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum AuthState {
    Loading,
    Authenticated(Worker),
    Unauthenticated,
    Error(String),
}

impl Default for AuthState {
    fn default() -> Self {
        AuthState::Loading
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    Start,
    Success(Worker),
    Failure(String),
    Logout,
    ClearError,
}

impl AuthState {
    /// Apply a transition. Every (state, event) pair has a defined result.
    pub fn apply(self, event: AuthEvent) -> AuthState {
        match (self, event) {
            (_, AuthEvent::Start) => AuthState::Loading,
            (_, AuthEvent::Success(worker)) => AuthState::Authenticated(worker),
            (_, AuthEvent::Failure(message)) if message.is_empty() => AuthState::Unauthenticated,
            (_, AuthEvent::Failure(message)) => AuthState::Error(message),
            (_, AuthEvent::Logout) => AuthState::Unauthenticated,
            (AuthState::Error(_), AuthEvent::ClearError) => AuthState::Unauthenticated,
            (state, AuthEvent::ClearError) => state,
        }
    }

    pub fn worker(&self) -> Option<&Worker> {
        match self {
            AuthState::Authenticated(worker) => Some(worker),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, AuthState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AuthState::Error(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worker() -> Worker {
        Worker::new("w1", "ana@sadlas.es")
    }

    fn all_states() -> Vec<AuthState> {
        vec![
            AuthState::Loading,
            AuthState::Authenticated(worker()),
            AuthState::Unauthenticated,
            AuthState::Error("boom".to_string()),
        ]
    }

    #[test]
    fn test_initial_state_is_loading() {
        assert!(AuthState::default().is_loading());
    }

    #[test]
    fn test_start_always_loads() {
        for state in all_states() {
            assert_eq!(state.apply(AuthEvent::Start), AuthState::Loading);
        }
    }

    #[test]
    fn test_success_authenticates() {
        let state = AuthState::Loading.apply(AuthEvent::Success(worker()));
        assert!(state.is_authenticated());
        assert_eq!(state.worker().map(|w| w.id.as_str()), Some("w1"));
    }

    #[test]
    fn test_failure_with_message_is_error() {
        let state =
            AuthState::Loading.apply(AuthEvent::Failure("Credenciales inválidas".to_string()));
        assert_eq!(state.error(), Some("Credenciales inválidas"));
    }

    #[test]
    fn test_failure_without_message_is_unauthenticated() {
        let state = AuthState::Loading.apply(AuthEvent::Failure(String::new()));
        assert_eq!(state, AuthState::Unauthenticated);
    }

    #[test]
    fn test_logout_from_any_state() {
        for state in all_states() {
            assert_eq!(state.apply(AuthEvent::Logout), AuthState::Unauthenticated);
        }
    }

    #[test]
    fn test_clear_error_only_affects_error_state() {
        assert_eq!(
            AuthState::Error("x".to_string()).apply(AuthEvent::ClearError),
            AuthState::Unauthenticated
        );
        assert_eq!(AuthState::Loading.apply(AuthEvent::ClearError), AuthState::Loading);
        let authenticated = AuthState::Authenticated(worker());
        assert_eq!(authenticated.clone().apply(AuthEvent::ClearError), authenticated);
    }
}
