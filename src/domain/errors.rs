use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Not authenticated")]
    Unauthenticated,
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

/// Reasons a stored schedule blob cannot be turned into a `WeeklySchedule`.
///
/// These never leave the schedule core: resolution degrades to an empty slot
/// list instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Malformed schedule JSON: {0}")]
    MalformedJson(String),
    #[error("Schedule must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}
