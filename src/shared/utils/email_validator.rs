use crate::domain::errors::{DomainError, DomainResult};
use email_address::EmailAddress;
use std::str::FromStr;

/// Trim, validate and lowercase a login email.
///
/// Worker records are matched case-insensitively, so the lowercase form is
/// what gets sent to the auth provider.
pub fn validate_and_normalize_email(email: &str) -> DomainResult<String> {
    let candidate = email.trim();
    if candidate.is_empty() {
        return Err(DomainError::ValidationError("Email is required".to_string()));
    }

    let parsed = EmailAddress::from_str(candidate).map_err(|e| {
        DomainError::ValidationError(format!("Invalid email {:?}: {}", candidate, e))
    })?;

    if !parsed.domain().contains('.') {
        return Err(DomainError::ValidationError(format!(
            "Invalid email {:?}: domain has no TLD",
            candidate
        )));
    }

    Ok(parsed.as_str().to_lowercase())
}
