/// Utility modules
pub mod email_validator;
