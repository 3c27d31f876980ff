//! Input validation shared by the request-handling domains.

use lazy_static::lazy_static;
use regex::Regex;

use super::error::DomainError;

pub const MIN_PASSWORD_LEN: usize = 8;

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

pub fn require_email(email: &str) -> Result<(), DomainError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(DomainError::Validation(format!("invalid email address: {email}")))
    }
}

/// Rejects empty or whitespace-only values.
pub fn require_non_empty(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        Err(DomainError::Validation(format!("{field} must not be empty")))
    } else {
        Ok(())
    }
}

pub fn require_password(password: &str) -> Result<(), DomainError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
