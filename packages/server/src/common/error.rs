use thiserror::Error;

use crate::kernel::stores::StoreError;

/// Errors surfaced by domain actions.
///
/// The request layer maps each variant onto an HTTP status.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey { field } => {
                DomainError::Conflict(format!("{field} already exists"))
            }
            StoreError::NotFound { entity } => DomainError::NotFound(entity.to_string()),
            StoreError::Unavailable(source) => DomainError::Unavailable(source.to_string()),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

/// A status string read from storage or a request that names no known variant.
#[derive(Debug, Error)]
#[error("invalid {kind}: {value}")]
pub struct ParseStatusError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseStatusError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

impl From<ParseStatusError> for DomainError {
    fn from(err: ParseStatusError) -> Self {
        DomainError::Validation(err.to_string())
    }
}
