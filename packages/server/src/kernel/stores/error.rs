use thiserror::Error;

/// Errors from the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique index rejected the write
    #[error("duplicate {field}")]
    DuplicateKey { field: &'static str },

    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// Backend unreachable or the query failed
    #[error("store unavailable: {0}")]
    Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                let field = match db.constraint() {
                    Some(name) if name.contains("email") => "email",
                    Some(name) if name.starts_with("follows") => "follow",
                    _ => "key",
                };
                StoreError::DuplicateKey { field }
            }
            sqlx::Error::RowNotFound => StoreError::NotFound { entity: "record" },
            _ => StoreError::Unavailable(Box::new(err)),
        }
    }
}
