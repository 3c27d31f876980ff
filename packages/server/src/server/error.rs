//! HTTP error responses.
//!
//! Every failure leaves the server as `{"detail": "<message>"}` with a status
//! derived from the domain error.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::common::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, detail)
    }

    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, detail)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let status = match &err {
            DomainError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DomainError::Conflict(_) => StatusCode::CONFLICT,
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::InvalidCredentials | DomainError::Unauthorized(_) => {
                StatusCode::UNAUTHORIZED
            }
            DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
            DomainError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            DomainError::Internal(e) => {
                error!(error = %e, "internal error");
                return Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            }
        };
        let detail = match err {
            // Callers only learn that the backing store is down
            DomainError::Unavailable(_) => "Database not available".to_string(),
            other => other.to_string(),
        };
        Self::new(status, detail)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (DomainError::Validation("x".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (DomainError::Conflict("x".into()), StatusCode::CONFLICT),
            (DomainError::NotFound("User".into()), StatusCode::NOT_FOUND),
            (DomainError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (DomainError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (DomainError::Unavailable("down".into()), StatusCode::SERVICE_UNAVAILABLE),
            (
                DomainError::Internal(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn test_conflict_keeps_message() {
        let err = ApiError::from(DomainError::Conflict("Email already on waitlist".into()));
        assert_eq!(err.detail, "Email already on waitlist");
    }

    #[test]
    fn test_internal_detail_is_generic() {
        let err = ApiError::from(DomainError::Internal(anyhow::anyhow!("secret path")));
        assert_eq!(err.detail, "Internal server error");
    }
}
