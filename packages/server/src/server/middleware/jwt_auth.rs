use crate::common::UserId;
use crate::domains::auth::{JwtService, Role};
use crate::server::error::ApiError;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

/// Authenticated caller information from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub subject: String,
    /// `None` for admin tokens
    pub user_id: Option<UserId>,
    pub email: Option<String>,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// An `AuthUser` holding the admin role.
#[derive(Clone, Debug)]
pub struct AdminUser(pub AuthUser);

/// JWT authentication middleware
///
/// Verifies the Authorization header and adds AuthUser to request extensions.
/// Requests without a valid token continue unauthenticated; handlers that
/// need a caller extract `AuthUser` or `AdminUser`.
pub async fn jwt_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    if let Some(user) = extract_auth_user(&request, &jwt_service) {
        debug!(subject = %user.subject, admin = user.is_admin(), "authenticated request");
        request.extensions_mut().insert(user);
    }

    next.run(request).await
}

/// Extract and verify JWT token from request
fn extract_auth_user(
    request: &axum::http::Request<axum::body::Body>,
    jwt_service: &JwtService,
) -> Option<AuthUser> {
    let auth_header = request.headers().get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;

    // Extract token (handle both "Bearer <token>" and raw token)
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str);

    let claims = jwt_service.verify_token(token).ok()?;

    Some(AuthUser {
        subject: claims.sub,
        user_id: claims.user_id,
        email: claims.email,
        role: claims.role,
    })
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Not authenticated"))
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(ApiError::forbidden("Admin access required"));
        }
        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new("test_secret", "test_issuer".to_string())
    }

    #[test]
    fn test_extract_token_with_bearer() {
        let jwt_service = service();
        let user_id = UserId::new();
        let token = jwt_service.create_user_token(user_id, "a@x.com").unwrap();

        let request = axum::http::Request::builder()
            .header("authorization", format!("Bearer {}", token))
            .body(axum::body::Body::empty())
            .unwrap();

        let auth_user = extract_auth_user(&request, &jwt_service).unwrap();
        assert_eq!(auth_user.user_id, Some(user_id));
        assert_eq!(auth_user.email.as_deref(), Some("a@x.com"));
        assert!(!auth_user.is_admin());
    }

    #[test]
    fn test_extract_token_without_bearer() {
        let jwt_service = service();
        let token = jwt_service.create_admin_token().unwrap();

        let request = axum::http::Request::builder()
            .header("authorization", token)
            .body(axum::body::Body::empty())
            .unwrap();

        let auth_user = extract_auth_user(&request, &jwt_service).unwrap();
        assert!(auth_user.is_admin());
        assert!(auth_user.user_id.is_none());
    }

    #[test]
    fn test_no_auth_header() {
        let jwt_service = service();
        let request = axum::http::Request::builder()
            .body(axum::body::Body::empty())
            .unwrap();

        assert!(extract_auth_user(&request, &jwt_service).is_none());
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let other = JwtService::new("other_secret", "test_issuer".to_string());
        let token = other.create_admin_token().unwrap();
        let request = axum::http::Request::builder()
            .header("authorization", format!("Bearer {}", token))
            .body(axum::body::Body::empty())
            .unwrap();

        assert!(extract_auth_user(&request, &service()).is_none());
    }
}
