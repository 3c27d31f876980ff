//! Login actions

use tracing::{info, warn};

use super::register::AuthSession;
use crate::common::{DomainError, DomainResult};
use crate::domains::auth::models::UserView;
use crate::domains::auth::password::verify_password;
use crate::kernel::stores::UserStore;
use crate::kernel::ServerDeps;

/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn login(email: String, password: String, deps: &ServerDeps) -> DomainResult<AuthSession> {
    let user = deps
        .store
        .find_user_by_email(&email)
        .await?
        .ok_or(DomainError::InvalidCredentials)?;

    if !verify_password(password, user.password_hash.clone()).await {
        warn!(user_id = %user.id, "login rejected: bad password");
        return Err(DomainError::InvalidCredentials);
    }

    let token = deps.jwt_service.create_user_token(user.id, &user.email)?;
    info!(user_id = %user.id, "user logged in");

    Ok(AuthSession {
        token,
        user: UserView::from(&user),
    })
}

/// Exchange the shared admin password for an admin-role token.
pub async fn admin_login(password: String, deps: &ServerDeps) -> DomainResult<String> {
    if deps.admin_password.is_empty() || password != deps.admin_password {
        warn!("admin login rejected");
        return Err(DomainError::Unauthorized(
            "Invalid admin password".to_string(),
        ));
    }
    let token = deps.jwt_service.create_admin_token()?;
    info!("admin logged in");
    Ok(token)
}
