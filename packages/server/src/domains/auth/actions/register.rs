//! Register action

use serde::Serialize;
use tracing::info;

use crate::common::validation::{require_email, require_non_empty, require_password};
use crate::common::{DomainError, DomainResult};
use crate::domains::auth::models::{NewUser, UserView};
use crate::domains::auth::password::hash_password;
use crate::kernel::stores::{StoreError, UserStore};
use crate::kernel::ServerDeps;

/// Token plus the public view of the authenticated user
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub user: UserView,
}

/// Create an account and sign the user in.
pub async fn register(
    email: String,
    password: String,
    name: String,
    deps: &ServerDeps,
) -> DomainResult<AuthSession> {
    require_email(&email)?;
    require_password(&password)?;
    require_non_empty("name", &name)?;

    if deps.store.find_user_by_email(&email).await?.is_some() {
        return Err(DomainError::Conflict("User already exists".to_string()));
    }

    let password_hash = hash_password(password).await?;
    let user = match deps
        .store
        .insert_user(NewUser {
            email,
            name,
            password_hash,
        })
        .await
    {
        Ok(user) => user,
        // Lost a race with a concurrent registration
        Err(StoreError::DuplicateKey { .. }) => {
            return Err(DomainError::Conflict("User already exists".to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    let token = deps.jwt_service.create_user_token(user.id, &user.email)?;
    info!(user_id = %user.id, "user registered");

    Ok(AuthSession {
        token,
        user: UserView::from(&user),
    })
}
