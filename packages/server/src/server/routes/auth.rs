use axum::{extract::Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domains::auth::actions::{login, register};
use crate::server::app::AppState;
use crate::server::error::ApiResult;
use crate::server::routes::JsonBody;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn register_handler(
    Extension(state): Extension<AppState>,
    JsonBody(body): JsonBody<RegisterRequest>,
) -> ApiResult<Json<Value>> {
    let session = register(body.email, body.password, body.name, &state.deps).await?;
    Ok(Json(json!({
        "message": "User created successfully",
        "token": session.token,
        "user": session.user,
    })))
}

pub async fn login_handler(
    Extension(state): Extension<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> ApiResult<Json<Value>> {
    let session = login(body.email, body.password, &state.deps).await?;
    Ok(Json(json!({
        "message": "Login successful",
        "token": session.token,
        "user": session.user,
    })))
}
