//! Public contact and job application forms.

use axum::{extract::Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domains::applications::actions::submit_application;
use crate::domains::applications::models::NewJobApplication;
use crate::domains::contacts::actions::submit_contact;
use crate::server::app::AppState;
use crate::server::error::ApiResult;
use crate::server::routes::JsonBody;

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub position: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub cover_letter: String,
    #[serde(default)]
    pub resume_url: String,
}

pub async fn contact_handler(
    Extension(state): Extension<AppState>,
    JsonBody(body): JsonBody<ContactRequest>,
) -> ApiResult<Json<Value>> {
    let message = submit_contact(body.name, body.email, body.message, &state.deps).await?;
    Ok(Json(json!({
        "message": "Message sent successfully",
        "id": message.id,
    })))
}

pub async fn apply_handler(
    Extension(state): Extension<AppState>,
    JsonBody(body): JsonBody<ApplyRequest>,
) -> ApiResult<Json<Value>> {
    let application = submit_application(
        NewJobApplication {
            position: body.position,
            name: body.name,
            email: body.email,
            phone: body.phone,
            cover_letter: body.cover_letter,
            resume_url: body.resume_url,
        },
        &state.deps,
    )
    .await?;
    Ok(Json(json!({
        "message": "Application submitted successfully",
        "applicationId": application.id,
    })))
}
