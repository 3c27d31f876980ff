//! Admin endpoints. Everything except login requires an admin token.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::common::{ContactMessageId, DomainError, Id, JobApplicationId};
use crate::domains::admin;
use crate::domains::applications::actions::update_application_status;
use crate::domains::applications::ApplicationStatus;
use crate::domains::auth::actions::admin_login;
use crate::domains::contacts::actions::set_contact_status;
use crate::domains::contacts::ContactStatus;
use crate::server::app::AppState;
use crate::server::error::ApiResult;
use crate::server::middleware::AdminUser;
use crate::server::routes::JsonBody;

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationUpdate {
    pub status: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContactUpdate {
    pub status: String,
}

fn parse_id<T>(raw: &str) -> Result<Id<T>, DomainError> {
    Id::parse(raw).map_err(|_| DomainError::Validation(format!("invalid id: {raw}")))
}

pub async fn login_handler(
    Extension(state): Extension<AppState>,
    JsonBody(body): JsonBody<AdminLoginRequest>,
) -> ApiResult<Json<Value>> {
    let token = admin_login(body.password, &state.deps).await?;
    Ok(Json(json!({
        "message": "Admin login successful",
        "token": token,
    })))
}

pub async fn stats_handler(
    _admin: AdminUser,
    Extension(state): Extension<AppState>,
) -> ApiResult<Json<Value>> {
    let stats = admin::stats(&state.deps).await?;
    Ok(Json(json!({
        "message": "Stats retrieved successfully",
        "data": stats,
    })))
}

pub async fn waitlist_handler(
    _admin: AdminUser,
    Extension(state): Extension<AppState>,
) -> ApiResult<Json<Value>> {
    let entries = admin::list_waitlist(&state.deps).await?;
    Ok(Json(json!({
        "message": "Waitlist retrieved successfully",
        "data": entries,
    })))
}

pub async fn contacts_handler(
    _admin: AdminUser,
    Extension(state): Extension<AppState>,
) -> ApiResult<Json<Value>> {
    let messages = admin::list_contacts(&state.deps).await?;
    Ok(Json(json!({
        "message": "Contact messages retrieved successfully",
        "data": messages,
    })))
}

pub async fn applications_handler(
    _admin: AdminUser,
    Extension(state): Extension<AppState>,
) -> ApiResult<Json<Value>> {
    let applications = admin::list_applications(&state.deps).await?;
    Ok(Json(json!({
        "message": "Job applications retrieved successfully",
        "data": applications,
    })))
}

pub async fn analytics_handler(
    _admin: AdminUser,
    Extension(state): Extension<AppState>,
) -> ApiResult<Json<Value>> {
    let summary = admin::analytics_summary(&state.deps).await?;
    Ok(Json(json!({
        "message": "Analytics retrieved successfully",
        "data": summary,
    })))
}

pub async fn update_application_handler(
    _admin: AdminUser,
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<ApplicationUpdate>,
) -> ApiResult<Json<Value>> {
    let id: JobApplicationId = parse_id(&id)?;
    let status: ApplicationStatus = body.status.parse().map_err(DomainError::from)?;
    let application = update_application_status(id, status, body.notes, &state.deps).await?;
    Ok(Json(json!({
        "message": "Application status updated",
        "data": application,
    })))
}

pub async fn update_contact_handler(
    _admin: AdminUser,
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<ContactUpdate>,
) -> ApiResult<Json<Value>> {
    let id: ContactMessageId = parse_id(&id)?;
    let status: ContactStatus = body.status.parse().map_err(DomainError::from)?;
    let message = set_contact_status(id, status, &state.deps).await?;
    Ok(Json(json!({
        "message": "Contact status updated",
        "data": message,
    })))
}

/// Mirror every collection now. 500 when any collection failed.
pub async fn sync_sheets_handler(
    _admin: AdminUser,
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<Value>) {
    let report = admin::resync(&state.deps).await;
    if report.success {
        (
            StatusCode::OK,
            Json(json!({
                "message": "All data synced to Google Sheets successfully",
                "data": report,
            })),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "detail": "Failed to sync data to Google Sheets",
                "data": report,
            })),
        )
    }
}
