use axum::{extract::Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domains::waitlist::actions::join_waitlist;
use crate::server::app::AppState;
use crate::server::error::ApiResult;
use crate::server::routes::JsonBody;

#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub interests: Vec<String>,
}

pub async fn join_handler(
    Extension(state): Extension<AppState>,
    JsonBody(body): JsonBody<JoinRequest>,
) -> ApiResult<Json<Value>> {
    let receipt = join_waitlist(body.email, body.name, body.interests, &state.deps).await?;
    Ok(Json(json!({
        "message": "Successfully added to waitlist",
        "position": receipt.position,
        "id": receipt.id,
    })))
}
