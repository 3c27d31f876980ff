use axum::{extract::Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domains::chat::chat;
use crate::server::app::AppState;
use crate::server::error::ApiResult;
use crate::server::routes::JsonBody;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

pub async fn chat_handler(
    Extension(state): Extension<AppState>,
    JsonBody(body): JsonBody<ChatRequest>,
) -> ApiResult<Json<Value>> {
    let reply = chat(body.message, body.session_id, &state.deps).await?;
    Ok(Json(json!({
        "message": "Chat response generated",
        "data": reply,
    })))
}
