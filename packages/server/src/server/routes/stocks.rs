use axum::{extract::Path, Json};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domains::stocks::{all_quotes, stock_detail, swipe, SwipeDirection};
use crate::server::error::ApiResult;
use crate::server::middleware::AuthUser;
use crate::server::routes::JsonBody;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeRequest {
    pub symbol: String,
    pub direction: SwipeDirection,
    #[serde(default)]
    pub user_id: Option<String>,
}

pub async fn prices_handler() -> Json<Value> {
    Json(json!({
        "message": "Stock prices retrieved successfully",
        "data": all_quotes(),
        "timestamp": Utc::now(),
    }))
}

pub async fn detail_handler(Path(symbol): Path<String>) -> ApiResult<Json<Value>> {
    let detail = stock_detail(&symbol)?;
    Ok(Json(json!({
        "message": "Stock data retrieved successfully",
        "data": detail,
    })))
}

/// A signed-in caller's id wins over the `userId` in the body.
pub async fn swipe_handler(
    auth: Option<AuthUser>,
    JsonBody(body): JsonBody<SwipeRequest>,
) -> ApiResult<Json<Value>> {
    let user_id = auth
        .and_then(|user| user.user_id.map(|id| id.to_string()))
        .or(body.user_id);
    let outcome = swipe(&body.symbol, body.direction, user_id)?;

    let verb = match body.direction {
        SwipeDirection::Right => "invested in",
        SwipeDirection::Left => "passed on",
    };
    Ok(Json(json!({
        "message": format!("Successfully {} {}", verb, outcome.swipe.symbol),
        "swipe": outcome.swipe,
        "portfolioUpdate": outcome.portfolio_update,
    })))
}
