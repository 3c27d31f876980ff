use axum::{extract::Extension, Json};
use serde_json::{json, Value};

use crate::domains::analytics::actions::{track_event, TrackOutcome};
use crate::domains::analytics::models::NewAnalyticsEvent;
use crate::server::app::AppState;
use crate::server::error::ApiResult;
use crate::server::routes::JsonBody;

pub async fn track_handler(
    Extension(state): Extension<AppState>,
    JsonBody(event): JsonBody<NewAnalyticsEvent>,
) -> ApiResult<Json<Value>> {
    let body = match track_event(event, &state.deps).await? {
        TrackOutcome::Recorded { event_id } => json!({
            "message": "Event tracked successfully",
            "eventId": event_id,
        }),
        TrackOutcome::Skipped => json!({
            "message": "Analytics tracking skipped (database unavailable)",
        }),
    };
    Ok(Json(body))
}
