use std::time::Duration;

use axum::{extract::Extension, http::StatusCode, Json};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

use crate::kernel::stores::StoreHealth;
use crate::server::app::AppState;

pub const API_VERSION: &str = "2.0.0";

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    database: DatabaseHealth,
    sheets_sync: &'static str,
}

#[derive(Serialize)]
pub struct DatabaseHealth {
    backend: &'static str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "Welcome to swipr.ai API",
        "version": API_VERSION,
    }))
}

pub async fn ping_handler() -> Json<Value> {
    Json(json!({
        "message": "pong",
        "timestamp": Utc::now(),
    }))
}

/// Health check endpoint
///
/// Returns 200 OK when the store answers within five seconds, 503 otherwise.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let store = &state.deps.store;
    let database = match tokio::time::timeout(Duration::from_secs(5), store.ping()).await {
        Ok(Ok(())) => DatabaseHealth {
            backend: store.backend(),
            status: "ok",
            error: None,
        },
        Ok(Err(e)) => DatabaseHealth {
            backend: store.backend(),
            status: "error",
            error: Some(e.to_string()),
        },
        Err(_) => DatabaseHealth {
            backend: store.backend(),
            status: "error",
            error: Some("Query timeout (>5s)".to_string()),
        },
    };

    let is_healthy = database.status == "ok";
    let status_code = if is_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(HealthResponse {
            status: if is_healthy { "healthy" } else { "unhealthy" },
            version: API_VERSION,
            database,
            sheets_sync: if state.deps.sync_queue.is_enabled() {
                "enabled"
            } else {
                "disabled"
            },
        }),
    )
}
