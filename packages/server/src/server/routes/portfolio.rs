use std::collections::HashMap;

use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domains::portfolio::{optimize, simulate, SimulationMode};
use crate::server::error::ApiResult;
use crate::server::routes::JsonBody;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    pub risk_level: String,
    pub amount: f64,
}

#[derive(Debug, Deserialize)]
pub struct SimulateRequest {
    pub allocation: HashMap<String, f64>,
    #[serde(default)]
    pub timeframe: Option<u32>,
    #[serde(default)]
    pub mode: SimulationMode,
}

pub async fn optimize_handler(
    JsonBody(body): JsonBody<OptimizeRequest>,
) -> ApiResult<Json<Value>> {
    let mut rng = fastrand::Rng::new();
    let result = optimize(&body.risk_level, body.amount, &mut rng)?;
    Ok(Json(json!({
        "message": "Portfolio optimized successfully",
        "data": result,
    })))
}

pub async fn simulate_handler(
    JsonBody(body): JsonBody<SimulateRequest>,
) -> ApiResult<Json<Value>> {
    let mut rng = fastrand::Rng::new();
    let result = simulate(body.allocation, body.timeframe, body.mode, &mut rng)?;
    Ok(Json(json!({
        "message": "Portfolio simulation completed",
        "data": result,
    })))
}
