use axum::{extract::Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::common::UserId;
use crate::domains::social::{follow, unfollow};
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};
use crate::server::middleware::AuthUser;
use crate::server::routes::JsonBody;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowRequest {
    pub target_user_id: String,
}

fn follower(user: &AuthUser) -> ApiResult<UserId> {
    user.user_id
        .ok_or_else(|| ApiError::forbidden("Only user accounts can follow"))
}

pub async fn follow_handler(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    JsonBody(body): JsonBody<FollowRequest>,
) -> ApiResult<Json<Value>> {
    let result = follow(follower(&user)?, &body.target_user_id, &state.deps).await?;
    Ok(Json(json!({
        "message": "Successfully followed user",
        "isFollowing": result.is_following,
        "followers": result.followers,
    })))
}

pub async fn unfollow_handler(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    JsonBody(body): JsonBody<FollowRequest>,
) -> ApiResult<Json<Value>> {
    let result = unfollow(follower(&user)?, &body.target_user_id, &state.deps).await?;
    Ok(Json(json!({
        "message": "Successfully unfollowed user",
        "isFollowing": result.is_following,
        "followers": result.followers,
    })))
}
