//! Follow graph actions

use serde::Serialize;
use tracing::info;

use crate::common::{DomainError, DomainResult, UserId};
use crate::kernel::stores::{FollowStore, UserStore};
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowState {
    pub target_user_id: UserId,
    pub is_following: bool,
    pub followers: i64,
}

async fn resolve_target(
    follower: UserId,
    target_user_id: &str,
    deps: &ServerDeps,
) -> DomainResult<UserId> {
    let target = UserId::parse(target_user_id)
        .map_err(|_| DomainError::Validation("targetUserId must be a user id".to_string()))?;
    if target == follower {
        return Err(DomainError::Validation(
            "Users cannot follow themselves".to_string(),
        ));
    }
    if deps.store.find_user(target).await?.is_none() {
        return Err(DomainError::NotFound("User".to_string()));
    }
    Ok(target)
}

/// Following twice is not an error.
pub async fn follow(
    follower: UserId,
    target_user_id: &str,
    deps: &ServerDeps,
) -> DomainResult<FollowState> {
    let target = resolve_target(follower, target_user_id, deps).await?;
    if deps.store.insert_follow(follower, target).await? {
        info!(follower = %follower, target = %target, "followed user");
    }
    Ok(FollowState {
        target_user_id: target,
        is_following: true,
        followers: deps.store.count_followers(target).await?,
    })
}

pub async fn unfollow(
    follower: UserId,
    target_user_id: &str,
    deps: &ServerDeps,
) -> DomainResult<FollowState> {
    let target = resolve_target(follower, target_user_id, deps).await?;
    if deps.store.delete_follow(follower, target).await? {
        info!(follower = %follower, target = %target, "unfollowed user");
    }
    Ok(FollowState {
        target_user_id: target,
        is_following: false,
        followers: deps.store.count_followers(target).await?,
    })
}
