use axum::{
    extract::State,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{FollowOutcome, FollowRequest, FollowedUser},
    routes::{
        extract::{ApiJson, ApiQuery},
        AppState,
    },
    services::follows,
};

#[derive(Debug, Deserialize)]
pub struct FollowInfoQuery {
    user_id: Uuid,
}

pub async fn follow(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<FollowRequest>,
) -> AppResult<Json<FollowOutcome>> {
    let outcome = follows::follow(state.users.as_ref(), request.user_id, request.following_id)
        .await?;
    Ok(Json(outcome))
}

pub async fn unfollow(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<FollowRequest>,
) -> AppResult<Json<FollowOutcome>> {
    let outcome = follows::unfollow(state.users.as_ref(), request.user_id, request.following_id)
        .await?;
    Ok(Json(outcome))
}

pub async fn info(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<FollowInfoQuery>,
) -> AppResult<Json<Vec<FollowedUser>>> {
    let followed = follows::following_info(state.users.as_ref(), params.user_id).await?;
    Ok(Json(followed))
}
