use axum::{
    extract::State,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{PlaylistEntry, UserTaste},
    routes::{
        extract::{ApiJson, ApiPath},
        tracks::TracksResponse,
        AppState,
    },
    services::tracks,
};

pub async fn add(
    State(state): State<AppState>,
    ApiJson(entry): ApiJson<PlaylistEntry>,
) -> AppResult<Json<Value>> {
    let taste = tracks::add_to_playlist(
        state.users.as_ref(),
        state.tracks.as_ref(),
        entry.user_id,
        &entry.track_id,
    )
    .await?;
    Ok(Json(json!({
        "message": "Track added to playlist successfully",
        "taste": taste,
    })))
}

pub async fn delete(
    State(state): State<AppState>,
    ApiJson(entry): ApiJson<PlaylistEntry>,
) -> AppResult<Json<Value>> {
    let taste =
        tracks::remove_from_playlist(state.tracks.as_ref(), entry.user_id, &entry.track_id)
            .await?;
    Ok(Json(json!({
        "message": "Track removed from playlist successfully",
        "taste": taste,
    })))
}

pub async fn user_tracks(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> AppResult<Json<TracksResponse>> {
    let tracks = tracks::playlist(state.tracks.as_ref(), user_id).await?;
    Ok(Json(TracksResponse { tracks }))
}

pub async fn taste(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> AppResult<Json<UserTaste>> {
    let taste = tracks::taste(state.tracks.as_ref(), user_id).await?;
    Ok(Json(taste))
}
