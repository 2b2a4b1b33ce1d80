use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    models::{AudioFeatures, Track, TrackInfo},
    routes::{extract::ApiJson, AppState},
    services::tracks,
};

#[derive(Debug, Serialize)]
pub struct TracksResponse {
    pub tracks: Vec<Track>,
}

pub async fn init(
    State(state): State<AppState>,
    ApiJson(infos): ApiJson<Vec<TrackInfo>>,
) -> AppResult<Json<Value>> {
    let written = tracks::init_tracks(state.tracks.as_ref(), infos).await?;
    Ok(Json(json!({
        "message": "Tracks inserted successfully",
        "written": written,
    })))
}

pub async fn audio_features(
    State(state): State<AppState>,
    ApiJson(features): ApiJson<Vec<AudioFeatures>>,
) -> AppResult<Json<Value>> {
    let updated = tracks::update_audio_features(state.tracks.as_ref(), features).await?;
    Ok(Json(json!({
        "message": "Audio features updated successfully",
        "updated": updated,
    })))
}

pub async fn all(State(state): State<AppState>) -> AppResult<Json<TracksResponse>> {
    let tracks = tracks::all_tracks(state.tracks.as_ref()).await?;
    Ok(Json(TracksResponse { tracks }))
}
