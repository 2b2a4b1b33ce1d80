use uuid::Uuid;

use crate::{
    db::{TrackStore, UserStore},
    error::{AppError, AppResult},
    models::{AudioFeatures, Track, TrackInfo, UserTaste},
};

pub async fn init_tracks(tracks: &dyn TrackStore, infos: Vec<TrackInfo>) -> AppResult<u64> {
    if let Some(blank) = infos.iter().find(|t| t.id.trim().is_empty()) {
        return Err(AppError::InvalidInput(format!(
            "Track id must not be blank (name: {:?})",
            blank.name
        )));
    }

    let written = tracks.upsert_tracks(infos).await?;
    tracing::info!(written, "Track catalogue loaded");
    Ok(written)
}

/// Updates features of tracks already in the catalogue; unknown ids are skipped
pub async fn update_audio_features(
    tracks: &dyn TrackStore,
    features: Vec<AudioFeatures>,
) -> AppResult<u64> {
    let submitted = features.len();
    let updated = tracks.update_audio_features(features).await?;
    if (updated as usize) < submitted {
        tracing::warn!(submitted, updated, "Audio features submitted for unknown tracks");
    }
    Ok(updated)
}

pub async fn all_tracks(tracks: &dyn TrackStore) -> AppResult<Vec<Track>> {
    tracks.all_tracks().await
}

async fn refresh_taste(tracks: &dyn TrackStore, user_id: Uuid) -> AppResult<UserTaste> {
    let playlist = tracks.playlist(user_id).await?;
    let taste = UserTaste::from_tracks(user_id, &playlist);
    tracks.save_taste(taste.clone()).await?;
    tracing::debug!(user_id = %user_id, tracks = playlist.len(), "Taste recomputed");
    Ok(taste)
}

/// Adds a track to the playlist and recomputes the user's taste
pub async fn add_to_playlist(
    users: &dyn UserStore,
    tracks: &dyn TrackStore,
    user_id: Uuid,
    track_id: &str,
) -> AppResult<UserTaste> {
    if users.find_by_id(user_id).await?.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    if tracks.find_track(track_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Track {} not found", track_id)));
    }

    if !tracks.add_to_playlist(user_id, track_id).await? {
        tracing::debug!(user_id = %user_id, track_id = %track_id, "Track already in playlist");
    }

    refresh_taste(tracks, user_id).await
}

/// Removes a track from the playlist and recomputes the user's taste
pub async fn remove_from_playlist(
    tracks: &dyn TrackStore,
    user_id: Uuid,
    track_id: &str,
) -> AppResult<UserTaste> {
    if !tracks.remove_from_playlist(user_id, track_id).await? {
        return Err(AppError::NotFound(
            "Track is not in the user's playlist".to_string(),
        ));
    }

    refresh_taste(tracks, user_id).await
}

pub async fn playlist(tracks: &dyn TrackStore, user_id: Uuid) -> AppResult<Vec<Track>> {
    tracks.playlist(user_id).await
}

pub async fn taste(tracks: &dyn TrackStore, user_id: Uuid) -> AppResult<UserTaste> {
    tracks
        .taste(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No taste recorded for this user".to_string()))
}
