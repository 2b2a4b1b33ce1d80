use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::TrackStore,
    error::AppResult,
    models::{AudioFeatures, Track, TrackInfo, UserTaste},
};

const COLUMNS: &str = "id, name, artist, image, acousticness, danceability, instrumentalness, \
                       energy, tempo, valence, speechiness";

#[derive(Clone)]
pub struct PgTrackStore {
    pool: PgPool,
}

impl PgTrackStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl TrackStore for PgTrackStore {
    async fn upsert_tracks(&self, tracks: Vec<TrackInfo>) -> AppResult<u64> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0;

        for track in &tracks {
            let result = sqlx::query(
                "INSERT INTO tracks (id, name, artist, image) VALUES ($1, $2, $3, $4)
                 ON CONFLICT (id) DO UPDATE SET
                    name = EXCLUDED.name,
                    artist = EXCLUDED.artist,
                    image = EXCLUDED.image",
            )
            .bind(&track.id)
            .bind(&track.name)
            .bind(&track.artist)
            .bind(&track.image)
            .execute(&mut *tx)
            .await?;
            written += result.rows_affected();
        }

        tx.commit().await?;
        Ok(written)
    }

    async fn update_audio_features(&self, features: Vec<AudioFeatures>) -> AppResult<u64> {
        let mut tx = self.pool.begin().await?;
        let mut updated = 0;

        for feature in &features {
            let result = sqlx::query(
                "UPDATE tracks SET
                    acousticness = $2,
                    danceability = $3,
                    instrumentalness = $4,
                    energy = $5,
                    tempo = $6,
                    valence = $7,
                    speechiness = $8
                 WHERE id = $1",
            )
            .bind(&feature.id)
            .bind(feature.acousticness)
            .bind(feature.danceability)
            .bind(feature.instrumentalness)
            .bind(feature.energy)
            .bind(feature.tempo)
            .bind(feature.valence)
            .bind(feature.speechiness)
            .execute(&mut *tx)
            .await?;
            updated += result.rows_affected();
        }

        tx.commit().await?;
        Ok(updated)
    }

    async fn find_track(&self, id: &str) -> AppResult<Option<Track>> {
        let query = format!("SELECT {COLUMNS} FROM tracks WHERE id = $1");
        let track = sqlx::query_as::<_, Track>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(track)
    }

    async fn all_tracks(&self) -> AppResult<Vec<Track>> {
        let query = format!("SELECT {COLUMNS} FROM tracks ORDER BY id");
        let tracks = sqlx::query_as::<_, Track>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(tracks)
    }

    async fn add_to_playlist(&self, user_id: Uuid, track_id: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO user_playlist (user_id, track_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(track_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn remove_from_playlist(&self, user_id: Uuid, track_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM user_playlist WHERE user_id = $1 AND track_id = $2")
            .bind(user_id)
            .bind(track_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn playlist(&self, user_id: Uuid) -> AppResult<Vec<Track>> {
        let tracks = sqlx::query_as::<_, Track>(
            "SELECT t.id, t.name, t.artist, t.image, t.acousticness, t.danceability,
                    t.instrumentalness, t.energy, t.tempo, t.valence, t.speechiness
             FROM user_playlist p
             JOIN tracks t ON t.id = p.track_id
             WHERE p.user_id = $1
             ORDER BY p.added_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tracks)
    }

    async fn save_taste(&self, taste: UserTaste) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO user_taste (user_id, acousticness, danceability, instrumentalness,
                                     energy, tempo, valence, speechiness)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (user_id) DO UPDATE SET
                acousticness = EXCLUDED.acousticness,
                danceability = EXCLUDED.danceability,
                instrumentalness = EXCLUDED.instrumentalness,
                energy = EXCLUDED.energy,
                tempo = EXCLUDED.tempo,
                valence = EXCLUDED.valence,
                speechiness = EXCLUDED.speechiness",
        )
        .bind(taste.user_id)
        .bind(taste.acousticness)
        .bind(taste.danceability)
        .bind(taste.instrumentalness)
        .bind(taste.energy)
        .bind(taste.tempo)
        .bind(taste.valence)
        .bind(taste.speechiness)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn taste(&self, user_id: Uuid) -> AppResult<Option<UserTaste>> {
        let taste = sqlx::query_as::<_, UserTaste>(
            "SELECT user_id, acousticness, danceability, instrumentalness, energy, tempo,
                    valence, speechiness
             FROM user_taste WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(taste)
    }
}
