use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A track of the music catalogue with its audio features
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Track {
    pub id: String,
    pub name: Option<String>,
    pub artist: Option<String>,
    pub image: Option<String>,
    pub acousticness: Option<f64>,
    pub danceability: Option<f64>,
    pub instrumentalness: Option<f64>,
    pub energy: Option<f64>,
    pub tempo: Option<f64>,
    pub valence: Option<f64>,
    pub speechiness: Option<f64>,
}

/// Catalogue entry as loaded by `/api/tracks/init`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackInfo {
    pub id: String,
    pub name: Option<String>,
    pub artist: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AudioFeatures {
    pub id: String,
    pub acousticness: Option<f64>,
    pub danceability: Option<f64>,
    pub instrumentalness: Option<f64>,
    pub energy: Option<f64>,
    pub tempo: Option<f64>,
    pub valence: Option<f64>,
    pub speechiness: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistEntry {
    pub user_id: Uuid,
    pub track_id: String,
}

/// Aggregate audio profile of a user's playlist
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct UserTaste {
    pub user_id: Uuid,
    pub acousticness: Option<f64>,
    pub danceability: Option<f64>,
    pub instrumentalness: Option<f64>,
    pub energy: Option<f64>,
    pub tempo: Option<f64>,
    pub valence: Option<f64>,
    pub speechiness: Option<f64>,
}

fn mean(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, count) = values
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

impl UserTaste {
    /// Per-feature mean over the tracks that carry that feature
    pub fn from_tracks(user_id: Uuid, tracks: &[Track]) -> Self {
        Self {
            user_id,
            acousticness: mean(tracks.iter().map(|t| t.acousticness)),
            danceability: mean(tracks.iter().map(|t| t.danceability)),
            instrumentalness: mean(tracks.iter().map(|t| t.instrumentalness)),
            energy: mean(tracks.iter().map(|t| t.energy)),
            tempo: mean(tracks.iter().map(|t| t.tempo)),
            valence: mean(tracks.iter().map(|t| t.valence)),
            speechiness: mean(tracks.iter().map(|t| t.speechiness)),
        }
    }
}
