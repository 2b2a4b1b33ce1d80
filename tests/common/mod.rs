//! In-memory backends for driving the router without PostgreSQL, Redis,
//! SMTP or TMDb.
#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum_test::TestServer;
use chrono::Utc;
use serde_json::{json, Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use cinetalk_api::{
    auth::jwt::JwtConfig,
    db::{SimilarityStore, TrackStore, UserStore, VerificationStore},
    error::{AppError, AppResult},
    models::{
        AudioFeatures, EmailVerification, NewUser, SimilarityDocument, Track, TrackInfo,
        TmdbCredits, TmdbMovieDetails, TmdbVideo, User, UserChanges, UserTaste,
    },
    routes::{create_router, AppState},
    services::{
        mailer::{MailMessage, Mailer},
        tmdb::MovieProvider,
    },
};

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
    following: RwLock<BTreeSet<(Uuid, Uuid)>>,
}

impl MemoryUserStore {
    pub async fn following_count(&self) -> usize {
        self.following.read().await.len()
    }
}

#[async_trait::async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_nickname(&self, nickname: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.nickname == nickname)
            .cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> AppResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    async fn insert(&self, user: NewUser) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("Email is already registered".to_string()));
        }
        let created = User {
            id: Uuid::new_v4(),
            email: user.email,
            nickname: user.nickname,
            password_hash: user.password_hash,
            profile_image: None,
            movie_list: vec![],
            created_at: Utc::now(),
        };
        users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<Option<User>> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(nickname) = changes.nickname {
            user.nickname = nickname;
        }
        if let Some(hash) = changes.password_hash {
            user.password_hash = hash;
        }
        if let Some(image) = changes.profile_image {
            user.profile_image = image;
        }
        if let Some(movies) = changes.movie_list {
            user.movie_list = movies;
        }
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let removed = self.users.write().await.remove(&id).is_some();
        self.following
            .write()
            .await
            .retain(|(a, b)| *a != id && *b != id);
        Ok(removed)
    }

    async fn is_following(&self, follower: Uuid, followee: Uuid) -> AppResult<bool> {
        Ok(self.following.read().await.contains(&(follower, followee)))
    }

    async fn insert_following(&self, follower: Uuid, followee: Uuid) -> AppResult<bool> {
        Ok(self.following.write().await.insert((follower, followee)))
    }

    async fn delete_following(&self, follower: Uuid, followee: Uuid) -> AppResult<bool> {
        Ok(self.following.write().await.remove(&(follower, followee)))
    }

    async fn list_following(&self, follower: Uuid) -> AppResult<Vec<User>> {
        let following = self.following.read().await;
        let users = self.users.read().await;
        Ok(following
            .iter()
            .filter(|(a, _)| *a == follower)
            .filter_map(|(_, b)| users.get(b).cloned())
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryTrackStore {
    tracks: RwLock<HashMap<String, Track>>,
    playlists: RwLock<BTreeSet<(Uuid, String)>>,
    tastes: RwLock<HashMap<Uuid, UserTaste>>,
}

#[async_trait::async_trait]
impl TrackStore for MemoryTrackStore {
    async fn upsert_tracks(&self, infos: Vec<TrackInfo>) -> AppResult<u64> {
        let mut tracks = self.tracks.write().await;
        let count = infos.len() as u64;
        for info in infos {
            let entry = tracks.entry(info.id.clone()).or_insert_with(|| Track {
                id: info.id.clone(),
                name: None,
                artist: None,
                image: None,
                acousticness: None,
                danceability: None,
                instrumentalness: None,
                energy: None,
                tempo: None,
                valence: None,
                speechiness: None,
            });
            entry.name = info.name;
            entry.artist = info.artist;
            entry.image = info.image;
        }
        Ok(count)
    }

    async fn update_audio_features(&self, features: Vec<AudioFeatures>) -> AppResult<u64> {
        let mut tracks = self.tracks.write().await;
        let mut updated = 0;
        for f in features {
            if let Some(track) = tracks.get_mut(&f.id) {
                track.acousticness = f.acousticness;
                track.danceability = f.danceability;
                track.instrumentalness = f.instrumentalness;
                track.energy = f.energy;
                track.tempo = f.tempo;
                track.valence = f.valence;
                track.speechiness = f.speechiness;
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn find_track(&self, id: &str) -> AppResult<Option<Track>> {
        Ok(self.tracks.read().await.get(id).cloned())
    }

    async fn all_tracks(&self) -> AppResult<Vec<Track>> {
        let mut all: Vec<Track> = self.tracks.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }

    async fn add_to_playlist(&self, user_id: Uuid, track_id: &str) -> AppResult<bool> {
        Ok(self
            .playlists
            .write()
            .await
            .insert((user_id, track_id.to_string())))
    }

    async fn remove_from_playlist(&self, user_id: Uuid, track_id: &str) -> AppResult<bool> {
        Ok(self
            .playlists
            .write()
            .await
            .remove(&(user_id, track_id.to_string())))
    }

    async fn playlist(&self, user_id: Uuid) -> AppResult<Vec<Track>> {
        let playlists = self.playlists.read().await;
        let tracks = self.tracks.read().await;
        Ok(playlists
            .iter()
            .filter(|(user, _)| *user == user_id)
            .filter_map(|(_, id)| tracks.get(id).cloned())
            .collect())
    }

    async fn save_taste(&self, taste: UserTaste) -> AppResult<()> {
        self.tastes.write().await.insert(taste.user_id, taste);
        Ok(())
    }

    async fn taste(&self, user_id: Uuid) -> AppResult<Option<UserTaste>> {
        Ok(self.tastes.read().await.get(&user_id).cloned())
    }
}

/// Similarity rows keyed by (collection, target)
#[derive(Default)]
pub struct MemorySimilarityStore {
    documents: RwLock<HashMap<(String, String), Map<String, Value>>>,
}

impl MemorySimilarityStore {
    pub async fn put(&self, collection: &str, target: &str, scores: Value) {
        let scores = scores.as_object().cloned().unwrap_or_default();
        self.documents
            .write()
            .await
            .insert((collection.to_string(), target.to_string()), scores);
    }
}

#[async_trait::async_trait]
impl SimilarityStore for MemorySimilarityStore {
    async fn collection_exists(&self, collection: &str) -> AppResult<bool> {
        Ok(self
            .documents
            .read()
            .await
            .keys()
            .any(|(c, _)| c == collection))
    }

    async fn find_document(
        &self,
        collection: &str,
        target: &str,
    ) -> AppResult<Option<SimilarityDocument>> {
        Ok(self
            .documents
            .read()
            .await
            .get(&(collection.to_string(), target.to_string()))
            .map(|scores| SimilarityDocument {
                collection: collection.to_string(),
                target: target.to_string(),
                scores: sqlx::types::Json(scores.clone()),
            }))
    }
}

#[derive(Default)]
pub struct MemoryVerificationStore {
    records: RwLock<HashMap<String, EmailVerification>>,
}

#[async_trait::async_trait]
impl VerificationStore for MemoryVerificationStore {
    async fn replace(&self, record: EmailVerification, _ttl_seconds: u64) -> AppResult<()> {
        self.records
            .write()
            .await
            .insert(record.email.clone(), record);
        Ok(())
    }

    async fn find(&self, email: &str) -> AppResult<Option<EmailVerification>> {
        Ok(self.records.read().await.get(email).cloned())
    }

    async fn remove(&self, email: &str) -> AppResult<()> {
        self.records.write().await.remove(email);
        Ok(())
    }
}

/// Keeps every message instead of sending it
///
/// With `failing` set every send is rejected like an unreachable relay.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: RwLock<Vec<(String, MailMessage)>>,
    pub failing: AtomicBool,
}

impl RecordingMailer {
    pub async fn last_to(&self, to: &str) -> Option<MailMessage> {
        self.sent
            .read()
            .await
            .iter()
            .rev()
            .find(|(recipient, _)| recipient == to)
            .map(|(_, message)| message.clone())
    }
}

#[async_trait::async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, message: MailMessage) -> AppResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::Mail("relay unreachable".to_string()));
        }
        self.sent.write().await.push((to.to_string(), message));
        Ok(())
    }
}

/// Fixed catalogue: 603 is fully described, 604 has failing credits
pub struct StaticMovieProvider;

#[async_trait::async_trait]
impl MovieProvider for StaticMovieProvider {
    async fn search(&self, _query: &str, _page: u32) -> AppResult<Vec<Map<String, Value>>> {
        Ok([603, 604]
            .into_iter()
            .map(|id| {
                json!({ "id": id, "title": format!("Movie {}", id) })
                    .as_object()
                    .cloned()
                    .unwrap_or_default()
            })
            .collect())
    }

    async fn credits(&self, movie_id: i64) -> AppResult<TmdbCredits> {
        if movie_id != 603 {
            return Err(AppError::ExternalApi("credits unavailable".to_string()));
        }
        serde_json::from_value(json!({
            "cast": [
                { "id": 6384, "name": "Keanu Reeves", "character": "Neo" },
                { "id": 1, "name": "Uncredited", "character": "" }
            ],
            "crew": [{ "id": 9340, "name": "Lana Wachowski", "job": "Director" }]
        }))
        .map_err(|e| AppError::Internal(e.to_string()))
    }

    async fn details(&self, _movie_id: i64) -> AppResult<TmdbMovieDetails> {
        serde_json::from_value(json!({
            "genres": [{ "name": "Action" }, { "name": "Science Fiction" }],
            "production_countries": [{ "name": "United States of America" }]
        }))
        .map_err(|e| AppError::Internal(e.to_string()))
    }

    async fn videos(&self, movie_id: i64) -> AppResult<Vec<TmdbVideo>> {
        if movie_id != 603 {
            return Ok(vec![]);
        }
        serde_json::from_value(json!([
            { "key": "vimeo", "site": "Vimeo", "type": "Trailer" },
            { "key": "vKQi3bBA1y8", "site": "YouTube", "type": "Trailer" }
        ]))
        .map_err(|e| AppError::Internal(e.to_string()))
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub users: Arc<MemoryUserStore>,
    pub similarity: Arc<MemorySimilarityStore>,
    pub mailer: Arc<RecordingMailer>,
    pub upload_dir: tempfile::TempDir,
}

pub fn create_test_app() -> TestApp {
    let users = Arc::new(MemoryUserStore::default());
    let similarity = Arc::new(MemorySimilarityStore::default());
    let mailer = Arc::new(RecordingMailer::default());
    let upload_dir = tempfile::tempdir().expect("temp dir");

    let state = AppState {
        users: users.clone(),
        tracks: Arc::new(MemoryTrackStore::default()),
        similarity: similarity.clone(),
        verification: Arc::new(MemoryVerificationStore::default()),
        mailer: mailer.clone(),
        movies: Arc::new(StaticMovieProvider),
        jwt: JwtConfig {
            secret: "integration-secret".to_string(),
            access_token_expiry_mins: 120,
        },
        upload_dir: PathBuf::from(upload_dir.path()),
    };

    TestApp {
        server: TestServer::new(create_router(state)).expect("test server"),
        users,
        similarity,
        mailer,
        upload_dir,
    }
}

/// Registers an account through the API and returns its id
pub async fn register(app: &TestApp, email: &str, nickname: &str, password: &str) -> Uuid {
    app.server
        .post("/user/create")
        .json(&json!({
            "email": email,
            "nickname": nickname,
            "password": password,
            "password2": password,
        }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    app.users
        .find_by_email(email)
        .await
        .ok()
        .flatten()
        .map(|u| u.id)
        .expect("registered user")
}

pub async fn login(app: &TestApp, email: &str, password: &str) -> String {
    let response = app
        .server
        .post("/user/login")
        .form(&[("username", email), ("password", password)])
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    body["access_token"]
        .as_str()
        .map(str::to_string)
        .expect("access token")
}
