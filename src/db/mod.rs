//! Storage seams.
//!
//! Handlers and services only see the traits below; PostgreSQL and Redis
//! implementations live in the submodules.

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        AudioFeatures, EmailVerification, NewUser, SimilarityDocument, Track, TrackInfo, User,
        UserChanges, UserTaste,
    },
};

pub mod postgres;
pub mod redis;
pub mod similarity;
pub mod tracks;
pub mod users;

pub use postgres::create_pool;
pub use self::redis::{create_redis_client, RedisVerificationStore};
pub use similarity::PgSimilarityStore;
pub use tracks::PgTrackStore;
pub use users::PgUserStore;

/// Accounts and follow relations
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_by_nickname(&self, nickname: &str) -> AppResult<Option<User>>;

    /// Users among `ids`; unknown ids are skipped
    async fn find_many(&self, ids: &[Uuid]) -> AppResult<Vec<User>>;

    async fn insert(&self, user: NewUser) -> AppResult<User>;

    /// Applies `changes`, returning `None` when the user does not exist
    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<Option<User>>;

    /// Deletes the user and its relations; `false` when nothing was deleted
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    async fn is_following(&self, follower: Uuid, followee: Uuid) -> AppResult<bool>;

    /// `false` when the relation already existed
    async fn insert_following(&self, follower: Uuid, followee: Uuid) -> AppResult<bool>;

    /// `false` when there was no relation to delete
    async fn delete_following(&self, follower: Uuid, followee: Uuid) -> AppResult<bool>;

    async fn list_following(&self, follower: Uuid) -> AppResult<Vec<User>>;
}

/// Track catalogue, playlists and taste vectors
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TrackStore: Send + Sync {
    /// Inserts or refreshes catalogue entries, returning how many were written
    async fn upsert_tracks(&self, tracks: Vec<TrackInfo>) -> AppResult<u64>;

    /// Updates features of known tracks, returning how many were updated
    async fn update_audio_features(&self, features: Vec<AudioFeatures>) -> AppResult<u64>;

    async fn find_track(&self, id: &str) -> AppResult<Option<Track>>;

    async fn all_tracks(&self) -> AppResult<Vec<Track>>;

    /// `false` when the track was already in the playlist
    async fn add_to_playlist(&self, user_id: Uuid, track_id: &str) -> AppResult<bool>;

    /// `false` when the track was not in the playlist
    async fn remove_from_playlist(&self, user_id: Uuid, track_id: &str) -> AppResult<bool>;

    async fn playlist(&self, user_id: Uuid) -> AppResult<Vec<Track>>;

    async fn save_taste(&self, taste: UserTaste) -> AppResult<()>;

    async fn taste(&self, user_id: Uuid) -> AppResult<Option<UserTaste>>;
}

/// Read-only access to externally computed similarity collections
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SimilarityStore: Send + Sync {
    async fn collection_exists(&self, collection: &str) -> AppResult<bool>;

    async fn find_document(
        &self,
        collection: &str,
        target: &str,
    ) -> AppResult<Option<SimilarityDocument>>;
}

/// Pending email verification codes with store-enforced expiry
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait VerificationStore: Send + Sync {
    /// Replaces any existing record for the same email
    async fn replace(&self, record: EmailVerification, ttl_seconds: u64) -> AppResult<()>;

    async fn find(&self, email: &str) -> AppResult<Option<EmailVerification>>;

    async fn remove(&self, email: &str) -> AppResult<()>;
}
