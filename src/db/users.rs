use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::UserStore,
    error::AppResult,
    models::{NewUser, User, UserChanges},
};

/// Column list shared across queries
const COLUMNS: &str = "id, email, nickname, password_hash, profile_image, movie_list, created_at";

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_nickname(&self, nickname: &str) -> AppResult<Option<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE nickname = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(nickname)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_many(&self, ids: &[Uuid]) -> AppResult<Vec<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = ANY($1)");
        let users = sqlx::query_as::<_, User>(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn insert(&self, user: NewUser) -> AppResult<User> {
        let query = format!(
            "INSERT INTO users (id, email, nickname, password_hash)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(Uuid::new_v4())
            .bind(&user.email)
            .bind(&user.nickname)
            .bind(&user.password_hash)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<Option<User>> {
        let query = format!(
            "UPDATE users SET
                nickname = COALESCE($2, nickname),
                password_hash = COALESCE($3, password_hash),
                profile_image = CASE WHEN $4 THEN $5 ELSE profile_image END,
                movie_list = COALESCE($6, movie_list)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let (set_profile, profile_image) = match changes.profile_image {
            Some(image) => (true, image),
            None => (false, None),
        };
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(changes.nickname)
            .bind(changes.password_hash)
            .bind(set_profile)
            .bind(profile_image)
            .bind(changes.movie_list)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn is_following(&self, follower: Uuid, followee: Uuid) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM following WHERE follower_id = $1 AND followee_id = $2)",
        )
        .bind(follower)
        .bind(followee)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn insert_following(&self, follower: Uuid, followee: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO following (follower_id, followee_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(follower)
        .bind(followee)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_following(&self, follower: Uuid, followee: Uuid) -> AppResult<bool> {
        let result =
            sqlx::query("DELETE FROM following WHERE follower_id = $1 AND followee_id = $2")
                .bind(follower)
                .bind(followee)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_following(&self, follower: Uuid) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT u.id, u.email, u.nickname, u.password_hash, u.profile_image, u.movie_list, u.created_at
             FROM following f
             JOIN users u ON u.id = f.followee_id
             WHERE f.follower_id = $1
             ORDER BY f.created_at",
        )
        .bind(follower)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }
}
