use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A registered account
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub nickname: String,
    pub password_hash: String,
    /// Path of the uploaded profile image, relative to the working directory
    pub profile_image: Option<String>,
    /// TMDb ids of bookmarked movies
    pub movie_list: Vec<i64>,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to insert a user; the password is already hashed
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub nickname: String,
    pub password_hash: String,
}

/// Partial update applied by [`crate::db::UserStore::update`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub nickname: Option<String>,
    pub password_hash: Option<String>,
    /// `Some(None)` clears the image
    pub profile_image: Option<Option<String>>,
    pub movie_list: Option<Vec<i64>>,
}

/// Public view of a user; never carries the password hash
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub nickname: String,
    pub profile_image: Option<String>,
    pub movie_list: Vec<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            nickname: user.nickname.clone(),
            profile_image: user.profile_image.clone(),
            movie_list: user.movie_list.clone(),
            created_at: user.created_at,
        }
    }
}

fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 16), custom(function = "not_blank"))]
    pub nickname: String,
    #[validate(custom(function = "not_blank"))]
    pub password: String,
    #[validate(must_match(other = "password"))]
    pub password2: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 16), custom(function = "not_blank"))]
    pub nickname: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteUserRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMoviesRequest {
    pub movie_list: Vec<i64>,
}

/// OAuth2 password-grant style login form; `username` carries the email
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailCheckRequest {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NicknameCheckRequest {
    pub nickname: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
    pub nickname: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FollowRequest {
    pub user_id: Uuid,
    pub following_id: Uuid,
}

/// Result of a follow or unfollow call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FollowOutcome {
    pub message: String,
    /// `false` when the call was a no-op
    pub changed: bool,
    pub user: String,
    pub f_user: String,
}

/// Entry of the followed-users listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FollowedUser {
    pub id: Uuid,
    pub nickname: String,
    pub movie_list: Vec<i64>,
}

/// Plain `{ "message": ... }` body used by most mutating endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
