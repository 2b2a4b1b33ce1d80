use validator::Validate;

use crate::{
    auth::{
        jwt::{self, JwtConfig},
        password,
    },
    db::UserStore,
    error::{AppError, AppResult},
    models::{
        CreateUserRequest, MessageResponse, NewUser, Token, UpdateUserRequest, User, UserChanges,
    },
    services::{
        mailer::{MailMessage, Mailer},
        profile,
    },
};

/// Fails with a conflict when the email is already registered
pub async fn check_email(users: &dyn UserStore, email: &str) -> AppResult<MessageResponse> {
    if users.find_by_email(email).await?.is_some() {
        return Err(AppError::Conflict("Email is already registered".to_string()));
    }
    Ok(MessageResponse::new("Email is available"))
}

/// Fails with a conflict when the nickname is already taken
pub async fn check_nickname(users: &dyn UserStore, nickname: &str) -> AppResult<MessageResponse> {
    if users.find_by_nickname(nickname).await?.is_some() {
        return Err(AppError::Conflict("Nickname is already taken".to_string()));
    }
    Ok(MessageResponse::new("Nickname is available"))
}

/// Registers a new account
///
/// Duplicate email or nickname is rejected before anything is written.
pub async fn create_user(users: &dyn UserStore, request: CreateUserRequest) -> AppResult<User> {
    request.validate()?;

    check_email(users, &request.email).await?;
    check_nickname(users, &request.nickname).await?;

    let user = users
        .insert(NewUser {
            email: request.email,
            nickname: request.nickname,
            password_hash: password::hash_password(&request.password)?,
        })
        .await?;

    tracing::info!(user_id = %user.id, nickname = %user.nickname, "User created");
    Ok(user)
}

/// Deletes an account after re-checking its password
pub async fn delete_user(
    users: &dyn UserStore,
    email: &str,
    candidate: &str,
) -> AppResult<MessageResponse> {
    let user = users
        .find_by_email(email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    if !password::verify_password(candidate, &user.password_hash)? {
        return Err(AppError::InvalidInput("Password does not match".to_string()));
    }

    if !users.delete(user.id).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    if let Some(path) = &user.profile_image {
        profile::discard_file(path).await;
    }

    tracing::info!(user_id = %user.id, "User deleted");
    Ok(MessageResponse::new(format!("User '{}' deleted", user.email)))
}

pub async fn login(
    users: &dyn UserStore,
    jwt_config: &JwtConfig,
    email: &str,
    candidate: &str,
) -> AppResult<Token> {
    let rejected = || AppError::Unauthorized("Incorrect email or password".to_string());

    let user = users.find_by_email(email).await?.ok_or_else(rejected)?;
    if !password::verify_password(candidate, &user.password_hash)? {
        return Err(rejected());
    }

    let access_token = jwt::issue_token(&user.email, jwt_config)?;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Token {
        access_token,
        token_type: "bearer".to_string(),
        email: user.email,
    })
}

/// Resolves the account a session token belongs to
pub async fn authenticate(
    users: &dyn UserStore,
    jwt_config: &JwtConfig,
    token: &str,
) -> AppResult<User> {
    let claims = jwt::validate_token(token, jwt_config)?;
    users
        .find_by_email(&claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Could not validate credentials".to_string()))
}

pub async fn update_user(
    users: &dyn UserStore,
    user: &User,
    request: UpdateUserRequest,
) -> AppResult<User> {
    request.validate()?;

    if let Some(nickname) = &request.nickname {
        if let Some(existing) = users.find_by_nickname(nickname).await? {
            if existing.id != user.id {
                return Err(AppError::Conflict("Nickname is already taken".to_string()));
            }
        }
    }

    let password_hash = request
        .password
        .as_deref()
        .map(password::hash_password)
        .transpose()?;

    let changes = UserChanges {
        nickname: request.nickname,
        password_hash,
        ..Default::default()
    };

    let updated = users
        .update(user.id, changes)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    tracing::info!(user_id = %user.id, "User updated");
    Ok(updated)
}

/// Replaces the user's bookmarked movies
pub async fn update_movie_list(
    users: &dyn UserStore,
    user: &User,
    movie_list: Vec<i64>,
) -> AppResult<User> {
    let changes = UserChanges {
        movie_list: Some(movie_list),
        ..Default::default()
    };
    users
        .update(user.id, changes)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Issues a temporary password and mails it to the account owner
///
/// Email and nickname must both exist and belong to the same account.
/// When the mail cannot be sent the previous password is put back.
pub async fn reset_password(
    users: &dyn UserStore,
    mailer: &dyn Mailer,
    email: &str,
    nickname: &str,
) -> AppResult<MessageResponse> {
    let by_email = users
        .find_by_email(email)
        .await?
        .ok_or_else(|| AppError::NotFound("No account is registered with this email".to_string()))?;
    let by_nickname = users
        .find_by_nickname(nickname)
        .await?
        .ok_or_else(|| AppError::NotFound("Nickname not found".to_string()))?;
    if by_email.id != by_nickname.id {
        return Err(AppError::NotFound(
            "Email and nickname do not belong to the same account".to_string(),
        ));
    }

    let temporary = password::generate_temporary_password();
    let changes = UserChanges {
        password_hash: Some(password::hash_password(&temporary)?),
        ..Default::default()
    };
    users
        .update(by_email.id, changes)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if let Err(e) = mailer
        .send(email, MailMessage::temporary_password(&temporary))
        .await
    {
        tracing::warn!(user_id = %by_email.id, error = %e, "Reset mail failed, restoring password");
        let restore = UserChanges {
            password_hash: Some(by_email.password_hash),
            ..Default::default()
        };
        users.update(by_email.id, restore).await?;
        return Err(e);
    }

    tracing::info!(user_id = %by_email.id, "Temporary password issued");
    Ok(MessageResponse::new(
        "A temporary password has been sent by email. Change it after logging in.",
    ))
}
