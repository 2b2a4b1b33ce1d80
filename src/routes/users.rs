use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    middleware::AuthUser,
    models::{
        CreateUserRequest, DeleteUserRequest, EmailCheckRequest, LoginForm, MessageResponse,
        NicknameCheckRequest, PasswordResetRequest, Token, UpdateMoviesRequest,
        UpdateUserRequest, UserResponse,
    },
    routes::{
        extract::{ApiForm, ApiJson},
        AppState,
    },
    services::accounts,
};

pub async fn check_email(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<EmailCheckRequest>,
) -> AppResult<Json<MessageResponse>> {
    let response = accounts::check_email(state.users.as_ref(), &request.email).await?;
    Ok(Json(response))
}

pub async fn check_nickname(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<NicknameCheckRequest>,
) -> AppResult<Json<MessageResponse>> {
    let response = accounts::check_nickname(state.users.as_ref(), &request.nickname).await?;
    Ok(Json(response))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let user = accounts::create_user(state.users.as_ref(), request).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(format!(
            "Welcome, {}! Your account has been created",
            user.nickname
        ))),
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<DeleteUserRequest>,
) -> AppResult<Json<MessageResponse>> {
    let response =
        accounts::delete_user(state.users.as_ref(), &request.email, &request.password).await?;
    Ok(Json(response))
}

/// OAuth2 password-grant style login
pub async fn login(
    State(state): State<AppState>,
    ApiForm(form): ApiForm<LoginForm>,
) -> AppResult<Json<Token>> {
    let token = accounts::login(state.users.as_ref(), &state.jwt, &form.username, &form.password)
        .await?;
    Ok(Json(token))
}

pub async fn validate(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}

pub async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let updated = accounts::update_user(state.users.as_ref(), &user, request).await?;
    Ok(Json(UserResponse::from(&updated)))
}

pub async fn update_movies(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(request): ApiJson<UpdateMoviesRequest>,
) -> AppResult<Json<UserResponse>> {
    let updated =
        accounts::update_movie_list(state.users.as_ref(), &user, request.movie_list).await?;
    Ok(Json(UserResponse::from(&updated)))
}

pub async fn reset_password(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<PasswordResetRequest>,
) -> AppResult<Json<MessageResponse>> {
    let response = accounts::reset_password(
        state.users.as_ref(),
        state.mailer.as_ref(),
        &request.email,
        &request.nickname,
    )
    .await?;
    Ok(Json(response))
}
