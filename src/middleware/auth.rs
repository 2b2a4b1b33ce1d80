//! Bearer-token authentication extractor.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{error::AppError, models::User, routes::AppState, services::accounts};

/// The account a valid `Authorization: Bearer <token>` header resolves to
///
/// ```ignore
/// async fn handler(AuthUser(user): AuthUser) -> AppResult<Json<UserResponse>> {
///     Ok(Json(UserResponse::from(&user)))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                AppError::Unauthorized(
                    "Invalid Authorization format. Expected: Bearer <token>".to_string(),
                )
            })?;

        let user = accounts::authenticate(state.users.as_ref(), &state.jwt, token).await?;
        Ok(AuthUser(user))
    }
}
