//! HS256 session tokens carrying the user's email as subject.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject, the user's email
    pub sub: String,
    /// Expiration time (UTC Unix timestamp)
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp)
    pub iat: i64,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

/// Issue a token for `email` that expires `access_token_expiry_mins` from now.
pub fn issue_token(email: &str, config: &JwtConfig) -> AppResult<String> {
    issue_token_at(email, chrono::Utc::now().timestamp(), config)
}

pub fn issue_token_at(email: &str, now: i64, config: &JwtConfig) -> AppResult<String> {
    let claims = Claims {
        sub: email.to_string(),
        exp: now + config.access_token_expiry_mins * 60,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token encoding failed: {}", e)))
}

/// Validate a token against the current time.
pub fn validate_token(token: &str, config: &JwtConfig) -> AppResult<Claims> {
    validate_token_at(token, chrono::Utc::now().timestamp(), config)
}

/// Validate signature and expiry as of `now`, with no leeway.
///
/// Every failure collapses into [`AppError::Unauthorized`].
pub fn validate_token_at(token: &str, now: i64, config: &JwtConfig) -> AppResult<Claims> {
    let mut validation = Validation::default();
    // Expiry is checked below against the caller's clock
    validation.validate_exp = false;
    validation.leeway = 0;

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "Token rejected");
        unauthorized()
    })?
    .claims;

    if claims.exp <= now || claims.sub.is_empty() {
        return Err(unauthorized());
    }

    Ok(claims)
}

fn unauthorized() -> AppError {
    AppError::Unauthorized("Could not validate credentials".to_string())
}
