use chrono::{DateTime, Utc};

use crate::{
    db::VerificationStore,
    error::{AppError, AppResult},
    models::{EmailVerification, MessageResponse},
    services::mailer::{MailMessage, Mailer},
};

/// Issues a fresh code for `email`, superseding any pending one, and mails it
pub async fn request_code(
    codes: &dyn VerificationStore,
    mailer: &dyn Mailer,
    email: &str,
) -> AppResult<MessageResponse> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AppError::InvalidInput("Email is required".to_string()));
    }

    let now = Utc::now();
    let record = EmailVerification::issue(email, now);
    let message = MailMessage::verification_code(email, &record.code);
    let ttl = record.ttl_seconds(now);

    codes.replace(record, ttl).await?;
    mailer.send(email, message).await?;

    tracing::info!(email = %email, "Verification code sent");
    Ok(MessageResponse::new("Verification code sent"))
}

pub async fn confirm_code(
    codes: &dyn VerificationStore,
    email: &str,
    code: &str,
) -> AppResult<MessageResponse> {
    confirm_code_at(codes, email, code, Utc::now()).await
}

/// Checks `code` against the pending record as of `now`; a match consumes it
pub async fn confirm_code_at(
    codes: &dyn VerificationStore,
    email: &str,
    code: &str,
    now: DateTime<Utc>,
) -> AppResult<MessageResponse> {
    let email = email.trim();
    let record = codes
        .find(email)
        .await?
        .ok_or_else(|| AppError::NotFound("No verification code was requested".to_string()))?;

    if record.is_expired(now) {
        codes.remove(email).await?;
        return Err(AppError::InvalidInput("Verification code has expired".to_string()));
    }

    if record.code != code.trim() {
        return Err(AppError::InvalidInput("Verification code does not match".to_string()));
    }

    codes.remove(email).await?;
    tracing::info!(email = %email, "Email verified");
    Ok(MessageResponse::new("Email verified"))
}
