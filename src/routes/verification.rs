use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::{MessageResponse, VerificationConfirmRequest, VerificationRequest},
    routes::{extract::ApiJson, AppState},
    services::verification,
};

pub async fn request(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<VerificationRequest>,
) -> AppResult<Json<MessageResponse>> {
    let response = verification::request_code(
        state.verification.as_ref(),
        state.mailer.as_ref(),
        &request.email,
    )
    .await?;
    Ok(Json(response))
}

pub async fn confirm(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<VerificationConfirmRequest>,
) -> AppResult<Json<MessageResponse>> {
    let response =
        verification::confirm_code(state.verification.as_ref(), &request.email, &request.code)
            .await?;
    Ok(Json(response))
}
