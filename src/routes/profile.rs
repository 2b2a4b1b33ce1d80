use axum::{
    extract::{Multipart, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    routes::{extract::ApiQuery, AppState},
    services::profile,
};

#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    user_id: Uuid,
}

/// Stores the multipart `file` field as the user's profile image
pub async fn upload(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ProfileQuery>,
    mut multipart: Multipart,
) -> AppResult<Json<Value>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read upload: {}", e)))?;

        let path = profile::upload(
            state.users.as_ref(),
            &state.upload_dir,
            params.user_id,
            &file_name,
            &bytes,
        )
        .await?;

        return Ok(Json(json!({
            "message": "Profile image uploaded",
            "file_path": path,
        })));
    }

    Err(AppError::InvalidInput(
        "Multipart field \"file\" is required".to_string(),
    ))
}

pub async fn get(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ProfileQuery>,
) -> AppResult<impl IntoResponse> {
    let image = profile::image(state.users.as_ref(), params.user_id).await?;
    Ok(([(header::CONTENT_TYPE, image.content_type)], image.bytes))
}
