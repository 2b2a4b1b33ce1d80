use axum::{
    extract::State,
    Json,
};

use crate::{
    error::AppResult,
    models::{SimilarUserDetails, SimilarityEntry, SimilarityQuery},
    routes::{extract::ApiQuery, AppState},
    services::similarity,
};

pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SimilarityQuery>,
) -> AppResult<Json<Vec<SimilarityEntry>>> {
    let entries =
        similarity::list(state.similarity.as_ref(), &params.index, params.top_n).await?;
    Ok(Json(entries))
}

pub async fn top(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SimilarityQuery>,
) -> AppResult<Json<Vec<String>>> {
    let ids = similarity::top(state.similarity.as_ref(), &params.index, params.top_n).await?;
    Ok(Json(ids))
}

pub async fn user(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SimilarityQuery>,
) -> AppResult<Json<Vec<SimilarityEntry>>> {
    let entries = similarity::user(state.similarity.as_ref(), &params.index).await?;
    Ok(Json(entries))
}

pub async fn details(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SimilarityQuery>,
) -> AppResult<Json<Vec<SimilarUserDetails>>> {
    let details = similarity::details(
        state.similarity.as_ref(),
        state.users.as_ref(),
        &params.index,
        params.top_n,
    )
    .await?;
    Ok(Json(details))
}
