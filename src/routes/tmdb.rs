use axum::{
    extract::State,
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::{MovieSearchResponse, TrailerResponse},
    routes::{
        extract::{ApiPath, ApiQuery},
        AppState,
    },
    services::tmdb::{self, DEFAULT_SEARCH_LIMIT},
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
    #[serde(default = "default_limit")]
    limit: usize,
    #[serde(default = "default_page")]
    page: u32,
}

fn default_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

fn default_page() -> u32 {
    1
}

pub async fn search(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchQuery>,
) -> AppResult<Json<MovieSearchResponse>> {
    let results = tmdb::search_movies(state.movies.clone(), &params.q, params.limit, params.page)
        .await?;
    Ok(Json(MovieSearchResponse { results }))
}

pub async fn videos(
    State(state): State<AppState>,
    ApiPath(movie_id): ApiPath<i64>,
) -> AppResult<Json<TrailerResponse>> {
    let trailer_url = tmdb::trailer_url(state.movies.as_ref(), movie_id).await?;
    Ok(Json(TrailerResponse { trailer_url }))
}
