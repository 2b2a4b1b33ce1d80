//! TMDb movie-metadata proxy
//!
//! Search results are passed through as raw JSON objects and enriched with
//! credits and detail fields fetched by two secondary calls per movie.
//! A failing secondary call only degrades its own result.
//!
//! API Flow:
//! 1. Search: /search/movie → raw results
//! 2. Per result: /movie/{id}/credits and /movie/{id} → cast, director, genres, countries
//! 3. Trailer: /movie/{id}/videos → first YouTube video

use std::sync::Arc;

use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{
    error::{AppError, AppResult},
    models::{
        movie::{TmdbSearchResponse, TmdbVideosResponse},
        EnrichedMovie, TmdbCredits, TmdbMovieDetails, TmdbVideo,
    },
};

pub const DEFAULT_SEARCH_LIMIT: usize = 10;
pub const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Source of movie metadata
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieProvider: Send + Sync {
    /// Raw search results for `query` on the given page
    async fn search(&self, query: &str, page: u32) -> AppResult<Vec<Map<String, Value>>>;

    async fn credits(&self, movie_id: i64) -> AppResult<TmdbCredits>;

    async fn details(&self, movie_id: i64) -> AppResult<TmdbMovieDetails>;

    async fn videos(&self, movie_id: i64) -> AppResult<Vec<TmdbVideo>>;
}

#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub api_key: String,
    pub api_url: String,
    pub language: String,
}

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    config: TmdbConfig,
}

impl TmdbProvider {
    pub fn new(config: TmdbConfig) -> Self {
        Self {
            http_client: HttpClient::new(),
            config,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.config.api_url.trim_end_matches('/'), path);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.config.api_key.as_str()),
                ("language", self.config.language.as_str()),
            ])
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDb API returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl MovieProvider for TmdbProvider {
    async fn search(&self, query: &str, page: u32) -> AppResult<Vec<Map<String, Value>>> {
        let response: TmdbSearchResponse = self
            .get_json(
                "/search/movie",
                &[
                    ("query", query.to_string()),
                    ("page", page.to_string()),
                    ("include_adult", "false".to_string()),
                ],
            )
            .await?;
        Ok(response.results)
    }

    async fn credits(&self, movie_id: i64) -> AppResult<TmdbCredits> {
        self.get_json(&format!("/movie/{}/credits", movie_id), &[])
            .await
    }

    async fn details(&self, movie_id: i64) -> AppResult<TmdbMovieDetails> {
        self.get_json(&format!("/movie/{}", movie_id), &[]).await
    }

    async fn videos(&self, movie_id: i64) -> AppResult<Vec<TmdbVideo>> {
        let response: TmdbVideosResponse = self
            .get_json(&format!("/movie/{}/videos", movie_id), &[])
            .await?;
        Ok(response.results)
    }
}

async fn enrich(provider: &dyn MovieProvider, movie: Map<String, Value>) -> EnrichedMovie {
    let Some(movie_id) = movie.get("id").and_then(Value::as_i64) else {
        tracing::warn!("Search result without a numeric id");
        return EnrichedMovie::degraded(movie);
    };

    let fetched = async {
        let credits = provider.credits(movie_id).await?;
        let details = provider.details(movie_id).await?;
        Ok::<_, AppError>((credits, details))
    }
    .await;

    match fetched {
        Ok((credits, details)) => EnrichedMovie::new(movie, &credits, &details),
        Err(e) => {
            tracing::warn!(movie_id, error = %e, "Movie detail fetch failed, using placeholders");
            EnrichedMovie::degraded(movie)
        }
    }
}

/// Searches movies and enriches the first `limit` results in parallel
///
/// Result order follows the search order regardless of which lookup
/// finishes first.
pub async fn search_movies(
    provider: Arc<dyn MovieProvider>,
    query: &str,
    limit: usize,
    page: u32,
) -> AppResult<Vec<EnrichedMovie>> {
    if query.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Query parameter \"q\" is required".to_string(),
        ));
    }

    let movies = provider.search(query, page.max(1)).await.map_err(|e| {
        tracing::error!(query = %query, error = %e, "TMDb search failed");
        AppError::ExternalApi("Failed to fetch data from TMDb API".to_string())
    })?;

    let mut tasks = Vec::new();
    for movie in movies.into_iter().take(limit) {
        let provider = provider.clone();
        let fallback = movie.clone();
        let task = tokio::spawn(async move { enrich(provider.as_ref(), movie).await });
        tasks.push((task, fallback));
    }

    let mut results = Vec::with_capacity(tasks.len());
    for (task, fallback) in tasks {
        match task.await {
            Ok(movie) => results.push(movie),
            Err(e) => {
                tracing::error!(error = %e, "Task join error");
                results.push(EnrichedMovie::degraded(fallback));
            }
        }
    }

    tracing::info!(query = %query, results = results.len(), "Movie search completed");

    Ok(results)
}

/// YouTube URL of the first YouTube video TMDb lists for the movie
pub async fn trailer_url(provider: &dyn MovieProvider, movie_id: i64) -> AppResult<String> {
    if movie_id <= 0 {
        return Err(AppError::InvalidInput("Invalid movie ID".to_string()));
    }

    let videos = provider.videos(movie_id).await.map_err(|e| match e {
        AppError::HttpClient(e) => {
            AppError::ExternalApi(format!("Failed to fetch video data from TMDb: {}", e))
        }
        other => other,
    })?;

    if videos.is_empty() {
        return Err(AppError::NotFound(
            "No videos found for this movie".to_string(),
        ));
    }

    videos
        .iter()
        .find(|video| video.site == "YouTube")
        .map(|video| format!("{}{}", YOUTUBE_WATCH_URL, video.key))
        .ok_or_else(|| AppError::NotFound("YouTube trailer not found".to_string()))
}
