//! Lookups over the similarity snapshots produced by the offline batch job.
//!
//! The job writes one collection per day named `YYYYMMDD_similarity`; each
//! row maps a target id to the scores of every other id. Reads use today's
//! collection and fall back to yesterday's while today's is being built.

use std::cmp::Ordering;

use chrono::{Days, NaiveDate, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{
    db::{SimilarityStore, UserStore},
    error::{AppError, AppResult},
    models::{SimilarUserDetails, SimilarityEntry},
};

/// Keys of a score row that never name another id
const RESERVED_KEYS: [&str; 2] = ["_id", "index"];

pub fn collection_name(date: NaiveDate) -> String {
    format!("{}_similarity", date.format("%Y%m%d"))
}

/// Today's collection if present, else yesterday's
pub async fn resolve_collection(store: &dyn SimilarityStore, today: NaiveDate) -> AppResult<String> {
    let current = collection_name(today);
    if store.collection_exists(&current).await? {
        return Ok(current);
    }

    if let Some(yesterday) = today.checked_sub_days(Days::new(1)) {
        let previous = collection_name(yesterday);
        if store.collection_exists(&previous).await? {
            tracing::debug!(collection = %previous, "Using previous day's similarity collection");
            return Ok(previous);
        }
    }

    Err(AppError::NotFound("No similarity data".to_string()))
}

/// Scores of `target` against every other id, best first
///
/// Non-numeric scores are dropped. `top_n` of `None` keeps everything.
pub fn rank(target: &str, scores: &Map<String, Value>, top_n: Option<usize>) -> Vec<SimilarityEntry> {
    let mut entries: Vec<SimilarityEntry> = scores
        .iter()
        .filter(|(key, _)| key.as_str() != target && !RESERVED_KEYS.contains(&key.as_str()))
        .filter_map(|(key, value)| {
            value.as_f64().map(|similarity| SimilarityEntry {
                user_id: key.clone(),
                similarity,
            })
        })
        .collect();

    entries.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });

    if let Some(n) = top_n {
        entries.truncate(n);
    }
    entries
}

async fn ranked(
    store: &dyn SimilarityStore,
    target: &str,
    top_n: Option<usize>,
) -> AppResult<Vec<SimilarityEntry>> {
    let collection = resolve_collection(store, Utc::now().date_naive()).await?;
    let document = store
        .find_document(&collection, target)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Index {} not found in similarity data", target))
        })?;

    Ok(rank(target, &document.scores, top_n))
}

/// Top `top_n` entries for `target`
pub async fn list(
    store: &dyn SimilarityStore,
    target: &str,
    top_n: usize,
) -> AppResult<Vec<SimilarityEntry>> {
    ranked(store, target, Some(top_n)).await
}

/// Ids of the top `top_n` most similar users
pub async fn top(store: &dyn SimilarityStore, target: &str, top_n: usize) -> AppResult<Vec<String>> {
    Ok(ranked(store, target, Some(top_n))
        .await?
        .into_iter()
        .map(|entry| entry.user_id)
        .collect())
}

/// Every score of `target`, best first
pub async fn user(store: &dyn SimilarityStore, target: &str) -> AppResult<Vec<SimilarityEntry>> {
    ranked(store, target, None).await
}

/// Top `top_n` similar users joined with their account details
///
/// Ids without a matching account are skipped, so fewer than `top_n`
/// entries may come back.
pub async fn details(
    store: &dyn SimilarityStore,
    users: &dyn UserStore,
    target: &str,
    top_n: usize,
) -> AppResult<Vec<SimilarUserDetails>> {
    let entries = ranked(store, target, Some(top_n)).await?;

    let scored: Vec<(Uuid, f64)> = entries
        .iter()
        .filter_map(|entry| {
            Uuid::parse_str(&entry.user_id)
                .ok()
                .map(|id| (id, entry.similarity))
        })
        .collect();
    let ids: Vec<Uuid> = scored.iter().map(|(id, _)| *id).collect();

    let found = users.find_many(&ids).await?;

    let mut details: Vec<SimilarUserDetails> = scored
        .into_iter()
        .filter_map(|(id, similarity)| {
            found.iter().find(|u| u.id == id).map(|u| SimilarUserDetails {
                user_id: u.id,
                nickname: u.nickname.clone(),
                email: u.email.clone(),
                profile: u.profile_image.clone(),
                similarity,
            })
        })
        .collect();

    details.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
    });
    Ok(details)
}
