use sqlx::PgPool;

use crate::{db::SimilarityStore, error::AppResult, models::SimilarityDocument};

/// Similarity snapshots written by the offline job into `similarity_scores`
#[derive(Clone)]
pub struct PgSimilarityStore {
    pool: PgPool,
}

impl PgSimilarityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SimilarityStore for PgSimilarityStore {
    async fn collection_exists(&self, collection: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM similarity_scores WHERE collection = $1)",
        )
        .bind(collection)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn find_document(
        &self,
        collection: &str,
        target: &str,
    ) -> AppResult<Option<SimilarityDocument>> {
        let document = sqlx::query_as::<_, SimilarityDocument>(
            "SELECT collection, target, scores
             FROM similarity_scores
             WHERE collection = $1 AND target = $2",
        )
        .bind(collection)
        .bind(target)
        .fetch_optional(&self.pool)
        .await?;
        Ok(document)
    }
}
