use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// One row of a precomputed similarity collection
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct SimilarityDocument {
    pub collection: String,
    /// Id the scores belong to
    pub target: String,
    /// Other id -> score; values are not guaranteed to be numeric
    pub scores: sqlx::types::Json<Map<String, Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarityEntry {
    pub user_id: String,
    pub similarity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarUserDetails {
    pub user_id: Uuid,
    pub nickname: String,
    pub email: String,
    pub profile: Option<String>,
    pub similarity: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimilarityQuery {
    pub index: String,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_top_n() -> usize {
    10
}
