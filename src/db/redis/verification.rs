use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;

use crate::db::VerificationStore;
use crate::error::AppError;
use crate::error::AppResult;
use crate::models::EmailVerification;

/// Redis key holding the pending verification of one email address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VerificationKey(pub String);

impl Display for VerificationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "verify:{}", self.0.trim().to_lowercase())
    }
}

/// Creates a Redis client for verification codes
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Verification codes stored as JSON with a key TTL, so expired records
/// disappear without any cleanup job
#[derive(Clone)]
pub struct RedisVerificationStore {
    redis_client: Client,
}

impl RedisVerificationStore {
    pub fn new(redis_client: Client) -> Self {
        Self { redis_client }
    }
}

#[async_trait::async_trait]
impl VerificationStore for RedisVerificationStore {
    async fn replace(&self, record: EmailVerification, ttl_seconds: u64) -> AppResult<()> {
        let key = VerificationKey(record.email.clone()).to_string();
        let json = serde_json::to_string(&record)
            .map_err(|e| AppError::Internal(format!("Verification serialization error: {}", e)))?;

        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.del(&key).await?;
        let _: () = conn.set_ex(&key, json, ttl_seconds).await?;

        tracing::debug!(key = %key, ttl = ttl_seconds, "Stored verification code");
        Ok(())
    }

    async fn find(&self, email: &str) -> AppResult<Option<EmailVerification>> {
        let key = VerificationKey(email.to_string()).to_string();
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let stored: Option<String> = conn.get(&key).await?;

        match stored {
            Some(json) => {
                let record = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Verification deserialization error: {}", e))
                })?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn remove(&self, email: &str) -> AppResult<()> {
        let key = VerificationKey(email.to_string()).to_string();
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.del(&key).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_verification_key_display() {
        let key = VerificationKey("viewer@cinetalk.kr".to_string());
        assert_eq!(format!("{}", key), "verify:viewer@cinetalk.kr");
    }

    #[test]
    fn test_verification_key_normalizes_case() {
        let key = VerificationKey(" Viewer@Cinetalk.KR ".to_string());
        assert_eq!(format!("{}", key), "verify:viewer@cinetalk.kr");
    }

    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
    }

    #[tokio::test]
    #[ignore = "requires a running Redis"]
    async fn test_replace_supersedes_previous_code() {
        let store = RedisVerificationStore::new(create_redis_client(&redis_url()).unwrap());
        let email = "supersede@cinetalk.kr";

        let first = EmailVerification::issue(email, Utc::now());
        store.replace(first, 60).await.unwrap();
        let mut second = EmailVerification::issue(email, Utc::now());
        second.code = "123456".to_string();
        store.replace(second.clone(), 60).await.unwrap();

        let stored = store.find(email).await.unwrap();
        assert_eq!(stored, Some(second));

        store.remove(email).await.unwrap();
        assert_eq!(store.find(email).await.unwrap(), None);
    }

    #[tokio::test]
    #[ignore = "requires a running Redis"]
    async fn test_record_expires_with_key_ttl() {
        let store = RedisVerificationStore::new(create_redis_client(&redis_url()).unwrap());
        let email = "ttl@cinetalk.kr";

        store
            .replace(EmailVerification::issue(email, Utc::now()), 1)
            .await
            .unwrap();
        tokio::time::sleep(tokio::time::Duration::from_millis(1500)).await;

        assert_eq!(store.find(email).await.unwrap(), None);
    }
}
