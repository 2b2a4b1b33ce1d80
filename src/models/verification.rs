use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of digits in an email verification code
pub const CODE_LENGTH: usize = 6;

/// Lifetime of a verification code
pub const CODE_TTL_MINUTES: i64 = 5;

/// Pending email verification; superseded on every new request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailVerification {
    pub email: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl EmailVerification {
    /// New record with a random numeric code expiring [`CODE_TTL_MINUTES`] after `now`
    pub fn issue(email: &str, now: DateTime<Utc>) -> Self {
        let mut rng = rand::rng();
        let code = (0..CODE_LENGTH)
            .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
            .collect();

        Self {
            email: email.to_string(),
            code,
            expires_at: now + Duration::minutes(CODE_TTL_MINUTES),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Seconds until expiry as of `now`, never below one
    pub fn ttl_seconds(&self, now: DateTime<Utc>) -> u64 {
        (self.expires_at - now).num_seconds().max(1) as u64
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerificationRequest {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerificationConfirmRequest {
    pub email: String,
    pub code: String,
}
