pub mod verification;

pub use verification::create_redis_client;
pub use verification::RedisVerificationStore;
pub use verification::VerificationKey;
