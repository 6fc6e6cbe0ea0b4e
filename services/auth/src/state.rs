use axum::extract::FromRef;
use deadpool_redis::Pool as RedisPool;
use sea_orm::DatabaseConnection;

use fifahub_core::rate_limit::RateLimiter;

use crate::domain::types::TwoFactorPolicy;
use crate::infra::cache::RedisChallengeStore;
use crate::infra::crypto::SecretCipher;
use crate::infra::db::DbCredentialStore;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub redis: RedisPool,
    pub cipher: SecretCipher,
    /// Process-wide; every verify request counts against the same windows.
    pub limiter: RateLimiter,
    pub policy: TwoFactorPolicy,
    pub jwt_secret: String,
    pub cookie_domain: String,
    pub issuer: String,
}

impl AppState {
    pub fn credential_store(&self) -> DbCredentialStore {
        DbCredentialStore {
            db: self.db.clone(),
        }
    }

    pub fn challenge_store(&self) -> RedisChallengeStore {
        RedisChallengeStore {
            pool: self.redis.clone(),
        }
    }
}

impl FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
