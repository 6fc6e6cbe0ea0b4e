use anyhow::Context as _;
use deadpool_redis::Pool;
use deadpool_redis::redis::AsyncCommands;

use crate::domain::challenge::PendingTwoFactorChallenge;
use crate::domain::repository::PendingChallengeStore;
use crate::domain::types::PENDING_CHALLENGE_TTL_SECS;
use crate::error::AuthServiceError;

#[derive(Clone)]
pub struct RedisChallengeStore {
    pub pool: Pool,
}

fn pending_key(session_id: &str) -> String {
    format!("2fa_pending:{}", session_id)
}

impl PendingChallengeStore for RedisChallengeStore {
    async fn put(
        &self,
        session_id: &str,
        challenge: &PendingTwoFactorChallenge,
    ) -> Result<(), AuthServiceError> {
        let payload = serde_json::to_vec(challenge).context("serialize pending challenge")?;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        let (): () = conn
            .set_ex(pending_key(session_id), payload, PENDING_CHALLENGE_TTL_SECS)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AuthServiceError::Internal(e.into()))?;
        Ok(())
    }

    async fn take(
        &self,
        session_id: &str,
    ) -> Result<Option<PendingTwoFactorChallenge>, AuthServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        let value: Option<Vec<u8>> = conn
            .get_del(pending_key(session_id))
            .await
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        match value {
            Some(bytes) => {
                let challenge =
                    serde_json::from_slice(&bytes).context("deserialize pending challenge")?;
                Ok(Some(challenge))
            }
            None => Ok(None),
        }
    }
}
