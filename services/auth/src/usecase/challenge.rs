//! Second step of a login that owes a code.
//!
//! [`VerifyTwoFactorUseCase`] is a state transition on an explicit
//! `Option<PendingTwoFactorChallenge>`: the caller loads it, passes it in,
//! and persists whatever is left afterwards. Failures that end the challenge
//! leave `None`; retryable failures leave the (possibly updated) challenge.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use fifahub_core::rate_limit::RateLimiter;

use crate::domain::challenge::{FailedAttempt, PendingTwoFactorChallenge};
use crate::domain::repository::{CredentialStore, PendingChallengeStore};
use crate::domain::totp;
use crate::domain::types::{
    AuthUser, TWO_FACTOR_RATE_SCOPE, TokenPair, TwoFactorPolicy, VerificationMethod,
};
use crate::error::AuthServiceError;
use crate::infra::crypto::SecretCipher;
use crate::usecase::recovery::consume_recovery_code;
use crate::usecase::token::issue_token_pair;
use crate::usecase::two_factor::user_secret;

#[derive(Debug, Default)]
pub struct VerifyTwoFactorInput {
    pub token: String,
    pub code: Option<String>,
    pub recovery_code: Option<String>,
}

#[derive(Debug)]
pub struct VerifiedLogin {
    pub user_id: Uuid,
    pub method: VerificationMethod,
    pub remember: bool,
    pub tokens: TokenPair,
}

pub struct VerifyTwoFactorUseCase<U: CredentialStore> {
    pub users: U,
    pub cipher: SecretCipher,
    pub limiter: RateLimiter,
    pub policy: TwoFactorPolicy,
    pub jwt_secret: String,
}

impl<U: CredentialStore> VerifyTwoFactorUseCase<U> {
    pub async fn execute(
        &self,
        pending: &mut Option<PendingTwoFactorChallenge>,
        input: VerifyTwoFactorInput,
    ) -> Result<VerifiedLogin, AuthServiceError> {
        self.execute_at(pending, input, Utc::now()).await
    }

    /// Take the challenge stored under `session_id`, verify it and write it
    /// back if it survives. Internal failures surface as
    /// [`AuthServiceError::VerificationUnavailable`].
    pub async fn execute_session<S: PendingChallengeStore>(
        &self,
        store: &S,
        session_id: &str,
        input: VerifyTwoFactorInput,
    ) -> Result<VerifiedLogin, AuthServiceError> {
        let mut pending = store.take(session_id).await.map_err(hide_internal)?;
        let result = self.execute(&mut pending, input).await;
        if let Some(challenge) = &pending {
            store
                .put(session_id, challenge)
                .await
                .map_err(hide_internal)?;
        }
        result.map_err(hide_internal)
    }

    /// [`execute`](Self::execute) against an explicit clock reading.
    pub async fn execute_at(
        &self,
        pending: &mut Option<PendingTwoFactorChallenge>,
        input: VerifyTwoFactorInput,
        now: DateTime<Utc>,
    ) -> Result<VerifiedLogin, AuthServiceError> {
        let mut challenge = pending.take().ok_or(AuthServiceError::NoPendingChallenge)?;
        match self.verify(&mut challenge, input, now).await {
            Ok(verified) => Ok(verified),
            Err(e) => {
                if !e.ends_challenge() {
                    *pending = Some(challenge);
                }
                Err(e)
            }
        }
    }

    async fn verify(
        &self,
        challenge: &mut PendingTwoFactorChallenge,
        input: VerifyTwoFactorInput,
        now: DateTime<Utc>,
    ) -> Result<VerifiedLogin, AuthServiceError> {
        let user = self
            .users
            .find_by_id(challenge.user_id)
            .await?
            .ok_or(AuthServiceError::NoPendingChallenge)?;
        if !user.two_factor_enabled {
            tracing::warn!(user_id = %user.id, "2fa challenge for user without 2fa enabled");
            return Err(AuthServiceError::NoPendingChallenge);
        }

        if challenge.is_expired(now, self.policy.max_age_secs) {
            tracing::info!(user_id = %user.id, "2fa challenge expired");
            return Err(AuthServiceError::ChallengeExpired);
        }
        if !challenge.token_matches(&input.token) {
            tracing::warn!(user_id = %user.id, "2fa challenge token mismatch");
            return Err(AuthServiceError::TokenMismatch);
        }

        let decision = self.limiter.check(
            TWO_FACTOR_RATE_SCOPE,
            &user.id.to_string(),
            self.policy.rate_limit,
            self.policy.rate_window,
        );
        if decision.limited {
            tracing::warn!(
                user_id = %user.id,
                retry_after_secs = decision.retry_after_secs,
                "2fa verification rate limited"
            );
            return Err(AuthServiceError::RateLimited {
                retry_after_secs: decision.retry_after_secs,
            });
        }

        let recovery_code = non_empty(input.recovery_code);
        let code = non_empty(input.code);
        let (method, accepted) = match (recovery_code, code) {
            (Some(candidate), _) => (
                VerificationMethod::Recovery,
                consume_recovery_code(&self.users, &self.cipher, user.id, &candidate).await?,
            ),
            (None, Some(code)) => (VerificationMethod::Totp, self.check_totp(&user, &code, now)?),
            (None, None) => {
                return Err(AuthServiceError::ValidationError(
                    "code or recovery_code is required".to_owned(),
                ));
            }
        };

        if !accepted {
            return Err(match challenge.record_failure(self.policy.max_attempts) {
                FailedAttempt::Retry { attempts } => {
                    tracing::info!(user_id = %user.id, attempts, "invalid 2fa code");
                    AuthServiceError::InvalidCode {
                        attempts: Some(attempts),
                    }
                }
                FailedAttempt::Locked { attempts } => {
                    tracing::warn!(user_id = %user.id, attempts, "2fa challenge locked");
                    AuthServiceError::AttemptsLocked { attempts }
                }
            });
        }

        if method == VerificationMethod::Recovery {
            tracing::info!(user_id = %user.id, "recovery code consumed");
        }
        Ok(VerifiedLogin {
            user_id: user.id,
            method,
            remember: challenge.remember,
            tokens: issue_token_pair(user.id, challenge.remember, &self.jwt_secret)?,
        })
    }

    /// A malformed code is a wrong code; it still costs an attempt.
    fn check_totp(
        &self,
        user: &AuthUser,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, AuthServiceError> {
        if !totp::is_well_formed_code(code) {
            return Ok(false);
        }
        let secret = user_secret(user, &self.cipher)?;
        let unix_secs = u64::try_from(now.timestamp()).unwrap_or_default();
        totp::verify(&secret, code, unix_secs).map_err(|_| AuthServiceError::InvalidSecret)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// The verify surface never exposes why an internal step failed.
pub fn hide_internal(err: AuthServiceError) -> AuthServiceError {
    match err {
        AuthServiceError::Internal(e) => {
            tracing::error!(error = ?e, "2fa verification failed internally");
            AuthServiceError::VerificationUnavailable
        }
        other => other,
    }
}
