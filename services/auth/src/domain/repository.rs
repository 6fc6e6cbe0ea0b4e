#![allow(async_fn_in_trait)]

use uuid::Uuid;

use crate::domain::challenge::PendingTwoFactorChallenge;
use crate::domain::types::{AuthUser, RecoveryCode};
use crate::error::AuthServiceError;

/// User credentials, 2FA secret and recovery codes.
pub trait CredentialStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthServiceError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthServiceError>;

    async fn create(&self, user: &AuthUser) -> Result<(), AuthServiceError>;

    /// Store a freshly generated (encrypted) secret with 2FA still disabled,
    /// dropping any recovery codes. One transaction.
    async fn set_pending_secret(
        &self,
        user_id: Uuid,
        encrypted_secret: &str,
    ) -> Result<(), AuthServiceError>;

    /// Turn 2FA on and replace the recovery batch. One transaction.
    async fn enable_two_factor(
        &self,
        user_id: Uuid,
        encrypted_codes: &[String],
    ) -> Result<(), AuthServiceError>;

    /// Delete every recovery code of the user and insert the new batch. One transaction.
    async fn replace_recovery_codes(
        &self,
        user_id: Uuid,
        encrypted_codes: &[String],
    ) -> Result<(), AuthServiceError>;

    async fn list_recovery_codes(&self, user_id: Uuid)
    -> Result<Vec<RecoveryCode>, AuthServiceError>;

    /// Delete one recovery code. Returns `false` when another request got there first.
    async fn consume_recovery_code(&self, id: Uuid) -> Result<bool, AuthServiceError>;

    /// Clear the secret, disable 2FA and delete all recovery codes. One transaction.
    async fn disable_two_factor(&self, user_id: Uuid) -> Result<(), AuthServiceError>;
}

/// Where pending challenges live between the password step and the code step.
pub trait PendingChallengeStore: Send + Sync {
    /// Store (or overwrite) the challenge of a login session.
    async fn put(
        &self,
        session_id: &str,
        challenge: &PendingTwoFactorChallenge,
    ) -> Result<(), AuthServiceError>;

    /// Remove and return the challenge. Concurrent takers see it at most once.
    async fn take(
        &self,
        session_id: &str,
    ) -> Result<Option<PendingTwoFactorChallenge>, AuthServiceError>;
}
