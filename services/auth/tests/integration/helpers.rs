use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock, Mutex};
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use fifahub_auth::domain::challenge::PendingTwoFactorChallenge;
use fifahub_auth::domain::repository::{CredentialStore, PendingChallengeStore};
use fifahub_auth::domain::totp;
use fifahub_auth::domain::types::{AuthUser, RecoveryCode, TwoFactorPolicy};
use fifahub_auth::error::AuthServiceError;
use fifahub_auth::infra::crypto::SecretCipher;
use fifahub_auth::infra::password::hash_password;
use fifahub_auth::usecase::challenge::VerifyTwoFactorUseCase;
use fifahub_core::rate_limit::RateLimiter;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-unit-tests-only";
pub const TEST_ENCRYPTION_SECRET: &str = "test-2fa-encryption-secret";
pub const TEST_PASSWORD: &str = "correct horse battery";
pub const TEST_TOTP_SECRET: &str = "JBSWY3DPEHPK3PXPJBSWY3DPEHPK3PXP";

// Argon2 is slow in debug builds; hash once per test binary.
static TEST_PASSWORD_HASH: LazyLock<String> =
    LazyLock::new(|| hash_password(TEST_PASSWORD).unwrap());

// ── MockCredentialStore ──────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockCredentialStore {
    pub users: Arc<Mutex<Vec<AuthUser>>>,
    pub codes: Arc<Mutex<Vec<RecoveryCode>>>,
    pub fail_lookups: Arc<AtomicBool>,
}

impl MockCredentialStore {
    pub fn new(users: Vec<AuthUser>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
            ..Self::default()
        }
    }

    /// Make `find_by_id` fail like an unreachable database.
    pub fn fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn user(&self, id: Uuid) -> AuthUser {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .unwrap()
    }

    pub fn code_count(&self, user_id: Uuid) -> usize {
        self.codes
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == user_id)
            .count()
    }

    /// Store `plain` codes for the user, encrypted with the test cipher.
    pub fn seed_recovery_codes(&self, user_id: Uuid, plain: &[&str]) {
        let cipher = test_cipher();
        let mut codes = self.codes.lock().unwrap();
        for code in plain {
            codes.push(RecoveryCode {
                id: Uuid::new_v4(),
                user_id,
                encrypted_code: cipher.encrypt(code).unwrap(),
                created_at: Utc::now(),
            });
        }
    }

    /// A row that no longer decrypts, as left behind by a rotated key.
    pub fn seed_corrupt_recovery_code(&self, user_id: Uuid) {
        self.codes.lock().unwrap().push(RecoveryCode {
            id: Uuid::new_v4(),
            user_id,
            encrypted_code: SecretCipher::from_secret("rotated-away")
                .encrypt("0123456789")
                .unwrap(),
            created_at: Utc::now(),
        });
    }

    fn replace_codes(&self, user_id: Uuid, encrypted_codes: &[String]) {
        let mut codes = self.codes.lock().unwrap();
        codes.retain(|c| c.user_id != user_id);
        for encrypted in encrypted_codes {
            codes.push(RecoveryCode {
                id: Uuid::new_v4(),
                user_id,
                encrypted_code: encrypted.clone(),
                created_at: Utc::now(),
            });
        }
    }

    fn update_user(&self, user_id: Uuid, f: impl FnOnce(&mut AuthUser)) {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == user_id) {
            f(user);
        }
    }
}

impl CredentialStore for MockCredentialStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthServiceError> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(AuthServiceError::Internal(anyhow::anyhow!(
                "connection refused"
            )));
        }
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, user: &AuthUser) -> Result<(), AuthServiceError> {
        self.users.lock().unwrap().push(user.clone());
        Ok(())
    }

    async fn set_pending_secret(
        &self,
        user_id: Uuid,
        encrypted_secret: &str,
    ) -> Result<(), AuthServiceError> {
        self.update_user(user_id, |u| {
            u.two_factor_secret = Some(encrypted_secret.to_owned());
            u.two_factor_enabled = false;
        });
        self.replace_codes(user_id, &[]);
        Ok(())
    }

    async fn enable_two_factor(
        &self,
        user_id: Uuid,
        encrypted_codes: &[String],
    ) -> Result<(), AuthServiceError> {
        self.update_user(user_id, |u| u.two_factor_enabled = true);
        self.replace_codes(user_id, encrypted_codes);
        Ok(())
    }

    async fn replace_recovery_codes(
        &self,
        user_id: Uuid,
        encrypted_codes: &[String],
    ) -> Result<(), AuthServiceError> {
        self.replace_codes(user_id, encrypted_codes);
        Ok(())
    }

    async fn list_recovery_codes(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<RecoveryCode>, AuthServiceError> {
        Ok(self
            .codes
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn consume_recovery_code(&self, id: Uuid) -> Result<bool, AuthServiceError> {
        let mut codes = self.codes.lock().unwrap();
        let before = codes.len();
        codes.retain(|c| c.id != id);
        Ok(codes.len() < before)
    }

    async fn disable_two_factor(&self, user_id: Uuid) -> Result<(), AuthServiceError> {
        self.update_user(user_id, |u| {
            u.two_factor_secret = None;
            u.two_factor_enabled = false;
        });
        self.replace_codes(user_id, &[]);
        Ok(())
    }
}

// ── MockChallengeStore ───────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockChallengeStore {
    pub entries: Arc<Mutex<HashMap<String, PendingTwoFactorChallenge>>>,
}

impl PendingChallengeStore for MockChallengeStore {
    async fn put(
        &self,
        session_id: &str,
        challenge: &PendingTwoFactorChallenge,
    ) -> Result<(), AuthServiceError> {
        self.entries
            .lock()
            .unwrap()
            .insert(session_id.to_owned(), challenge.clone());
        Ok(())
    }

    async fn take(
        &self,
        session_id: &str,
    ) -> Result<Option<PendingTwoFactorChallenge>, AuthServiceError> {
        Ok(self.entries.lock().unwrap().remove(session_id))
    }
}

// ── Test fixture helpers ─────────────────────────────────────────────────────

pub fn test_cipher() -> SecretCipher {
    SecretCipher::from_secret(TEST_ENCRYPTION_SECRET)
}

pub fn test_user() -> AuthUser {
    AuthUser {
        id: Uuid::parse_str("00000000-0000-0000-0000-000000000001").unwrap(),
        email: "user@example.com".to_owned(),
        password_hash: TEST_PASSWORD_HASH.clone(),
        two_factor_secret: None,
        two_factor_enabled: false,
        created_at: Utc::now(),
    }
}

/// [`test_user`] with 2FA enabled on [`TEST_TOTP_SECRET`].
pub fn two_factor_user() -> AuthUser {
    AuthUser {
        two_factor_secret: Some(test_cipher().encrypt(TEST_TOTP_SECRET).unwrap()),
        two_factor_enabled: true,
        ..test_user()
    }
}

pub fn now_secs() -> u64 {
    Utc::now().timestamp() as u64
}

pub fn current_code(secret: &str) -> String {
    totp::code_at(secret, now_secs()).unwrap()
}

/// A well-formed code that is not valid anywhere in the accepted window.
pub fn wrong_code(secret: &str) -> String {
    let now = now_secs();
    let valid: Vec<String> = [now - 30, now, now + 30]
        .iter()
        .map(|t| totp::code_at(secret, *t).unwrap())
        .collect();
    (0..1_000_000)
        .map(|n| format!("{n:06}"))
        .find(|c| !valid.contains(c))
        .unwrap()
}

pub fn verify_usecase(users: MockCredentialStore) -> VerifyTwoFactorUseCase<MockCredentialStore> {
    verify_usecase_with(users, RateLimiter::new(), TwoFactorPolicy::default())
}

pub fn verify_usecase_with(
    users: MockCredentialStore,
    limiter: RateLimiter,
    policy: TwoFactorPolicy,
) -> VerifyTwoFactorUseCase<MockCredentialStore> {
    VerifyTwoFactorUseCase {
        users,
        cipher: test_cipher(),
        limiter,
        policy,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    }
}

/// A policy whose rate limit is `limit` per minute.
pub fn policy_with_rate_limit(limit: u32) -> TwoFactorPolicy {
    TwoFactorPolicy {
        rate_limit: limit,
        rate_window: Duration::from_secs(60),
        ..TwoFactorPolicy::default()
    }
}
