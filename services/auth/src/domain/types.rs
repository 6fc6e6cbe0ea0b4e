use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Account record as the auth service sees it.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// Ciphertext of the base32 TOTP secret. Present from setup-begin until disable.
    pub two_factor_secret: Option<String>,
    pub two_factor_enabled: bool,
    pub created_at: DateTime<Utc>,
}

/// Stored recovery code; the plaintext is only ever shown once, at generation.
#[derive(Debug, Clone)]
pub struct RecoveryCode {
    pub id: Uuid,
    pub user_id: Uuid,
    pub encrypted_code: String,
    pub created_at: DateTime<Utc>,
}

/// Which proof completed a second-factor login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationMethod {
    Totp,
    Recovery,
}

impl VerificationMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Totp => "totp",
            Self::Recovery => "recovery",
        }
    }
}

/// Which proof authorised turning 2FA off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisableMethod {
    Password,
    Totp,
}

impl DisableMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::Totp => "totp",
        }
    }
}

/// Access + refresh JWT pair handed out when a login completes.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub access_token_exp: u64,
    pub refresh_token: String,
}

// ── Policy ───────────────────────────────────────────────────────────────────

/// Seconds a pending challenge stays answerable.
pub const CHALLENGE_MAX_AGE_SECS: i64 = 300;

/// Wrong answers a single challenge absorbs before it is destroyed.
pub const MAX_CHALLENGE_ATTEMPTS: u32 = 5;

/// Verification requests per user per window, across all challenges.
pub const TWO_FACTOR_RATE_LIMIT: u32 = 10;

pub const TWO_FACTOR_RATE_WINDOW_SECS: u64 = 60;

/// Rate limiter scope for second-factor verification.
pub const TWO_FACTOR_RATE_SCOPE: &str = "2fa-verify";

/// Redis TTL of a stored challenge. Outlives the max age so an expired
/// challenge is still found and reported as expired.
pub const PENDING_CHALLENGE_TTL_SECS: u64 = CHALLENGE_MAX_AGE_SECS as u64 + 60;

/// Codes per recovery batch.
pub const RECOVERY_CODE_COUNT: usize = 8;

/// Random bytes per recovery code (rendered as twice as many hex chars).
pub const RECOVERY_CODE_BYTES: usize = 5;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Tunable limits of the second-factor login step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwoFactorPolicy {
    pub max_age_secs: i64,
    pub max_attempts: u32,
    pub rate_limit: u32,
    pub rate_window: Duration,
}

impl Default for TwoFactorPolicy {
    fn default() -> Self {
        Self {
            max_age_secs: CHALLENGE_MAX_AGE_SECS,
            max_attempts: MAX_CHALLENGE_ATTEMPTS,
            rate_limit: TWO_FACTOR_RATE_LIMIT,
            rate_window: Duration::from_secs(TWO_FACTOR_RATE_WINDOW_SECS),
        }
    }
}
