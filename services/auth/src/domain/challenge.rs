//! Pending second-factor challenge.
//!
//! A login that passed the password check but still owes a code is carried
//! as a [`PendingTwoFactorChallenge`] value. The caller owns persistence:
//! it stores the value between requests and hands it back in. All state
//! transitions here are pure.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use rand::RngExt;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use uuid::Uuid;

/// Random bytes behind a challenge token.
pub const CHALLENGE_TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTwoFactorChallenge {
    pub user_id: Uuid,
    /// URL-safe token the client must echo back with its code.
    pub token: String,
    /// Whether the finished login gets long-lived cookies.
    pub remember: bool,
    pub created_at: DateTime<Utc>,
    /// Wrong answers so far.
    pub attempts: u32,
}

/// Outcome of counting one wrong answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedAttempt {
    Retry { attempts: u32 },
    Locked { attempts: u32 },
}

impl PendingTwoFactorChallenge {
    pub fn begin(user_id: Uuid, remember: bool, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            token: generate_token(),
            remember,
            created_at: now,
            attempts: 0,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>, max_age_secs: i64) -> bool {
        now - self.created_at > Duration::seconds(max_age_secs)
    }

    /// Constant-time comparison against the token the client sent.
    pub fn token_matches(&self, presented: &str) -> bool {
        self.token.as_bytes().ct_eq(presented.as_bytes()).into()
    }

    pub fn record_failure(&mut self, max_attempts: u32) -> FailedAttempt {
        self.attempts = self.attempts.saturating_add(1);
        if self.attempts >= max_attempts {
            FailedAttempt::Locked {
                attempts: self.attempts,
            }
        } else {
            FailedAttempt::Retry {
                attempts: self.attempts,
            }
        }
    }
}

fn generate_token() -> String {
    let bytes: [u8; CHALLENGE_TOKEN_BYTES] = rand::rng().random();
    URL_SAFE_NO_PAD.encode(bytes)
}
