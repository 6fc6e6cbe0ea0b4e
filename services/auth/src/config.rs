use std::time::Duration;

use serde::Deserialize;

use fifahub_core::config::Config;

use crate::domain::types::{TWO_FACTOR_RATE_LIMIT, TWO_FACTOR_RATE_WINDOW_SECS, TwoFactorPolicy};

/// Auth service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Redis connection URL.
    pub redis_url: String,
    /// HMAC secret for signing JWT access and refresh tokens.
    pub jwt_secret: String,
    /// Application secret. Encrypts 2FA material unless a dedicated key is set.
    pub secret_key: String,
    /// Dedicated key for 2FA secrets and recovery codes. Env var: `TWO_FACTOR_ENCRYPTION_KEY`.
    #[serde(default)]
    pub two_factor_encryption_key: Option<String>,
    /// Cookie domain attribute (root domain, e.g. "example.com").
    pub cookie_domain: String,
    /// TCP port to listen on (default 3112). Env var: `AUTH_PORT`.
    #[serde(default = "default_auth_port")]
    pub auth_port: u16,
    /// Issuer label shown by authenticator apps.
    #[serde(default = "default_issuer")]
    pub two_factor_issuer: String,
    /// Verification requests per user per window.
    #[serde(default = "default_rate_limit")]
    pub two_factor_rate_limit: u32,
    /// Window length in seconds. Env var: `TWO_FACTOR_RATE_WINDOW`.
    #[serde(default = "default_rate_window")]
    pub two_factor_rate_window: u64,
}

fn default_auth_port() -> u16 {
    3112
}

fn default_issuer() -> String {
    "FifaHub".to_owned()
}

fn default_rate_limit() -> u32 {
    TWO_FACTOR_RATE_LIMIT
}

fn default_rate_window() -> u64 {
    TWO_FACTOR_RATE_WINDOW_SECS
}

impl Config for AuthConfig {}

impl AuthConfig {
    /// Key material for [`SecretCipher`](crate::infra::crypto::SecretCipher).
    pub fn encryption_secret(&self) -> &str {
        self.two_factor_encryption_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .unwrap_or(&self.secret_key)
    }

    pub fn two_factor_policy(&self) -> TwoFactorPolicy {
        TwoFactorPolicy {
            rate_limit: self.two_factor_rate_limit,
            rate_window: Duration::from_secs(self.two_factor_rate_window),
            ..TwoFactorPolicy::default()
        }
    }
}
