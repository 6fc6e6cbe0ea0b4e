use uuid::Uuid;

use crate::domain::repository::CredentialStore;
use crate::domain::totp;
use crate::domain::types::{AuthUser, DisableMethod};
use crate::error::AuthServiceError;
use crate::infra::crypto::SecretCipher;
use crate::infra::password::verify_password;
use crate::usecase::recovery::new_recovery_batch;
use crate::usecase::token::now_secs;

/// Plaintext TOTP secret of `user`.
pub fn user_secret(user: &AuthUser, cipher: &SecretCipher) -> Result<String, AuthServiceError> {
    let encrypted = user
        .two_factor_secret
        .as_deref()
        .ok_or(AuthServiceError::NoSecretConfigured)?;
    cipher.decrypt(encrypted).map_err(|_| {
        tracing::warn!(user_id = %user.id, "stored 2fa secret failed to decrypt");
        AuthServiceError::InvalidSecret
    })
}

async fn load_user<U: CredentialStore>(
    users: &U,
    user_id: Uuid,
) -> Result<AuthUser, AuthServiceError> {
    users
        .find_by_id(user_id)
        .await?
        .ok_or(AuthServiceError::UserNotFound)
}

// ── BeginTwoFactorSetup ───────────────────────────────────────────────────────

#[derive(Debug)]
pub struct BeginTwoFactorSetupOutput {
    pub secret: String,
    pub otpauth_url: String,
}

pub struct BeginTwoFactorSetupUseCase<U: CredentialStore> {
    pub users: U,
    pub cipher: SecretCipher,
    pub issuer: String,
}

impl<U: CredentialStore> BeginTwoFactorSetupUseCase<U> {
    /// Replaces any previous secret and leaves 2FA disabled until the setup is confirmed.
    pub async fn execute(
        &self,
        user_id: Uuid,
    ) -> Result<BeginTwoFactorSetupOutput, AuthServiceError> {
        let user = load_user(&self.users, user_id).await?;
        let secret = totp::generate_secret();
        let otpauth_url = totp::provisioning_uri(&secret, &user.email, &self.issuer)
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        let encrypted = self
            .cipher
            .encrypt(&secret)
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        self.users.set_pending_secret(user.id, &encrypted).await?;
        Ok(BeginTwoFactorSetupOutput {
            secret,
            otpauth_url,
        })
    }
}

// ── CompleteTwoFactorSetup ────────────────────────────────────────────────────

pub struct CompleteTwoFactorSetupUseCase<U: CredentialStore> {
    pub users: U,
    pub cipher: SecretCipher,
}

impl<U: CredentialStore> CompleteTwoFactorSetupUseCase<U> {
    /// Returns the plaintext recovery codes. They are not retrievable afterwards.
    pub async fn execute(&self, user_id: Uuid, code: &str) -> Result<Vec<String>, AuthServiceError> {
        let code = code.trim();
        if !totp::is_well_formed_code(code) {
            return Err(AuthServiceError::InvalidCode { attempts: None });
        }
        let user = load_user(&self.users, user_id).await?;
        let secret = user_secret(&user, &self.cipher)?;
        let valid =
            totp::verify(&secret, code, now_secs()).map_err(|_| AuthServiceError::InvalidSecret)?;
        if !valid {
            return Err(AuthServiceError::InvalidCode { attempts: None });
        }

        let (codes, encrypted) = new_recovery_batch(&self.cipher)?;
        self.users.enable_two_factor(user.id, &encrypted).await?;
        tracing::info!(user_id = %user.id, "2fa enabled");
        Ok(codes)
    }
}

// ── RegenerateRecoveryCodes ───────────────────────────────────────────────────

pub struct RegenerateRecoveryCodesUseCase<U: CredentialStore> {
    pub users: U,
    pub cipher: SecretCipher,
}

impl<U: CredentialStore> RegenerateRecoveryCodesUseCase<U> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<String>, AuthServiceError> {
        let user = load_user(&self.users, user_id).await?;
        if !user.two_factor_enabled {
            return Err(AuthServiceError::TwoFactorNotEnabled);
        }
        let (codes, encrypted) = new_recovery_batch(&self.cipher)?;
        self.users.replace_recovery_codes(user.id, &encrypted).await?;
        tracing::info!(user_id = %user.id, "recovery codes regenerated");
        Ok(codes)
    }
}

// ── DisableTwoFactor ──────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct DisableTwoFactorInput {
    pub password: Option<String>,
    pub code: Option<String>,
}

pub struct DisableTwoFactorUseCase<U: CredentialStore> {
    pub users: U,
    pub cipher: SecretCipher,
}

impl<U: CredentialStore> DisableTwoFactorUseCase<U> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: DisableTwoFactorInput,
    ) -> Result<DisableMethod, AuthServiceError> {
        let user = load_user(&self.users, user_id).await?;
        if !user.two_factor_enabled {
            return Err(AuthServiceError::TwoFactorNotEnabled);
        }

        let password = input.password.filter(|p| !p.is_empty());
        let code = input
            .code
            .map(|c| c.trim().to_owned())
            .filter(|c| !c.is_empty());

        let method = match (password, code) {
            (Some(password), _) => {
                if !verify_password(&password, &user.password_hash) {
                    return Err(AuthServiceError::ValidationError(
                        "invalid password".to_owned(),
                    ));
                }
                DisableMethod::Password
            }
            (None, Some(code)) => {
                if !totp::is_well_formed_code(&code) {
                    return Err(AuthServiceError::ValidationError("invalid code".to_owned()));
                }
                let secret = user_secret(&user, &self.cipher)?;
                let valid = totp::verify(&secret, &code, now_secs())
                    .map_err(|_| AuthServiceError::InvalidSecret)?;
                if !valid {
                    return Err(AuthServiceError::ValidationError("invalid code".to_owned()));
                }
                DisableMethod::Totp
            }
            (None, None) => {
                return Err(AuthServiceError::ValidationError(
                    "password or code is required".to_owned(),
                ));
            }
        };

        self.users.disable_two_factor(user.id).await?;
        tracing::info!(user_id = %user.id, method = method.as_str(), "2fa disabled");
        Ok(method)
    }
}
