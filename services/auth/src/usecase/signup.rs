use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::CredentialStore;
use crate::domain::types::{AuthUser, MIN_PASSWORD_LEN, TokenPair};
use crate::error::AuthServiceError;
use crate::infra::password::hash_password;
use crate::usecase::token::issue_token_pair;

pub struct SignupInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct SignupOutput {
    pub user_id: Uuid,
    pub tokens: TokenPair,
}

pub struct SignupUseCase<U: CredentialStore> {
    pub users: U,
    pub jwt_secret: String,
}

/// Trimmed, lowercased address. Rejects anything without a `local@domain` shape.
pub fn normalize_email(raw: &str) -> Result<String, AuthServiceError> {
    let email = raw.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !domain.contains('@')
        }
        None => false,
    };
    if !valid {
        return Err(AuthServiceError::ValidationError("invalid email".to_owned()));
    }
    Ok(email)
}

impl<U: CredentialStore> SignupUseCase<U> {
    pub async fn execute(&self, input: SignupInput) -> Result<SignupOutput, AuthServiceError> {
        let email = normalize_email(&input.email)?;
        if input.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthServiceError::ValidationError(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthServiceError::EmailInUse);
        }

        let user = AuthUser {
            id: Uuid::new_v4(),
            email,
            password_hash: hash_password(&input.password)?,
            two_factor_secret: None,
            two_factor_enabled: false,
            created_at: Utc::now(),
        };
        self.users.create(&user).await?;
        tracing::info!(user_id = %user.id, "account created");

        Ok(SignupOutput {
            user_id: user.id,
            tokens: issue_token_pair(user.id, true, &self.jwt_secret)?,
        })
    }
}
