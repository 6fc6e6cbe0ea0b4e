use chrono::Utc;
use uuid::Uuid;

use crate::domain::challenge::PendingTwoFactorChallenge;
use crate::domain::repository::CredentialStore;
use crate::domain::types::TokenPair;
use crate::error::AuthServiceError;
use crate::infra::password::{verify_dummy_password, verify_password};
use crate::usecase::signup::normalize_email;
use crate::usecase::token::issue_token_pair;

pub struct LoginInput {
    pub email: String,
    pub password: String,
    pub remember: bool,
}

#[derive(Debug)]
pub enum LoginOutcome {
    /// No second factor on the account; the session is live.
    Authenticated {
        user_id: Uuid,
        remember: bool,
        tokens: TokenPair,
    },
    /// Password accepted, code still owed. The challenge must be stored by the caller.
    TwoFactorRequired(PendingTwoFactorChallenge),
}

pub struct LoginUseCase<U: CredentialStore> {
    pub users: U,
    pub jwt_secret: String,
}

impl<U: CredentialStore> LoginUseCase<U> {
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutcome, AuthServiceError> {
        let email =
            normalize_email(&input.email).map_err(|_| AuthServiceError::InvalidCredentials)?;
        // Unknown email and wrong password are indistinguishable to the caller.
        let Some(user) = self.users.find_by_email(&email).await? else {
            verify_dummy_password(&input.password);
            return Err(AuthServiceError::InvalidCredentials);
        };
        if !verify_password(&input.password, &user.password_hash) {
            tracing::info!(user_id = %user.id, "password rejected");
            return Err(AuthServiceError::InvalidCredentials);
        }

        if user.two_factor_enabled {
            tracing::info!(user_id = %user.id, "second factor required");
            return Ok(LoginOutcome::TwoFactorRequired(
                PendingTwoFactorChallenge::begin(user.id, input.remember, Utc::now()),
            ));
        }

        Ok(LoginOutcome::Authenticated {
            user_id: user.id,
            remember: input.remember,
            tokens: issue_token_pair(user.id, input.remember, &self.jwt_secret)?,
        })
    }
}
