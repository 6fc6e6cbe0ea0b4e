use jsonwebtoken::{EncodingKey, Header, encode};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use fifahub_auth_types::cookie::{ACCESS_TOKEN_EXP, REFRESH_TOKEN_EXP};
use fifahub_auth_types::token::{self, JwtClaims};

use crate::domain::repository::CredentialStore;
use crate::domain::types::TokenPair;
use crate::error::AuthServiceError;

pub(crate) fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

fn sign(
    user_id: Uuid,
    exp: u64,
    remember: bool,
    secret: &str,
) -> Result<String, AuthServiceError> {
    let claims = JwtClaims {
        sub: user_id.to_string(),
        exp,
        remember,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthServiceError::Internal(e.into()))
}

/// Fresh access + refresh pair for a user whose login just completed.
/// `remember` rides along in the claims so a refresh keeps the cookie lifetime.
pub fn issue_token_pair(
    user_id: Uuid,
    remember: bool,
    secret: &str,
) -> Result<TokenPair, AuthServiceError> {
    let now = now_secs();
    let access_token_exp = now + ACCESS_TOKEN_EXP;
    Ok(TokenPair {
        access_token: sign(user_id, access_token_exp, remember, secret)?,
        access_token_exp,
        refresh_token: sign(user_id, now + REFRESH_TOKEN_EXP, remember, secret)?,
    })
}

// ── RefreshToken ─────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct RefreshTokenOutput {
    pub user_id: Uuid,
    pub remember: bool,
    pub tokens: TokenPair,
}

pub struct RefreshTokenUseCase<U: CredentialStore> {
    pub users: U,
    pub jwt_secret: String,
}

impl<U: CredentialStore> RefreshTokenUseCase<U> {
    pub async fn execute(
        &self,
        refresh_token_value: &str,
    ) -> Result<RefreshTokenOutput, AuthServiceError> {
        // Signature + exp of the refresh token only; the access token may be long gone.
        let claims = token::validate_token(refresh_token_value, &self.jwt_secret)
            .map_err(|_| AuthServiceError::InvalidRefreshToken)?;

        let user_id = claims
            .sub
            .parse::<Uuid>()
            .map_err(|_| AuthServiceError::InvalidRefreshToken)?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthServiceError::InvalidRefreshToken)?;

        Ok(RefreshTokenOutput {
            user_id: user.id,
            remember: claims.remember,
            tokens: issue_token_pair(user.id, claims.remember, &self.jwt_secret)?,
        })
    }
}
