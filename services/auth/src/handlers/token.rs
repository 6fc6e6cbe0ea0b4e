use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use serde::Serialize;

use fifahub_auth_types::{
    cookie::{FIFAHUB_ACCESS_TOKEN, FIFAHUB_REFRESH_TOKEN, clear_cookies},
    identity::IdentityHeaders,
    token::validate_access_token,
};

use crate::error::AuthServiceError;
use crate::handlers::session::{set_token_cookies, token_expires_header};
use crate::state::AppState;
use crate::usecase::token::RefreshTokenUseCase;

// ── GET /auth/token ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CheckTokenResponse {
    pub user_id: uuid::Uuid,
    pub access_token_exp: u64,
}

pub async fn check_token(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AuthServiceError> {
    let token_value = jar
        .get(FIFAHUB_ACCESS_TOKEN)
        .map(|c| c.value().to_owned())
        .ok_or(AuthServiceError::InvalidToken)?;

    let info = validate_access_token(&token_value, &state.jwt_secret)
        .map_err(|_| AuthServiceError::InvalidToken)?;

    let headers = token_expires_header(info.access_token_exp);
    let body = CheckTokenResponse {
        user_id: info.user_id,
        access_token_exp: info.access_token_exp,
    };
    Ok((StatusCode::OK, headers, Json(body)))
}

// ── PATCH /auth/token ─────────────────────────────────────────────────────────

pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AuthServiceError> {
    let refresh_value = jar
        .get(FIFAHUB_REFRESH_TOKEN)
        .map(|c| c.value().to_owned())
        .ok_or(AuthServiceError::InvalidRefreshToken)?;

    let usecase = RefreshTokenUseCase {
        users: state.credential_store(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let out = usecase.execute(&refresh_value).await?;

    let headers = token_expires_header(out.tokens.access_token_exp);
    let jar = set_token_cookies(jar, out.tokens, &state.cookie_domain, out.remember);
    Ok((StatusCode::CREATED, jar, headers))
}

// ── DELETE /auth/token ────────────────────────────────────────────────────────

pub async fn revoke_token(
    State(state): State<AppState>,
    _identity: IdentityHeaders,
    jar: CookieJar,
) -> Result<impl IntoResponse, AuthServiceError> {
    let jar = clear_cookies(jar, state.cookie_domain.clone());
    Ok((StatusCode::NO_CONTENT, jar))
}
